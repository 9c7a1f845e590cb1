//! Market event sources

mod replay;

pub use replay::{load_events, parse_csv_bars, parse_event_lines, MarketEvent};
