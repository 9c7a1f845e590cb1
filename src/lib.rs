// Library crate - SMC signal engine

pub mod execution;
pub mod streams;
pub mod trading_core;
pub mod types;

// Re-export commonly used types
pub use execution::{EntryIntent, FillEvent, StrategyConfig};
pub use trading_core::SmcEngine;
pub use types::*;
