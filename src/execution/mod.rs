//! Execution side of the engine
//!
//! Configuration, the order and fill types exchanged with order management,
//! the collaborator traits, and the relay payload plumbing.

pub mod config;
pub mod dispatcher;
pub mod order;
pub mod router;
pub mod signal;
pub mod webhook;

pub use config::StrategyConfig;
pub use dispatcher::{Dispatcher, SessionSummary};
pub use order::{EntryIntent, FillEvent, OrderLabel};
pub use router::{BroadcastSink, LoggingRouter, OrderRouter, SignalSink};
pub use signal::{SignalAction, SignalEvent};
pub use webhook::{print_signals, WebhookForwarder};
