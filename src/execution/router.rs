//! Collaborator seams: order submission and signal publication

use anyhow::Result;
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::order::EntryIntent;
use super::signal::SignalEvent;

pub const SIGNAL_CHANNEL_CAPACITY: usize = 1000;

/// Sends entry intents to order management
pub trait OrderRouter {
    fn submit_entry(&mut self, intent: &EntryIntent) -> Result<()>;
}

/// Receives relay payloads for every emitted intent
pub trait SignalSink {
    fn publish(&mut self, event: &SignalEvent) -> Result<()>;
}

/// Order router that only logs. Used for replays where fills come from the
/// event log itself.
#[derive(Debug, Default)]
pub struct LoggingRouter {
    submitted: usize,
}

impl LoggingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> usize {
        self.submitted
    }
}

impl OrderRouter for LoggingRouter {
    fn submit_entry(&mut self, intent: &EntryIntent) -> Result<()> {
        self.submitted += 1;
        info!(
            "ORDER: {} {} x{} @ {:.2} | SL={} TP={} Trail={} | id={}",
            intent.label,
            intent.direction,
            intent.quantity,
            intent.price,
            intent.stop_loss_ticks,
            intent.profit_target_ticks,
            intent
                .trail_stop()
                .map_or_else(|| "off".to_string(), |t| t.to_string()),
            intent.id
        );
        Ok(())
    }
}

/// Fans signal events out over a broadcast channel
pub struct BroadcastSink {
    tx: broadcast::Sender<SignalEvent>,
}

impl BroadcastSink {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(SIGNAL_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SignalEvent> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastSink {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalSink for BroadcastSink {
    fn publish(&mut self, event: &SignalEvent) -> Result<()> {
        // No subscribers is not an error
        match self.tx.send(event.clone()) {
            Ok(receivers) => debug!("Signal sent to {} subscriber(s)", receivers),
            Err(_) => debug!("Signal dropped, no subscribers"),
        }
        Ok(())
    }
}
