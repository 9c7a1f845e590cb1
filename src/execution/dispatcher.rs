//! Routes market events through the engine and its collaborators

use tracing::warn;

use super::order::EntryIntent;
use super::router::{OrderRouter, SignalSink};
use super::signal::SignalEvent;
use crate::streams::MarketEvent;
use crate::trading_core::{FillOutcome, SmcEngine};
use crate::types::Direction;

/// Running totals for one replay or live session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSummary {
    pub bars: usize,
    pub fills: usize,
    pub days: usize,
    pub long_entries: u32,
    pub short_entries: u32,
    pub rejected_entries: u32,
    pub closed_trades: u32,
    pub wins: u32,
    pub losses: u32,
    /// Realized profit across all days (currency)
    pub realized_pnl: f64,
}

impl SessionSummary {
    pub fn entries(&self) -> u32 {
        self.long_entries + self.short_entries
    }

    pub fn win_rate(&self) -> f64 {
        if self.closed_trades == 0 {
            return 0.0;
        }
        self.wins as f64 / self.closed_trades as f64 * 100.0
    }
}

pub struct Dispatcher<R, S> {
    engine: SmcEngine,
    router: R,
    sink: S,
    summary: SessionSummary,
    signal_only: bool,
}

impl<R: OrderRouter, S: SignalSink> Dispatcher<R, S> {
    pub fn new(engine: SmcEngine, router: R, sink: S) -> Self {
        Self {
            engine,
            router,
            sink,
            summary: SessionSummary::default(),
            signal_only: false,
        }
    }

    /// Publish intents without waiting for fills. For feeds that carry no
    /// execution reports the position stays flat after every intent.
    pub fn with_signal_only(mut self, signal_only: bool) -> Self {
        self.signal_only = signal_only;
        self
    }

    pub fn engine(&self) -> &SmcEngine {
        &self.engine
    }

    pub fn router(&self) -> &R {
        &self.router
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    /// Process one event. Returns the intent emitted for a bar, if any.
    pub fn handle(&mut self, event: &MarketEvent) -> Option<EntryIntent> {
        match event {
            MarketEvent::Bar(bar) => {
                self.summary.bars += 1;
                let day_before = self.engine.session().day;
                let intent = self.engine.on_bar(bar);
                if self.engine.session().day != day_before {
                    self.summary.days += 1;
                }

                let intent = intent?;
                self.dispatch(&intent);
                Some(intent)
            }
            MarketEvent::Fill(fill) => {
                self.summary.fills += 1;
                if let FillOutcome::Closed { profit, .. } = self.engine.on_fill(fill) {
                    self.summary.closed_trades += 1;
                    self.summary.realized_pnl += profit;
                    if profit >= 0.0 {
                        self.summary.wins += 1;
                    } else {
                        self.summary.losses += 1;
                    }
                }
                None
            }
        }
    }

    fn dispatch(&mut self, intent: &EntryIntent) {
        match intent.direction {
            Direction::Long => self.summary.long_entries += 1,
            Direction::Short => self.summary.short_entries += 1,
        }

        if let Err(e) = self.router.submit_entry(intent) {
            warn!("Order submission failed: {:#}", e);
            self.summary.rejected_entries += 1;
            self.engine.on_entry_rejected(intent.label);
            return;
        }

        let event = SignalEvent::from_intent(&self.engine.config().symbol, intent);
        if let Err(e) = self.sink.publish(&event) {
            warn!("Signal publish failed: {:#}", e);
        }

        if self.signal_only {
            self.engine.release_pending_entry();
        }
    }

    pub fn into_parts(self) -> (SmcEngine, R, S, SessionSummary) {
        (self.engine, self.router, self.sink, self.summary)
    }
}
