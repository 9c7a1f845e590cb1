//! Daily risk limits and post-stop cooldown

use chrono::{DateTime, Duration, Utc};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskLimits {
    pub max_daily_trades: u32,
    /// Currency; zero or negative disables the check
    pub max_daily_loss: f64,
    pub cooldown: Duration,
}

/// Why an entry was blocked, or `Open`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    Open,
    MaxTrades { count: u32 },
    MaxLoss { pnl: f64 },
    Cooldown { until: DateTime<Utc> },
    PositionOpen,
}

impl GateDecision {
    pub fn is_open(&self) -> bool {
        matches!(self, GateDecision::Open)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyRiskState {
    pub trade_count: u32,
    pub realized_pnl: f64,
    /// Start of the active cooldown, `None` when not cooling down
    pub cooldown_started_at: Option<DateTime<Utc>>,
}

impl DailyRiskState {
    pub fn cooldown_active(&self) -> bool {
        self.cooldown_started_at.is_some()
    }

    /// Evaluate the gate at `now`. A cooldown whose time has passed is
    /// cleared here.
    pub fn check(&mut self, now: DateTime<Utc>, limits: &RiskLimits, flat: bool) -> GateDecision {
        if self.trade_count >= limits.max_daily_trades {
            return GateDecision::MaxTrades { count: self.trade_count };
        }

        if limits.max_daily_loss > 0.0 && self.realized_pnl <= -limits.max_daily_loss {
            return GateDecision::MaxLoss { pnl: self.realized_pnl };
        }

        if let Some(started) = self.cooldown_started_at {
            if now - started >= limits.cooldown {
                self.cooldown_started_at = None;
                info!("--- Cooldown over at {} ---", now.format("%H:%M:%S"));
            } else {
                return GateDecision::Cooldown { until: started + limits.cooldown };
            }
        }

        if !flat {
            return GateDecision::PositionOpen;
        }

        GateDecision::Open
    }

    pub fn record_entry(&mut self) {
        self.trade_count += 1;
    }

    pub fn record_close(&mut self, profit: f64) {
        self.realized_pnl += profit;
    }

    pub fn arm_cooldown(&mut self, at: DateTime<Utc>) {
        self.cooldown_started_at = Some(at);
    }
}
