//! Strategy configuration
//!
//! Loaded once before the session starts. Defaults match the tuned NQ
//! parameter set (15 minute opening range, 24/48/16 tick bracket).

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::trading_core::risk::RiskLimits;
use crate::trading_core::score::MAX_SCORE;
use crate::trading_core::session::SessionClock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Instrument symbol, used in signal payloads
    pub symbol: String,

    /// Minimum price increment (NQ/ES = 0.25)
    pub tick_size: f64,

    /// Exchange timezone for day boundaries and session times
    pub timezone: Tz,

    /// Opening window start (exchange time)
    pub session_start: NaiveTime,

    /// Opening range duration in minutes
    pub opening_range_minutes: u32,

    /// No entries evaluated after this time (exchange time)
    pub trade_end: NaiveTime,

    /// Stop loss distance in ticks
    pub stop_loss_ticks: u32,

    /// Profit target distance in ticks
    pub profit_target_ticks: u32,

    /// Trailing stop distance in ticks (0 disables trailing)
    pub trail_stop_ticks: u32,

    /// Max entries per day
    pub max_daily_trades: u32,

    /// Max realized daily loss in currency (<= 0 disables)
    pub max_daily_loss: f64,

    /// Minutes without entries after a stop-out
    pub cooldown_minutes: u32,

    /// Opening range must span at least this many ticks
    pub min_range_ticks: u32,

    /// Sweep signal lifetime, in nominal bars
    pub sweep_reclaim_bars: u32,

    /// Minutes per nominal bar for sweep expiry
    pub nominal_bar_minutes: u32,

    /// Minimum FVG size in ticks
    pub min_gap_ticks: u32,

    /// Bars to look back for S/D zones (informational)
    pub zone_lookback_bars: u32,

    /// Minimum confluence score to trade (1-5)
    pub min_score: u8,

    /// Bars of history before the strategy evaluates anything
    pub warmup_bars: usize,

    pub fast_ma_period: usize,
    pub slow_ma_period: usize,
    pub atr_period: usize,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            symbol: "NQ".to_string(),
            tick_size: 0.25,
            timezone: chrono_tz::America::New_York,
            session_start: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or(NaiveTime::MIN),
            opening_range_minutes: 15,
            trade_end: NaiveTime::from_hms_opt(15, 45, 0).unwrap_or(NaiveTime::MIN),
            stop_loss_ticks: 24,
            profit_target_ticks: 48,
            trail_stop_ticks: 16,
            max_daily_trades: 8,
            max_daily_loss: 300.0,
            cooldown_minutes: 10,
            min_range_ticks: 8,
            sweep_reclaim_bars: 3,
            nominal_bar_minutes: 5,
            min_gap_ticks: 4,
            zone_lookback_bars: 50,
            min_score: 3,
            warmup_bars: 30,
            fast_ma_period: 9,
            slow_ma_period: 21,
            atr_period: 14,
        }
    }
}

impl StrategyConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SCORE).contains(&self.min_score) {
            bail!("min_score must be between 1 and {} (got {})", MAX_SCORE, self.min_score);
        }
        if self.tick_size.is_nan() || self.tick_size <= 0.0 {
            bail!("tick_size must be positive (got {})", self.tick_size);
        }
        if self.fast_ma_period == 0 || self.slow_ma_period == 0 || self.atr_period == 0 {
            bail!("indicator periods must be non-zero");
        }
        if self.opening_range_minutes == 0 {
            bail!("opening_range_minutes must be non-zero");
        }

        let (or_end, wrapped) = self
            .session_start
            .overflowing_add_signed(Duration::minutes(self.opening_range_minutes as i64));
        if wrapped != 0 || or_end >= self.trade_end {
            bail!(
                "opening range ({} + {} min) must end before trade_end {}",
                self.session_start,
                self.opening_range_minutes,
                self.trade_end
            );
        }
        Ok(())
    }

    pub fn opening_range_end(&self) -> NaiveTime {
        self.session_start
            .overflowing_add_signed(Duration::minutes(self.opening_range_minutes as i64))
            .0
    }

    pub fn session_clock(&self) -> SessionClock {
        SessionClock {
            timezone: self.timezone,
            session_start: self.session_start,
            opening_range_end: self.opening_range_end(),
            trade_end: self.trade_end,
        }
    }

    pub fn risk_limits(&self) -> RiskLimits {
        RiskLimits {
            max_daily_trades: self.max_daily_trades,
            max_daily_loss: self.max_daily_loss,
            cooldown: Duration::minutes(self.cooldown_minutes as i64),
        }
    }

    /// Sweep lifetime: reclaim bars x nominal bar minutes
    pub fn sweep_expiry(&self) -> Duration {
        Duration::minutes(self.sweep_reclaim_bars as i64 * self.nominal_bar_minutes as i64)
    }

    /// Minimum FVG size in price units
    pub fn min_gap_size(&self) -> f64 {
        self.min_gap_ticks as f64 * self.tick_size
    }
}
