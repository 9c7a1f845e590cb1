//! Session clock and per-day state
//!
//! Bars carry UTC timestamps; day boundaries and time-of-day gates are
//! evaluated in the exchange timezone. Everything that lives for one trading
//! day is held in [`SessionState`] and replaced wholesale on day change.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use super::fvg::GapBooks;
use super::opening_range::OpeningRange;
use super::risk::DailyRiskState;
use super::sweep::SweepState;
use super::swing::SwingPoints;
use super::zones::ZoneBooks;

/// Time-of-day gates for one instrument
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionClock {
    pub timezone: Tz,
    /// First bar of the opening window (inclusive)
    pub session_start: NaiveTime,
    /// Last bar of the opening window (inclusive)
    pub opening_range_end: NaiveTime,
    /// Last bar evaluated for entries (inclusive)
    pub trade_end: NaiveTime,
}

impl SessionClock {
    /// Exchange-local calendar day and time of day
    pub fn local(&self, timestamp: DateTime<Utc>) -> (NaiveDate, NaiveTime) {
        let local = timestamp.with_timezone(&self.timezone);
        (local.date_naive(), local.time())
    }

    pub fn in_opening_window(&self, time: NaiveTime) -> bool {
        time >= self.session_start && time <= self.opening_range_end
    }

    pub fn opening_window_closed(&self, time: NaiveTime) -> bool {
        time > self.opening_range_end
    }

    pub fn trading_closed(&self, time: NaiveTime) -> bool {
        time > self.trade_end
    }
}

/// All state that is reset at the start of each trading day
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub day: Option<NaiveDate>,
    pub opening_range: OpeningRange,
    pub gaps: GapBooks,
    pub zones: ZoneBooks,
    pub swings: SwingPoints,
    pub sweep: SweepState,
    pub risk: DailyRiskState,
}

impl SessionState {
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            day: Some(day),
            ..Default::default()
        }
    }

    /// Start a fresh day if `day` differs from the current one.
    /// Returns true when a reset happened.
    pub fn roll_day(&mut self, day: NaiveDate) -> bool {
        if self.day == Some(day) {
            return false;
        }
        *self = Self::for_day(day);
        true
    }
}
