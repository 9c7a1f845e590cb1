//! Liquidity sweep detection
//!
//! A sweep is a wick beyond a reference level that closes back inside it in
//! the same bar (stop hunt). Reference levels are the opening-range bounds
//! (once per session each) and the latest swing high/low (re-triggerable).
//!
//! An active sweep expires once the elapsed time since detection exceeds
//! `reclaim_bars x nominal bar minutes`. This is wall-clock time between bar
//! timestamps, not a bar count.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::opening_range::RangeLevels;
use super::swing::SwingPoints;
use crate::types::Bar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SweepDirection {
    #[default]
    None,
    /// Highs taken out, bearish bias
    SweptHigh,
    /// Lows taken out, bullish bias
    SweptLow,
}

/// Reference level that was swept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepSource {
    RangeHigh,
    RangeLow,
    SwingHigh,
    SwingLow,
}

impl SweepSource {
    fn direction(&self) -> SweepDirection {
        match self {
            SweepSource::RangeHigh | SweepSource::SwingHigh => SweepDirection::SweptHigh,
            SweepSource::RangeLow | SweepSource::SwingLow => SweepDirection::SweptLow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepTrigger {
    pub source: SweepSource,
    pub level: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepState {
    pub direction: SweepDirection,
    pub level: f64,
    pub detected_at: Option<DateTime<Utc>>,
    pub range_high_swept: bool,
    pub range_low_swept: bool,
}

impl SweepState {
    /// Evaluate all four triggers against `bar`. Later triggers overwrite
    /// earlier ones; every trigger that fired is returned in order.
    pub fn detect(
        &mut self,
        bar: &Bar,
        range: &RangeLevels,
        swings: &SwingPoints,
    ) -> Vec<SweepTrigger> {
        let mut fired = Vec::new();

        if !self.range_high_swept && bar.high > range.high && bar.close < range.high {
            self.range_high_swept = true;
            fired.push(SweepTrigger { source: SweepSource::RangeHigh, level: range.high });
        }

        if !self.range_low_swept && bar.low < range.low && bar.close > range.low {
            self.range_low_swept = true;
            fired.push(SweepTrigger { source: SweepSource::RangeLow, level: range.low });
        }

        if let Some(swing_high) = swings.high {
            if bar.high > swing_high && bar.close < swing_high {
                fired.push(SweepTrigger { source: SweepSource::SwingHigh, level: swing_high });
            }
        }

        if let Some(swing_low) = swings.low {
            if bar.low < swing_low && bar.close > swing_low {
                fired.push(SweepTrigger { source: SweepSource::SwingLow, level: swing_low });
            }
        }

        for trigger in &fired {
            self.direction = trigger.source.direction();
            self.level = trigger.level;
            self.detected_at = Some(bar.timestamp);
        }

        fired
    }

    /// Clear an active sweep older than `window`. Returns true if it expired.
    pub fn expire(&mut self, now: DateTime<Utc>, window: Duration) -> bool {
        if self.direction == SweepDirection::None {
            return false;
        }
        let Some(detected_at) = self.detected_at else {
            return false;
        };
        if now - detected_at > window {
            self.direction = SweepDirection::None;
            return true;
        }
        false
    }

    pub fn is_active(&self) -> bool {
        self.direction != SweepDirection::None
    }
}
