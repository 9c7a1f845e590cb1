//! Opening Range tracking
//!
//! High/low of the opening window, frozen on the first bar after the window
//! closes. A range narrower than the configured minimum makes the day
//! non-tradable; the range then stays unset for the rest of the session.

use serde::{Deserialize, Serialize};

use crate::types::Bar;

/// Frozen opening-range levels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeLevels {
    pub high: f64,
    pub low: f64,
    pub range_ticks: f64,
}

impl RangeLevels {
    pub fn midpoint(&self) -> f64 {
        (self.high + self.low) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum OpeningRange {
    /// No bar inside the opening window yet
    #[default]
    Waiting,
    /// Inside the window, extremes still moving
    Building { high: f64, low: f64 },
    /// Frozen and wide enough to trade
    Set(RangeLevels),
    /// Frozen but below the minimum size; no trading today
    Rejected(RangeLevels),
}

/// Result of freezing the range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FreezeOutcome {
    Accepted(RangeLevels),
    TooNarrow(RangeLevels),
}

impl OpeningRange {
    /// Fold an in-window bar into the running extremes.
    /// Ignored once the range has been frozen.
    pub fn update(&mut self, bar: &Bar) {
        match self {
            OpeningRange::Waiting => {
                *self = OpeningRange::Building {
                    high: bar.high,
                    low: bar.low,
                };
            }
            OpeningRange::Building { high, low } => {
                if bar.high > *high {
                    *high = bar.high;
                }
                if bar.low < *low {
                    *low = bar.low;
                }
            }
            OpeningRange::Set(_) | OpeningRange::Rejected(_) => {}
        }
    }

    /// Freeze the running range. Returns `None` when there is nothing to
    /// freeze (no in-window bars, or already frozen).
    pub fn freeze(&mut self, tick_size: f64, min_range_ticks: f64) -> Option<FreezeOutcome> {
        let OpeningRange::Building { high, low } = *self else {
            return None;
        };

        let levels = RangeLevels {
            high,
            low,
            range_ticks: (high - low) / tick_size,
        };

        if levels.range_ticks < min_range_ticks {
            *self = OpeningRange::Rejected(levels);
            Some(FreezeOutcome::TooNarrow(levels))
        } else {
            *self = OpeningRange::Set(levels);
            Some(FreezeOutcome::Accepted(levels))
        }
    }

    /// Levels of an accepted range
    pub fn levels(&self) -> Option<&RangeLevels> {
        match self {
            OpeningRange::Set(levels) => Some(levels),
            _ => None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, OpeningRange::Set(_))
    }

    pub fn is_building(&self) -> bool {
        matches!(self, OpeningRange::Building { .. })
    }
}
