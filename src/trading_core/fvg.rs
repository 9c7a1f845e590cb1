//! Fair Value Gap detection
//!
//! Bullish FVG: the current low sits above the high from two bars ago, with
//! the middle bar as the impulse. Bearish FVG is the mirror.

use serde::{Deserialize, Serialize};

use super::bars::BarWindow;
use super::bounded::{BoundedZones, MAX_ZONES};

/// Gap detection needs the current bar index to be at least this
const MIN_BAR_INDEX: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapPolarity {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub top: f64,
    pub bottom: f64,
    pub polarity: GapPolarity,
}

impl Gap {
    /// Price inside the gap, widened by `tolerance` on both sides
    pub fn contains(&self, price: f64, tolerance: f64) -> bool {
        price >= self.bottom - tolerance && price <= self.top + tolerance
    }
}

pub type GapBook = BoundedZones<Gap, MAX_ZONES>;

/// Open gaps for the session, one book per polarity
#[derive(Debug, Clone, Default)]
pub struct GapBooks {
    pub bullish: GapBook,
    pub bearish: GapBook,
}

impl GapBooks {
    /// Store a gap in its polarity's book. False when the book is full.
    pub fn record(&mut self, gap: Gap) -> bool {
        match gap.polarity {
            GapPolarity::Bullish => self.bullish.try_push(gap),
            GapPolarity::Bearish => self.bearish.try_push(gap),
        }
    }

    pub fn book(&self, polarity: GapPolarity) -> &GapBook {
        match polarity {
            GapPolarity::Bullish => &self.bullish,
            GapPolarity::Bearish => &self.bearish,
        }
    }

    /// Any gap of `polarity` containing `price` within `tolerance`
    pub fn any_contains(&self, polarity: GapPolarity, price: f64, tolerance: f64) -> bool {
        self.book(polarity).iter().any(|g| g.contains(price, tolerance))
    }
}

/// Detect a gap formed by the current bar and the bar two back.
/// `min_size` is in price units.
pub fn detect(window: &BarWindow, min_size: f64) -> Option<Gap> {
    if window.current_index() < MIN_BAR_INDEX {
        return None;
    }
    let current = window.ago(0)?;
    let two_back = window.ago(2)?;

    if current.low > two_back.high && current.low - two_back.high >= min_size {
        return Some(Gap {
            top: current.low,
            bottom: two_back.high,
            polarity: GapPolarity::Bullish,
        });
    }

    if current.high < two_back.low && two_back.low - current.high >= min_size {
        return Some(Gap {
            top: two_back.low,
            bottom: current.high,
            polarity: GapPolarity::Bearish,
        });
    }

    None
}
