//! Supply/Demand zone detection
//!
//! A strong engulfing bar (range above 1.5x ATR) that reverses the previous
//! bar marks the previous bar as the origin of the move:
//! - bullish impulse after a bearish bar → demand zone at that bearish bar
//! - bearish impulse after a bullish bar → supply zone at that bullish bar
//!
//! Zones persist for the whole session; price trading through them does not
//! remove them.

use serde::{Deserialize, Serialize};

use super::bars::BarWindow;
use super::bounded::{BoundedZones, MAX_ZONES};

const MIN_BAR_INDEX: usize = 5;

/// Impulse bar range must exceed ATR by this factor
pub const IMPULSE_ATR_MULT: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneKind {
    Demand,
    Supply,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub high: f64,
    pub low: f64,
    pub kind: ZoneKind,
}

impl Zone {
    pub fn contains(&self, price: f64, tolerance: f64) -> bool {
        price >= self.low - tolerance && price <= self.high + tolerance
    }
}

pub type ZoneBook = BoundedZones<Zone, MAX_ZONES>;

#[derive(Debug, Clone, Default)]
pub struct ZoneBooks {
    pub demand: ZoneBook,
    pub supply: ZoneBook,
}

impl ZoneBooks {
    pub fn record(&mut self, zone: Zone) -> bool {
        match zone.kind {
            ZoneKind::Demand => self.demand.try_push(zone),
            ZoneKind::Supply => self.supply.try_push(zone),
        }
    }

    pub fn book(&self, kind: ZoneKind) -> &ZoneBook {
        match kind {
            ZoneKind::Demand => &self.demand,
            ZoneKind::Supply => &self.supply,
        }
    }

    pub fn any_contains(&self, kind: ZoneKind, price: f64, tolerance: f64) -> bool {
        self.book(kind).iter().any(|z| z.contains(price, tolerance))
    }
}

/// Detect a zone created by the current bar. `atr` is the current
/// average true range.
pub fn detect(window: &BarWindow, atr: f64) -> Option<Zone> {
    if window.current_index() < MIN_BAR_INDEX {
        return None;
    }
    let current = window.ago(0)?;
    let prev = window.ago(1)?;

    if current.range() <= atr * IMPULSE_ATR_MULT {
        return None;
    }

    if current.is_bullish() && prev.is_bearish() {
        return Some(Zone {
            high: prev.open.max(prev.close),
            low: prev.low,
            kind: ZoneKind::Demand,
        });
    }

    if current.is_bearish() && prev.is_bullish() {
        return Some(Zone {
            high: prev.high,
            low: prev.open.min(prev.close),
            kind: ZoneKind::Supply,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Bar;
    use chrono::{Duration, TimeZone, Utc};

    /// Four quiet bars followed by `prev` and `current` (open, high, low, close)
    fn window(prev: (f64, f64, f64, f64), current: (f64, f64, f64, f64)) -> BarWindow {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap();
        let mut w = BarWindow::new();
        for i in 0..4 {
            w.push(Bar::new(start + Duration::minutes(i), 100.0, 100.5, 99.5, 100.0));
        }
        let (o, h, l, c) = prev;
        w.push(Bar::new(start + Duration::minutes(4), o, h, l, c));
        let (o, h, l, c) = current;
        w.push(Bar::new(start + Duration::minutes(5), o, h, l, c));
        w
    }

    #[test]
    fn test_demand_zone_from_bearish_base() {
        let w = window((100.5, 100.75, 99.75, 100.0), (100.0, 103.0, 99.9, 102.8));
        let zone = detect(&w, 1.0).unwrap();

        assert_eq!(zone.kind, ZoneKind::Demand);
        assert_eq!(zone.low, 99.75);
        assert_eq!(zone.high, 100.5);
    }

    #[test]
    fn test_supply_zone_from_bullish_base() {
        let w = window((100.0, 100.75, 99.75, 100.5), (100.5, 100.6, 97.5, 97.75));
        let zone = detect(&w, 1.0).unwrap();

        assert_eq!(zone.kind, ZoneKind::Supply);
        assert_eq!(zone.high, 100.75);
        assert_eq!(zone.low, 100.0);
    }

    #[test]
    fn test_weak_impulse_ignored() {
        // Range 1.4 is not above 1.5 x ATR of 1.0
        let w = window((100.5, 100.75, 99.75, 100.0), (100.0, 101.4, 100.0, 101.3));
        assert!(detect(&w, 1.0).is_none());
    }

    #[test]
    fn test_requires_reversal_of_previous_bar() {
        // Both bars bullish
        let w = window((100.0, 100.75, 99.75, 100.5), (100.5, 103.0, 100.4, 102.8));
        assert!(detect(&w, 1.0).is_none());
    }
}
