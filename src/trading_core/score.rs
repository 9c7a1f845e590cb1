//! Confluence scoring
//!
//! Five independent binary checks per direction, one point each:
//!
//! | Factor       | Long                         | Short                         |
//! |--------------|------------------------------|-------------------------------|
//! | trend        | fast MA > slow MA            | fast MA < slow MA             |
//! | sweep        | lows swept                   | highs swept                   |
//! | fvg          | close in bullish gap ±2 tick | close in bearish gap ±2 tick  |
//! | zone         | close in demand zone ±4 tick | close in supply zone ±4 tick  |
//! | price_action | bullish bar above OR mid     | bearish bar below OR mid      |

use serde::{Deserialize, Serialize};

use super::fvg::GapPolarity;
use super::indicators::IndicatorSnapshot;
use super::opening_range::RangeLevels;
use super::session::SessionState;
use super::sweep::SweepDirection;
use super::zones::ZoneKind;
use crate::types::{Bar, Direction};

pub const MAX_SCORE: u8 = 5;
pub const GAP_TOLERANCE_TICKS: f64 = 2.0;
pub const ZONE_TOLERANCE_TICKS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Trend,
    Sweep,
    Fvg,
    Zone,
    PriceAction,
}

impl Factor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Factor::Trend => "trend",
            Factor::Sweep => "sweep",
            Factor::Fvg => "fvg",
            Factor::Zone => "zone",
            Factor::PriceAction => "price_action",
        }
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceScore {
    pub direction: Direction,
    pub factors: Vec<Factor>,
}

impl ConfluenceScore {
    pub fn total(&self) -> u8 {
        self.factors.len() as u8
    }

    pub fn has(&self, factor: Factor) -> bool {
        self.factors.contains(&factor)
    }
}

/// Everything the scorer reads for one bar
pub struct ScoreContext<'a> {
    pub bar: &'a Bar,
    pub indicators: IndicatorSnapshot,
    pub range: &'a RangeLevels,
    pub session: &'a SessionState,
    pub tick_size: f64,
}

pub fn score(direction: Direction, ctx: &ScoreContext<'_>) -> ConfluenceScore {
    let bar = ctx.bar;
    let price = bar.close;
    let gap_tolerance = GAP_TOLERANCE_TICKS * ctx.tick_size;
    let zone_tolerance = ZONE_TOLERANCE_TICKS * ctx.tick_size;
    let midpoint = ctx.range.midpoint();

    let (trend, sweep, polarity, kind, price_action) = match direction {
        Direction::Long => (
            ctx.indicators.trend() > 0,
            SweepDirection::SweptLow,
            GapPolarity::Bullish,
            ZoneKind::Demand,
            bar.is_bullish() && price > midpoint,
        ),
        Direction::Short => (
            ctx.indicators.trend() < 0,
            SweepDirection::SweptHigh,
            GapPolarity::Bearish,
            ZoneKind::Supply,
            bar.is_bearish() && price < midpoint,
        ),
    };

    let checks = [
        (Factor::Trend, trend),
        (Factor::Sweep, ctx.session.sweep.direction == sweep),
        (Factor::Fvg, ctx.session.gaps.any_contains(polarity, price, gap_tolerance)),
        (Factor::Zone, ctx.session.zones.any_contains(kind, price, zone_tolerance)),
        (Factor::PriceAction, price_action),
    ];

    ConfluenceScore {
        direction,
        factors: checks
            .into_iter()
            .filter_map(|(factor, hit)| hit.then_some(factor))
            .collect(),
    }
}

/// Pick the side to trade: it must reach `min_score` and strictly beat the
/// other side. Ties never trade.
pub fn choose_direction(long: u8, short: u8, min_score: u8) -> Option<Direction> {
    if long >= min_score && long > short {
        Some(Direction::Long)
    } else if short >= min_score && short > long {
        Some(Direction::Short)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trading_core::fvg::Gap;
    use crate::trading_core::zones::Zone;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn session() -> SessionState {
        SessionState::for_day(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
    }

    fn range() -> RangeLevels {
        RangeLevels { high: 102.0, low: 100.0, range_ticks: 8.0 }
    }

    fn bar(open: f64, close: f64) -> Bar {
        let ts = Utc.with_ymd_and_hms(2025, 3, 10, 14, 0, 0).unwrap();
        Bar::new(ts, open, open.max(close) + 0.25, open.min(close) - 0.25, close)
    }

    fn bullish_trend() -> IndicatorSnapshot {
        IndicatorSnapshot { fast_ma: Some(101.5), slow_ma: Some(101.0), atr: Some(1.0) }
    }

    #[test]
    fn test_full_long_confluence() {
        let mut session = session();
        session.sweep.direction = SweepDirection::SweptLow;
        session.gaps.record(Gap { top: 101.5, bottom: 101.0, polarity: GapPolarity::Bullish });
        session.zones.record(Zone { high: 100.75, low: 100.25, kind: ZoneKind::Demand });

        let bar = bar(101.0, 101.75);
        let ctx = ScoreContext {
            bar: &bar,
            indicators: bullish_trend(),
            range: &range(),
            session: &session,
            tick_size: 0.25,
        };

        // Gap top 101.5 + 0.5 tolerance, zone high 100.75 + 1.0 tolerance
        let long = score(Direction::Long, &ctx);
        assert_eq!(long.total(), MAX_SCORE);

        let short = score(Direction::Short, &ctx);
        assert_eq!(short.total(), 0);
    }

    #[test]
    fn test_short_factors() {
        let mut session = session();
        session.sweep.direction = SweepDirection::SweptHigh;
        session.zones.record(Zone { high: 101.0, low: 100.75, kind: ZoneKind::Supply });

        let bar = bar(101.0, 100.5);
        let ctx = ScoreContext {
            bar: &bar,
            indicators: bullish_trend(),
            range: &range(),
            session: &session,
            tick_size: 0.25,
        };

        let short = score(Direction::Short, &ctx);
        assert_eq!(short.factors, vec![Factor::Sweep, Factor::Zone, Factor::PriceAction]);
        assert!(!short.has(Factor::Trend));

        // Same bar scores nothing but trend on the long side
        let long = score(Direction::Long, &ctx);
        assert_eq!(long.factors, vec![Factor::Trend]);
    }

    #[test]
    fn test_choose_direction() {
        assert_eq!(choose_direction(4, 1, 3), Some(Direction::Long));
        assert_eq!(choose_direction(1, 3, 3), Some(Direction::Short));
        assert_eq!(choose_direction(3, 3, 3), None);
        assert_eq!(choose_direction(2, 0, 3), None);
        assert_eq!(choose_direction(5, 4, 3), Some(Direction::Long));
    }
}
