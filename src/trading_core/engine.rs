//! SMC decision engine
//!
//! Drives one instrument through the per-bar pipeline and turns fills into
//! risk state. Processing order for a bar:
//!
//! 1. bar window + indicators (every bar, never reset)
//! 2. warm-up gate
//! 3. day change reset
//! 4. opening range: build while in window, freeze on first bar after
//! 5. trading window gate
//! 6. FVG, S/D zones, swings, sweeps, gap pruning
//! 7. risk gate, confluence score, direction choice

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::bars::BarWindow;
use super::fvg::{self, GapPolarity};
use super::indicators::Indicators;
use super::lifecycle::prune_filled_gaps;
use super::opening_range::{FreezeOutcome, RangeLevels};
use super::risk::{GateDecision, RiskLimits};
use super::score::{choose_direction, score, ConfluenceScore, ScoreContext, MAX_SCORE};
use super::session::{SessionClock, SessionState};
use super::sweep::SweepSource;
use super::zones::{self, ZoneKind};
use crate::execution::config::StrategyConfig;
use crate::execution::order::{EntryIntent, FillEvent, OrderLabel};
use crate::types::{Bar, Direction, MarketPosition};

/// Position as seen by the strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    /// Intent emitted, no entry fill yet
    PendingEntry(Direction),
    Long,
    Short,
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    /// A trade is open or about to be
    pub fn has_trade(&self) -> bool {
        !self.is_flat()
    }
}

impl From<MarketPosition> for PositionState {
    fn from(position: MarketPosition) -> Self {
        match position {
            MarketPosition::Flat => PositionState::Flat,
            MarketPosition::Long => PositionState::Long,
            MarketPosition::Short => PositionState::Short,
        }
    }
}

/// What a fill did to the strategy's position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillOutcome {
    Ignored,
    Entered(PositionState),
    /// Position changed without going flat
    Adjusted(PositionState),
    Closed { profit: f64, cooldown: bool },
}

/// Long and short scores of the last fully evaluated bar
#[derive(Debug, Clone, PartialEq)]
pub struct BarScores {
    pub long: ConfluenceScore,
    pub short: ConfluenceScore,
}

pub struct SmcEngine {
    config: StrategyConfig,
    clock: SessionClock,
    limits: RiskLimits,
    window: BarWindow,
    indicators: Indicators,
    state: SessionState,
    position: PositionState,
    last_scores: Option<BarScores>,
    last_gate: GateDecision,
}

impl SmcEngine {
    pub fn new(config: StrategyConfig) -> Self {
        info!(
            "SMC engine loaded | ORB={}min | SL={} TP={} Trail={} | MinScore={} | MaxTrades={} MaxLoss=${:.2} | Cooldown={}min",
            config.opening_range_minutes,
            config.stop_loss_ticks,
            config.profit_target_ticks,
            config.trail_stop_ticks,
            config.min_score,
            config.max_daily_trades,
            config.max_daily_loss,
            config.cooldown_minutes
        );

        Self {
            clock: config.session_clock(),
            limits: config.risk_limits(),
            window: BarWindow::new(),
            indicators: Indicators::new(
                config.fast_ma_period,
                config.slow_ma_period,
                config.atr_period,
            ),
            state: SessionState::default(),
            position: PositionState::Flat,
            last_scores: None,
            last_gate: GateDecision::Open,
            config,
        }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.state
    }

    /// Mutable per-day state, for seeding scenarios
    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn position(&self) -> PositionState {
        self.position
    }

    pub fn last_scores(&self) -> Option<&BarScores> {
        self.last_scores.as_ref()
    }

    /// Most recent gate result; `Open` until the gate first blocks
    pub fn last_gate(&self) -> GateDecision {
        self.last_gate
    }

    pub fn bars_seen(&self) -> usize {
        self.window.seen()
    }

    /// Process one closed bar. Returns an entry intent when the bar
    /// produces a trade decision.
    pub fn on_bar(&mut self, bar: &Bar) -> Option<EntryIntent> {
        self.window.push(*bar);
        self.indicators.update(bar);
        self.last_scores = None;

        if self.window.current_index() < self.config.warmup_bars {
            return None;
        }

        let (day, time) = self.clock.local(bar.timestamp);
        if self.state.roll_day(day) {
            info!("=== NEW DAY: {} ===", day.format("%Y-%m-%d"));
            // An entry never filled by the end of its session is dead
            if self.release_pending_entry() {
                warn!("Unfilled entry from the previous session dropped");
            }
        }

        if self.clock.in_opening_window(time) {
            self.state.opening_range.update(bar);
            return None;
        }

        if self.clock.opening_window_closed(time) && self.state.opening_range.is_building() {
            let outcome = self
                .state
                .opening_range
                .freeze(self.config.tick_size, self.config.min_range_ticks as f64);
            match outcome {
                Some(FreezeOutcome::Accepted(levels)) => {
                    info!(
                        "*** ORB SET *** High: {:.2} Low: {:.2} Range: {:.0} ticks",
                        levels.high, levels.low, levels.range_ticks
                    );
                }
                Some(FreezeOutcome::TooNarrow(levels)) => {
                    warn!(
                        "ORB RANGE TOO SMALL ({:.0} < {}) - SKIPPING DAY",
                        levels.range_ticks, self.config.min_range_ticks
                    );
                    return None;
                }
                None => {}
            }
        }

        let range = *self.state.opening_range.levels()?;

        if self.clock.trading_closed(time) {
            return None;
        }

        self.scan_structure(bar, &range);

        let gate = self
            .state
            .risk
            .check(bar.timestamp, &self.limits, self.position.is_flat());
        if gate != self.last_gate {
            match gate {
                GateDecision::Open => {}
                GateDecision::MaxTrades { count } => {
                    info!("Max daily trades reached ({}), no more entries today", count)
                }
                GateDecision::MaxLoss { pnl } => {
                    warn!("Daily loss limit reached: ${:.2}", pnl)
                }
                GateDecision::Cooldown { until } => {
                    debug!("Cooling down until {}", until.format("%H:%M:%S"))
                }
                GateDecision::PositionOpen => debug!("Position open, waiting for exit"),
            }
            self.last_gate = gate;
        }
        if !gate.is_open() {
            return None;
        }

        let ctx = ScoreContext {
            bar,
            indicators: self.indicators.snapshot(),
            range: &range,
            session: &self.state,
            tick_size: self.config.tick_size,
        };
        let long = score(Direction::Long, &ctx);
        let short = score(Direction::Short, &ctx);
        let chosen = choose_direction(long.total(), short.total(), self.config.min_score);
        let scores = BarScores { long, short };

        let intent = chosen.map(|direction| self.enter(direction, bar, &scores));
        self.last_scores = Some(scores);
        intent
    }

    /// Structure detection and gap lifecycle for one tradable bar
    fn scan_structure(&mut self, bar: &Bar, range: &RangeLevels) {
        if let Some(gap) = fvg::detect(&self.window, self.config.min_gap_size()) {
            if self.state.gaps.record(gap) {
                let side = match gap.polarity {
                    GapPolarity::Bullish => "BULL",
                    GapPolarity::Bearish => "BEAR",
                };
                debug!("  [FVG] {} gap: {:.2} - {:.2}", side, gap.bottom, gap.top);
            }
        }

        if let Some(atr) = self.indicators.snapshot().atr {
            if let Some(zone) = zones::detect(&self.window, atr) {
                if self.state.zones.record(zone) {
                    let side = match zone.kind {
                        ZoneKind::Demand => "DEMAND",
                        ZoneKind::Supply => "SUPPLY",
                    };
                    debug!("  [S/D] {} zone: {:.2} - {:.2}", side, zone.low, zone.high);
                }
            }
        }

        let swing = self.state.swings.update(&self.window);
        if swing.new_high.is_some() || swing.new_low.is_some() {
            debug!(
                "  [SWING] high={:?} low={:?}",
                self.state.swings.high, self.state.swings.low
            );
        }

        let swings = self.state.swings;
        for trigger in self.state.sweep.detect(bar, range, &swings) {
            let name = match trigger.source {
                SweepSource::RangeHigh => "ORB HIGH",
                SweepSource::RangeLow => "ORB LOW",
                SweepSource::SwingHigh => "Swing High",
                SweepSource::SwingLow => "Swing Low",
            };
            info!(
                "  [SWEEP] {} swept @ {:.2} | High={:.2} Low={:.2} Close={:.2}",
                name, trigger.level, bar.high, bar.low, bar.close
            );
        }
        if self
            .state
            .sweep
            .expire(bar.timestamp, self.config.sweep_expiry())
        {
            debug!("  [SWEEP] expired at {}", bar.timestamp.format("%H:%M:%S"));
        }

        let pruned = prune_filled_gaps(&mut self.state.gaps, bar);
        if pruned.total() > 0 {
            debug!(
                "  [FVG] filled: {} bull, {} bear",
                pruned.bullish_removed, pruned.bearish_removed
            );
        }
    }

    fn enter(&mut self, direction: Direction, bar: &Bar, scores: &BarScores) -> EntryIntent {
        let score = match direction {
            Direction::Long => scores.long.clone(),
            Direction::Short => scores.short.clone(),
        };

        self.state.risk.record_entry();
        self.position = PositionState::PendingEntry(direction);

        let snapshot = self.indicators.snapshot();
        let factors: Vec<&str> = score.factors.iter().map(|f| f.as_str()).collect();
        info!(
            ">>> {} #{} @ {:.2} | Score: {}/{} | SMA{}={:.2} SMA{}={:.2} | ATR={:.2} | {}",
            direction,
            self.state.risk.trade_count,
            bar.close,
            score.total(),
            MAX_SCORE,
            self.config.fast_ma_period,
            snapshot.fast_ma.unwrap_or_default(),
            self.config.slow_ma_period,
            snapshot.slow_ma.unwrap_or_default(),
            snapshot.atr.unwrap_or_default(),
            factors.join(",")
        );

        EntryIntent {
            id: Uuid::new_v4(),
            label: OrderLabel::entry_for(direction),
            direction,
            quantity: 1,
            stop_loss_ticks: self.config.stop_loss_ticks,
            profit_target_ticks: self.config.profit_target_ticks,
            trail_stop_ticks: self.config.trail_stop_ticks,
            price: bar.close,
            timestamp: bar.timestamp,
            score,
        }
    }

    /// Apply an execution report
    pub fn on_fill(&mut self, fill: &FillEvent) -> FillOutcome {
        let Some(label) = fill.label() else {
            debug!("Ignoring fill for unknown order '{}'", fill.order_label);
            return FillOutcome::Ignored;
        };

        info!(
            "FILL: {} @ {:.2} at {}",
            label,
            fill.fill_price,
            fill.timestamp.format("%H:%M:%S")
        );

        if let Some(direction) = label.entry_direction() {
            if self.position != PositionState::PendingEntry(direction) {
                warn!("Entry fill '{}' without a matching pending entry, ignored", label);
                return FillOutcome::Ignored;
            }
            self.position = fill.resulting_position.into();
            return FillOutcome::Entered(self.position);
        }

        if !self.position.has_trade() {
            debug!("Exit fill '{}' with no open trade, ignored", label);
            return FillOutcome::Ignored;
        }

        if !fill.resulting_position.is_flat() {
            self.position = fill.resulting_position.into();
            return FillOutcome::Adjusted(self.position);
        }

        self.position = PositionState::Flat;
        let risk = &mut self.state.risk;
        risk.record_close(fill.realized_profit);
        let result = if fill.realized_profit >= 0.0 { "WIN" } else { "LOSS" };
        info!(
            ">>> {} ${:.2} | Daily PnL: ${:.2} | Trades: {}",
            result, fill.realized_profit, risk.realized_pnl, risk.trade_count
        );

        let cooldown = label.is_stop_out();
        if cooldown {
            risk.arm_cooldown(fill.timestamp);
            info!(
                "!!! COOLDOWN STARTED - no entries for {} min until {}",
                self.config.cooldown_minutes,
                (fill.timestamp + self.limits.cooldown).format("%H:%M:%S")
            );
        }

        FillOutcome::Closed {
            profit: fill.realized_profit,
            cooldown,
        }
    }

    /// Order management refused an entry. Clears the pending entry; the
    /// trade still counts toward the daily limit.
    pub fn on_entry_rejected(&mut self, label: OrderLabel) {
        match (label.entry_direction(), self.position) {
            (Some(direction), PositionState::PendingEntry(pending)) if direction == pending => {
                warn!("Entry '{}' rejected, back to flat", label);
                self.release_pending_entry();
            }
            _ => debug!("Rejection for '{}' does not match a pending entry", label),
        }
    }

    /// Return a pending entry to flat. Used when no fill will ever follow
    /// (signal-only runs, stale entries). True if one was pending.
    pub fn release_pending_entry(&mut self) -> bool {
        if matches!(self.position, PositionState::PendingEntry(_)) {
            self.position = PositionState::Flat;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trading_core::fvg::Gap;
    use crate::trading_core::opening_range::OpeningRange;
    use crate::trading_core::score::Factor;
    use crate::trading_core::sweep::SweepDirection;
    use crate::trading_core::zones::Zone;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
    }

    fn config() -> StrategyConfig {
        StrategyConfig {
            timezone: chrono_tz::UTC,
            warmup_bars: 0,
            opening_range_minutes: 5,
            ..Default::default()
        }
    }

    fn flat_bar(ts: DateTime<Utc>, high: f64, low: f64) -> Bar {
        let mid = (high + low) / 2.0;
        Bar::new(ts, mid, high, low, mid)
    }

    fn fill(label: &str, position: MarketPosition, ts: DateTime<Utc>, profit: f64) -> FillEvent {
        FillEvent {
            order_label: label.to_string(),
            fill_price: 100.0,
            quantity: 1,
            resulting_position: position,
            timestamp: ts,
            realized_profit: profit,
        }
    }

    /// Engine with a frozen 100-102 range on 2025-03-10 and the bar window
    /// primed with the opening bars.
    fn engine_with_range() -> SmcEngine {
        let mut engine = SmcEngine::new(config());
        for minute in 30..=35 {
            engine.on_bar(&flat_bar(at(9, minute), 102.0, 100.0));
        }
        engine
    }

    #[test]
    fn test_warmup_skips_everything() {
        let mut engine = SmcEngine::new(StrategyConfig {
            warmup_bars: 30,
            ..config()
        });
        for minute in 30..40 {
            assert!(engine.on_bar(&flat_bar(at(9, minute), 102.0, 100.0)).is_none());
        }
        assert_eq!(engine.session().day, None);
        assert_eq!(engine.bars_seen(), 10);
    }

    #[test]
    fn test_opening_range_freezes_on_first_bar_after_window() {
        let mut engine = engine_with_range();
        assert!(engine.session().opening_range.is_building());

        engine.on_bar(&flat_bar(at(9, 36), 101.5, 100.5));
        let levels = *engine.session().opening_range.levels().unwrap();
        assert_eq!(levels.high, 102.0);
        assert_eq!(levels.low, 100.0);
        assert_eq!(levels.range_ticks, 8.0);

        // Later bars outside the range never move it
        engine.on_bar(&flat_bar(at(9, 37), 110.0, 90.0));
        assert_eq!(engine.session().opening_range.levels(), Some(&levels));
    }

    #[test]
    fn test_narrow_range_blocks_the_day() {
        let mut engine = SmcEngine::new(StrategyConfig { min_score: 1, ..config() });
        for minute in 30..=35 {
            engine.on_bar(&flat_bar(at(9, minute), 100.5, 100.0));
        }

        for minute in 36..60 {
            let close = 100.5 + minute as f64 * 0.1;
            let bar = Bar::new(at(9, minute), close - 0.5, close + 0.25, close - 0.75, close);
            assert!(engine.on_bar(&bar).is_none());
        }
        assert!(matches!(engine.session().opening_range, OpeningRange::Rejected(_)));
        assert_eq!(engine.session().risk.trade_count, 0);
    }

    #[test]
    fn test_no_range_without_window_bars() {
        let mut engine = SmcEngine::new(config());
        engine.on_bar(&flat_bar(at(10, 0), 102.0, 100.0));
        assert_eq!(engine.session().opening_range, OpeningRange::Waiting);
        assert!(engine.last_scores().is_none());
    }

    #[test]
    fn test_last_trade_of_the_day_then_blocked() {
        let mut engine = engine_with_range();
        engine.on_bar(&flat_bar(at(9, 36), 101.5, 100.5));

        let session = engine.session_mut();
        session.risk.trade_count = 7;
        session.sweep.direction = SweepDirection::SweptLow;
        session.sweep.detected_at = Some(at(9, 36));
        session.gaps.record(Gap { top: 101.5, bottom: 100.75, polarity: GapPolarity::Bullish });
        session.zones.record(Zone { high: 101.25, low: 101.0, kind: ZoneKind::Demand });
        session.zones.record(Zone { high: 101.5, low: 101.25, kind: ZoneKind::Supply });

        // Long: sweep, fvg, zone, price action. Short: zone only.
        // Fast and slow MA average the same closes, so no trend point.
        let bar = Bar::new(at(9, 37), 101.0, 101.5, 100.9, 101.25);
        let intent = engine.on_bar(&bar).expect("long intent");

        assert_eq!(intent.direction, Direction::Long);
        assert_eq!(intent.label, OrderLabel::EntryLong);
        assert_eq!(intent.quantity, 1);
        assert_eq!(intent.stop_loss_ticks, 24);
        assert_eq!(intent.trail_stop(), Some(16));
        assert_eq!(intent.price, 101.25);

        let scores = engine.last_scores().unwrap();
        assert_eq!(scores.long.total(), 4);
        assert!(!scores.long.has(Factor::Trend));
        assert_eq!(scores.short.total(), 1);

        assert_eq!(engine.session().risk.trade_count, 8);
        assert_eq!(engine.position(), PositionState::PendingEntry(Direction::Long));

        assert_eq!(
            engine.on_fill(&fill("SMC Long", MarketPosition::Long, at(9, 37), 0.0)),
            FillOutcome::Entered(PositionState::Long)
        );
        engine.on_fill(&fill("Profit target", MarketPosition::Flat, at(9, 40), 240.0));
        assert!(engine.position().is_flat());

        assert!(engine.on_bar(&bar).is_none());
        assert_eq!(engine.last_gate(), GateDecision::MaxTrades { count: 8 });
    }

    #[test]
    fn test_stop_loss_fill_arms_cooldown() {
        let mut engine = engine_with_range();
        engine.position = PositionState::Long;

        let outcome = engine.on_fill(&fill("Stop loss", MarketPosition::Flat, at(9, 45), -120.0));
        assert_eq!(outcome, FillOutcome::Closed { profit: -120.0, cooldown: true });

        let risk = engine.session().risk;
        assert_eq!(risk.realized_pnl, -120.0);
        assert_eq!(risk.cooldown_started_at, Some(at(9, 45)));
        assert!(engine.position().is_flat());
    }

    #[test]
    fn test_profit_target_does_not_arm_cooldown() {
        let mut engine = engine_with_range();
        engine.position = PositionState::Short;

        engine.on_fill(&fill("Profit target", MarketPosition::Flat, at(9, 45), 240.0));
        assert!(!engine.session().risk.cooldown_active());
        assert_eq!(engine.session().risk.realized_pnl, 240.0);
    }

    #[test]
    fn test_ignored_fills() {
        let mut engine = engine_with_range();

        let fills = [
            fill("Manual close", MarketPosition::Flat, at(9, 45), -50.0),
            fill("Stop loss", MarketPosition::Flat, at(9, 45), -50.0),
            fill("SMC Short", MarketPosition::Short, at(9, 45), 0.0),
        ];
        for f in &fills {
            assert_eq!(engine.on_fill(f), FillOutcome::Ignored);
        }

        assert_eq!(engine.session().risk, Default::default());
        assert!(engine.position().is_flat());
    }

    #[test]
    fn test_entry_rejection_clears_pending() {
        let mut engine = engine_with_range();
        engine.position = PositionState::PendingEntry(Direction::Short);

        engine.on_entry_rejected(OrderLabel::EntryLong);
        assert_eq!(engine.position(), PositionState::PendingEntry(Direction::Short));

        engine.on_entry_rejected(OrderLabel::EntryShort);
        assert!(engine.position().is_flat());
    }

    #[test]
    fn test_new_day_resets_session_state() {
        let mut engine = engine_with_range();
        engine.on_bar(&flat_bar(at(9, 36), 101.5, 100.5));
        engine.session_mut().risk.trade_count = 3;

        let next_day = Utc.with_ymd_and_hms(2025, 3, 11, 9, 0, 0).unwrap();
        engine.on_bar(&flat_bar(next_day, 101.0, 100.0));

        let session = engine.session();
        assert_eq!(session.day, NaiveDate::from_ymd_opt(2025, 3, 11));
        assert_eq!(session.risk.trade_count, 0);
        assert_eq!(session.opening_range, OpeningRange::Waiting);
        // Series-level state survives
        assert_eq!(engine.bars_seen(), 8);
    }

    #[test]
    fn test_no_evaluation_after_trade_end() {
        let mut engine = engine_with_range();
        engine.on_bar(&flat_bar(at(9, 36), 101.5, 100.5));

        engine.on_bar(&flat_bar(at(15, 45), 101.5, 100.5));
        assert!(engine.last_scores().is_some());

        engine.on_bar(&flat_bar(at(15, 50), 101.5, 100.5));
        assert!(engine.last_scores().is_none());
    }

    #[test]
    fn test_range_high_sweep_goes_short() {
        let mut engine = SmcEngine::new(StrategyConfig { min_score: 2, ..config() });
        for minute in 30..=35 {
            engine.on_bar(&flat_bar(at(9, minute), 102.0, 100.0));
        }

        // Wick above the range high, bearish close below the midpoint
        let bar = Bar::new(at(9, 36), 101.5, 102.5, 100.5, 100.75);
        let intent = engine.on_bar(&bar).expect("short intent");

        assert_eq!(intent.direction, Direction::Short);
        assert_eq!(intent.label, OrderLabel::EntryShort);
        assert_eq!(intent.score.factors, vec![Factor::Sweep, Factor::PriceAction]);
        assert_eq!(engine.last_scores().unwrap().long.total(), 0);
        assert_eq!(engine.session().sweep.direction, SweepDirection::SweptHigh);
        assert!(engine.session().sweep.range_high_swept);
        assert_eq!(engine.position(), PositionState::PendingEntry(Direction::Short));

        let entered = engine.on_fill(&fill("SMC Short", MarketPosition::Short, at(9, 36), 0.0));
        assert_eq!(entered, FillOutcome::Entered(PositionState::Short));

        let closed = engine.on_fill(&fill("Profit target", MarketPosition::Flat, at(9, 50), 240.0));
        assert_eq!(closed, FillOutcome::Closed { profit: 240.0, cooldown: false });
        assert!(engine.position().is_flat());
    }

    #[test]
    fn test_partial_exit_keeps_trade_open() {
        let mut engine = engine_with_range();
        engine.position = PositionState::Long;

        let partial = fill("Profit target", MarketPosition::Long, at(9, 40), 120.0);
        let outcome = engine.on_fill(&partial);
        assert_eq!(outcome, FillOutcome::Adjusted(PositionState::Long));
        assert_eq!(engine.session().risk.realized_pnl, 0.0);
        assert!(!engine.session().risk.cooldown_active());

        let outcome = engine.on_fill(&fill("Trail stop", MarketPosition::Flat, at(9, 42), 60.0));
        assert_eq!(outcome, FillOutcome::Closed { profit: 60.0, cooldown: true });
        assert_eq!(engine.session().risk.realized_pnl, 60.0);
    }

    #[test]
    fn test_daily_loss_limit_blocks_a_scoring_bar() {
        let mut engine = SmcEngine::new(StrategyConfig { min_score: 2, ..config() });
        for minute in 30..=35 {
            engine.on_bar(&flat_bar(at(9, minute), 102.0, 100.0));
        }
        engine.position = PositionState::Long;
        engine.on_fill(&fill("Exit on session close", MarketPosition::Flat, at(9, 35), -300.0));

        // Would score sweep + price action on the long side
        let bar = Bar::new(at(9, 36), 100.5, 101.5, 99.5, 101.25);
        assert!(engine.on_bar(&bar).is_none());
        assert_eq!(engine.last_gate(), GateDecision::MaxLoss { pnl: -300.0 });
        assert!(engine.last_scores().is_none());
    }

    #[test]
    fn test_unfilled_entry_dropped_at_day_rollover() {
        let mut engine = SmcEngine::new(StrategyConfig { min_score: 2, ..config() });
        let sweep_day = |day: u32| {
            let at = |minute| Utc.with_ymd_and_hms(2025, 3, day, 9, minute, 0).unwrap();
            let mut bars: Vec<Bar> = (30..=35).map(|m| flat_bar(at(m), 102.0, 100.0)).collect();
            bars.push(Bar::new(at(36), 100.5, 101.5, 99.5, 101.25));
            bars
        };

        let mut intents = 0;
        for day in 10..=12 {
            for bar in sweep_day(day) {
                if engine.on_bar(&bar).is_some() {
                    intents += 1;
                }
            }
            assert_eq!(engine.position(), PositionState::PendingEntry(Direction::Long));
        }

        assert_eq!(intents, 3);
    }

    #[test]
    fn test_release_pending_entry_only_touches_pending() {
        let mut engine = engine_with_range();
        assert!(!engine.release_pending_entry());

        engine.position = PositionState::Short;
        assert!(!engine.release_pending_entry());
        assert_eq!(engine.position(), PositionState::Short);

        engine.position = PositionState::PendingEntry(Direction::Long);
        assert!(engine.release_pending_entry());
        assert!(engine.position().is_flat());
    }
}
