//! Trading Core - SMC market structure and decision logic
//!
//! - Rolling bar window and streaming indicators (SMA, ATR)
//! - Opening range tracking
//! - Fair value gaps, supply/demand zones, swing points, liquidity sweeps
//! - Gap lifecycle
//! - Confluence scoring and the daily risk gate
//! - The per-bar decision engine

pub mod bars;
pub mod bounded;
pub mod engine;
pub mod fvg;
pub mod indicators;
pub mod lifecycle;
pub mod opening_range;
pub mod risk;
pub mod score;
pub mod session;
pub mod sweep;
pub mod swing;
pub mod zones;

// Re-export commonly used types
pub use bounded::{BoundedZones, MAX_ZONES};
pub use engine::{BarScores, FillOutcome, PositionState, SmcEngine};
pub use fvg::{Gap, GapPolarity};
pub use opening_range::{OpeningRange, RangeLevels};
pub use risk::{DailyRiskState, GateDecision, RiskLimits};
pub use score::{ConfluenceScore, Factor, MAX_SCORE};
pub use session::{SessionClock, SessionState};
pub use sweep::{SweepDirection, SweepState};
pub use swing::SwingPoints;
pub use zones::{Zone, ZoneKind};
