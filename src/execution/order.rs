//! Entry intents and fill notifications exchanged with order management

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::trading_core::score::ConfluenceScore;
use crate::types::{Direction, MarketPosition};

/// Order names shared with the order-management side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderLabel {
    #[serde(rename = "SMC Long")]
    EntryLong,
    #[serde(rename = "SMC Short")]
    EntryShort,
    #[serde(rename = "Stop loss")]
    StopLoss,
    #[serde(rename = "Trail stop")]
    TrailStop,
    #[serde(rename = "Profit target")]
    ProfitTarget,
    #[serde(rename = "Exit on session close")]
    SessionClose,
}

impl OrderLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntryLong => "SMC Long",
            Self::EntryShort => "SMC Short",
            Self::StopLoss => "Stop loss",
            Self::TrailStop => "Trail stop",
            Self::ProfitTarget => "Profit target",
            Self::SessionClose => "Exit on session close",
        }
    }

    /// Unknown labels map to `None`
    pub fn parse(label: &str) -> Option<Self> {
        [
            Self::EntryLong,
            Self::EntryShort,
            Self::StopLoss,
            Self::TrailStop,
            Self::ProfitTarget,
            Self::SessionClose,
        ]
        .into_iter()
        .find(|l| l.as_str() == label)
    }

    pub fn entry_for(direction: Direction) -> Self {
        match direction {
            Direction::Long => Self::EntryLong,
            Direction::Short => Self::EntryShort,
        }
    }

    pub fn entry_direction(&self) -> Option<Direction> {
        match self {
            Self::EntryLong => Some(Direction::Long),
            Self::EntryShort => Some(Direction::Short),
            _ => None,
        }
    }

    /// Exits that arm the cooldown
    pub fn is_stop_out(&self) -> bool {
        matches!(self, Self::StopLoss | Self::TrailStop)
    }
}

impl std::fmt::Display for OrderLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry decision handed to order management
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryIntent {
    pub id: Uuid,
    pub label: OrderLabel,
    pub direction: Direction,
    pub quantity: u32,
    pub stop_loss_ticks: u32,
    pub profit_target_ticks: u32,
    /// 0 disables the trailing stop
    pub trail_stop_ticks: u32,
    /// Close of the signal bar
    pub price: f64,
    pub timestamp: DateTime<Utc>,
    pub score: ConfluenceScore,
}

impl EntryIntent {
    pub fn trail_stop(&self) -> Option<u32> {
        (self.trail_stop_ticks > 0).then_some(self.trail_stop_ticks)
    }
}

/// Execution report from order management
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillEvent {
    /// Kept as a string so unknown labels still parse and can be ignored
    pub order_label: String,
    pub fill_price: f64,
    pub quantity: u32,
    pub resulting_position: MarketPosition,
    pub timestamp: DateTime<Utc>,
    /// Realized profit of the trade this fill closed (currency)
    #[serde(default)]
    pub realized_profit: f64,
}

impl FillEvent {
    pub fn label(&self) -> Option<OrderLabel> {
        OrderLabel::parse(&self.order_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip_names() {
        assert_eq!(OrderLabel::parse("Stop loss"), Some(OrderLabel::StopLoss));
        assert_eq!(OrderLabel::parse("SMC Short"), Some(OrderLabel::EntryShort));
        assert_eq!(OrderLabel::parse("Manual"), None);
        assert_eq!(
            serde_json::to_string(&OrderLabel::TrailStop).unwrap(),
            "\"Trail stop\""
        );
    }

    #[test]
    fn test_stop_outs() {
        assert!(OrderLabel::StopLoss.is_stop_out());
        assert!(OrderLabel::TrailStop.is_stop_out());
        assert!(!OrderLabel::ProfitTarget.is_stop_out());
        assert!(!OrderLabel::SessionClose.is_stop_out());
    }

    #[test]
    fn test_fill_event_from_json() {
        let fill: FillEvent = serde_json::from_str(
            r#"{"order_label":"Stop loss","fill_price":21490.25,"quantity":1,
                "resulting_position":"flat","timestamp":"2025-03-10T13:45:00Z",
                "realized_profit":-120.0}"#,
        )
        .unwrap();

        assert_eq!(fill.label(), Some(OrderLabel::StopLoss));
        assert!(fill.resulting_position.is_flat());
        assert_eq!(fill.realized_profit, -120.0);
    }
}
