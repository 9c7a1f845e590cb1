//! Notification relay payload
//!
//! Field names and casing match the relay's `POST /signal` body.

use serde::{Deserialize, Serialize};

use super::order::EntryIntent;
use crate::trading_core::score::MAX_SCORE;
use crate::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalAction {
    Buy,
    Sell,
    Hold,
}

impl From<Direction> for SignalAction {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Long => SignalAction::Buy,
            Direction::Short => SignalAction::Sell,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalEvent {
    pub symbol: String,
    pub action: SignalAction,
    pub price: f64,
    /// Score as a fraction of the maximum, 0.0 - 1.0
    pub confidence: f64,
    /// Names of the factors that scored
    pub indicators: Vec<String>,
    /// Unix epoch milliseconds
    pub timestamp: i64,
}

impl SignalEvent {
    pub fn from_intent(symbol: &str, intent: &EntryIntent) -> Self {
        Self {
            symbol: symbol.to_string(),
            action: intent.direction.into(),
            price: intent.price,
            confidence: intent.score.total() as f64 / MAX_SCORE as f64,
            indicators: intent
                .score
                .factors
                .iter()
                .map(|f| f.as_str().to_string())
                .collect(),
            timestamp: intent.timestamp.timestamp_millis(),
        }
    }
}
