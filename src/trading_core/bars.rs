//! Rolling bar window
//!
//! Keeps the last few bars of the full price series so detectors can look
//! back by offset (`0` = current bar, `1` = previous, ...). The window is
//! part of the series, not of the trading day, and is never cleared.

use std::collections::VecDeque;

use crate::types::Bar;

/// Deepest lookback any detector needs is 3 bars ago.
pub const WINDOW_CAPACITY: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct BarWindow {
    bars: VecDeque<Bar>,
    seen: usize,
}

impl BarWindow {
    pub fn new() -> Self {
        Self {
            bars: VecDeque::with_capacity(WINDOW_CAPACITY),
            seen: 0,
        }
    }

    pub fn push(&mut self, bar: Bar) {
        if self.bars.len() == WINDOW_CAPACITY {
            self.bars.pop_front();
        }
        self.bars.push_back(bar);
        self.seen += 1;
    }

    /// Bar `n` positions back from the newest (0 = current)
    pub fn ago(&self, n: usize) -> Option<&Bar> {
        let len = self.bars.len();
        if n >= len {
            return None;
        }
        self.bars.get(len - 1 - n)
    }

    /// Zero-based index of the current bar within the whole series
    pub fn current_index(&self) -> usize {
        self.seen.saturating_sub(1)
    }

    /// Total bars pushed since construction
    pub fn seen(&self) -> usize {
        self.seen
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
