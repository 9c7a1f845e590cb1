//! Gap lifecycle
//!
//! A gap is filled once a bar trades through its far boundary: below the
//! bottom for bullish gaps, above the top for bearish gaps. Filled gaps are
//! removed on that bar. Supply/demand zones are not managed here.

use super::fvg::GapBooks;
use crate::types::Bar;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub bullish_removed: usize,
    pub bearish_removed: usize,
}

impl PruneReport {
    pub fn total(&self) -> usize {
        self.bullish_removed + self.bearish_removed
    }
}

pub fn prune_filled_gaps(gaps: &mut GapBooks, bar: &Bar) -> PruneReport {
    PruneReport {
        bullish_removed: gaps.bullish.remove_where(|g| bar.low < g.bottom),
        bearish_removed: gaps.bearish.remove_where(|g| bar.high > g.top),
    }
}
