//! Swing point tracking
//!
//! A 3-bar pivot centred two bars back. Only the latest swing high and swing
//! low are kept.

use super::bars::BarWindow;

const MIN_BAR_INDEX: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SwingPoints {
    pub high: Option<f64>,
    pub low: Option<f64>,
}

/// Which swing levels changed on this bar
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SwingUpdate {
    pub new_high: Option<f64>,
    pub new_low: Option<f64>,
}

impl SwingPoints {
    pub fn update(&mut self, window: &BarWindow) -> SwingUpdate {
        let mut update = SwingUpdate::default();
        if window.current_index() < MIN_BAR_INDEX {
            return update;
        }
        let (Some(newer), Some(pivot), Some(older)) = (window.ago(1), window.ago(2), window.ago(3))
        else {
            return update;
        };

        if pivot.high > older.high && pivot.high > newer.high {
            self.high = Some(pivot.high);
            update.new_high = Some(pivot.high);
        }

        if pivot.low < older.low && pivot.low < newer.low {
            self.low = Some(pivot.low);
            update.new_low = Some(pivot.low);
        }

        update
    }
}
