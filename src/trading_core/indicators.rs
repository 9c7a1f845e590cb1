//! Streaming indicators
//!
//! Updated once per bar on the full series (including warm-up and opening
//! range bars). Values follow the charting-platform conventions the strategy
//! was tuned on:
//! - SMA averages whatever is available until `period` values exist
//! - ATR seeds with high-low, then averages cumulatively until `period`
//!   bars exist, then switches to Wilder smoothing

use std::collections::VecDeque;

use crate::types::Bar;

/// Simple moving average over closes
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    values: VecDeque<f64>,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            values: VecDeque::with_capacity(period),
        }
    }

    pub fn update(&mut self, value: f64) {
        if self.values.len() == self.period {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    pub fn value(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }
}

/// Average True Range with Wilder smoothing
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    value: Option<f64>,
    prev_close: Option<f64>,
    count: usize,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            value: None,
            prev_close: None,
            count: 0,
        }
    }

    pub fn update(&mut self, bar: &Bar) {
        let true_range = match self.prev_close {
            None => bar.high - bar.low,
            Some(pc) => (bar.high - bar.low)
                .max((bar.high - pc).abs())
                .max((bar.low - pc).abs()),
        };

        self.value = Some(match self.value {
            None => true_range,
            Some(prev) if self.count < self.period => {
                (prev * self.count as f64 + true_range) / (self.count + 1) as f64
            }
            Some(prev) => (prev * (self.period - 1) as f64 + true_range) / self.period as f64,
        });

        self.prev_close = Some(bar.close);
        self.count += 1;
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

/// Point-in-time values read by the detectors and the scorer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorSnapshot {
    pub fast_ma: Option<f64>,
    pub slow_ma: Option<f64>,
    pub atr: Option<f64>,
}

impl IndicatorSnapshot {
    /// 1 = fast above slow, -1 = fast below slow, 0 = equal or unknown
    pub fn trend(&self) -> i8 {
        match (self.fast_ma, self.slow_ma) {
            (Some(fast), Some(slow)) if fast > slow => 1,
            (Some(fast), Some(slow)) if fast < slow => -1,
            _ => 0,
        }
    }
}

/// Fast/slow trend averages plus volatility
#[derive(Debug, Clone)]
pub struct Indicators {
    fast: Sma,
    slow: Sma,
    atr: Atr,
}

impl Indicators {
    pub fn new(fast_period: usize, slow_period: usize, atr_period: usize) -> Self {
        Self {
            fast: Sma::new(fast_period),
            slow: Sma::new(slow_period),
            atr: Atr::new(atr_period),
        }
    }

    pub fn update(&mut self, bar: &Bar) {
        self.fast.update(bar.close);
        self.slow.update(bar.close);
        self.atr.update(bar);
    }

    pub fn snapshot(&self) -> IndicatorSnapshot {
        IndicatorSnapshot {
            fast_ma: self.fast.value(),
            slow_ma: self.slow.value(),
            atr: self.atr.value(),
        }
    }
}
