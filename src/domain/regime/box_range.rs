//! Box-range (consolidation) and breakout detection.
//!
//! Over the trailing `lookback` bars, the box is bounded by the highest high
//! and lowest low of every bar except the latest one. The latest close is
//! then tested against the box:
//! - in box: box width < 10% of the bottom
//! - breakout UP: close > top * 1.02
//! - breakout DOWN: close < bottom * 0.98

use crate::domain::indicator::round_to;
use serde::Serialize;

pub const DEFAULT_LOOKBACK: usize = 20;
const MAX_BOX_WIDTH_PCT: f64 = 10.0;
const BREAKOUT_UP_FACTOR: f64 = 1.02;
const BREAKOUT_DOWN_FACTOR: f64 = 0.98;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Breakout {
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxRange {
    pub in_box: bool,
    pub breakout: Option<Breakout>,
    pub top: f64,
    pub bottom: f64,
    pub percent: f64,
}

impl Default for BoxRange {
    fn default() -> Self {
        Self {
            in_box: false,
            breakout: None,
            top: 0.0,
            bottom: 0.0,
            percent: 0.0,
        }
    }
}

pub fn detect_box_range(highs: &[f64], lows: &[f64], closes: &[f64], lookback: usize) -> BoxRange {
    let n = closes.len().min(highs.len()).min(lows.len());
    // the box needs at least one bar besides the latest
    if lookback < 2 || n < lookback {
        return BoxRange::default();
    }

    let start = n - lookback;
    let top = highs[start..n - 1].iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bottom = lows[start..n - 1].iter().copied().fold(f64::INFINITY, f64::min);
    let price = closes[n - 1];

    let percent = if bottom > 0.0 {
        (top - bottom) / bottom * 100.0
    } else {
        0.0
    };

    let breakout = if price > top * BREAKOUT_UP_FACTOR {
        Some(Breakout::Up)
    } else if price < bottom * BREAKOUT_DOWN_FACTOR {
        Some(Breakout::Down)
    } else {
        None
    };

    BoxRange {
        in_box: percent < MAX_BOX_WIDTH_PCT,
        breakout,
        top: round_to(top, 4),
        bottom: round_to(bottom, 4),
        percent: round_to(percent, 1),
    }
}
