//! RSI (Relative Strength Index).
//!
//! Uses a plain mean over the last `period` price changes rather than
//! Wilder's smoothing:
//! - avg_gain = sum(positive changes) / period
//! - avg_loss = sum(|negative changes|) / period
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss)), one decimal.
//! If avg_loss == 0: RSI = 100.
//! Fewer than `period + 1` closes: RSI = 50.

use crate::domain::indicator::round_to;

pub const DEFAULT_PERIOD: usize = 14;
pub const NEUTRAL_RSI: f64 = 50.0;

pub fn calculate_rsi(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return NEUTRAL_RSI;
    }

    let window = &closes[closes.len() - period - 1..];
    let mut gains = 0.0;
    let mut losses = 0.0;
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains += change;
        } else if change < 0.0 {
            losses -= change;
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;
    if avg_loss == 0.0 {
        return 100.0;
    }

    round_to(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)), 1)
}
