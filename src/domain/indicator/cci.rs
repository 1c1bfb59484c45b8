//! Commodity Channel Index.
//!
//! TP = (H + L + C) / 3
//! CCI = (TP_latest - SMA(TP, n)) / (0.015 * mean |TP - SMA| over the last n bars)
//!
//! One decimal. Zero with fewer than n bars or a zero mean deviation.

use crate::domain::indicator::{calculate_sma, round_to};

pub const DEFAULT_PERIOD: usize = 20;

pub fn calculate_cci(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> f64 {
    let n = closes.len().min(highs.len()).min(lows.len());
    if period == 0 || n < period {
        return 0.0;
    }

    let typical: Vec<f64> = (0..n).map(|i| (highs[i] + lows[i] + closes[i]) / 3.0).collect();
    let mean = calculate_sma(&typical, period);
    let window = &typical[n - period..];
    let mean_dev = window.iter().map(|tp| (tp - mean).abs()).sum::<f64>() / period as f64;

    if mean_dev == 0.0 {
        return 0.0;
    }

    round_to((typical[n - 1] - mean) / (0.015 * mean_dev), 1)
}
