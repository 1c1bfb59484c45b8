//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the SMA of the first n values, then
//! `ema = (value - ema) * k + ema` for every later value in order.
//! With fewer than n values the last value is returned (0 when empty).

use crate::domain::indicator::sma::calculate_sma;

/// EMA at the last element of `data`.
pub fn calculate_ema(data: &[f64], period: usize) -> f64 {
    match ema_trajectory(data, period).last() {
        Some(&ema) => ema,
        None => data.last().copied().unwrap_or(0.0),
    }
}

/// EMA value after each element from index `period - 1` onward.
///
/// `ema_trajectory(data, n)[j]` equals `calculate_ema(&data[..n + j], n)`
/// bit for bit, so callers needing the EMA of every prefix can take one pass.
/// Empty when `period` is 0 or longer than `data`.
pub fn ema_trajectory(data: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || data.len() < period {
        return Vec::new();
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = calculate_sma(&data[..period], period);
    let mut values = Vec::with_capacity(data.len() - period + 1);
    values.push(ema);

    for &value in &data[period..] {
        ema = (value - ema) * k + ema;
        values.push(ema);
    }

    values
}
