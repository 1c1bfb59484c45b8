//! Stochastic Oscillator (%K, %D).
//!
//! %K at bar i = (C[i] - LL) / (HH - LL) * 100 over the trailing k bars,
//! or 50 when HH == LL.
//! %D = SMA(%K, d), or the latest %K while fewer than d %K values exist.
//!
//! Both one decimal. Fewer than k bars yields (50, 50).

use crate::domain::indicator::{StochasticValue, calculate_sma, round_to};

pub const DEFAULT_K_PERIOD: usize = 14;
pub const DEFAULT_D_PERIOD: usize = 3;

pub fn calculate_stochastic(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    k_period: usize,
    d_period: usize,
) -> StochasticValue {
    let n = closes.len().min(highs.len()).min(lows.len());
    if k_period == 0 || n < k_period {
        return StochasticValue::NEUTRAL;
    }

    let k_values = percent_k_series(highs, lows, closes, n, k_period);
    let k = k_values.last().copied().unwrap_or(50.0);
    let d = if d_period == 0 || k_values.len() < d_period {
        k
    } else {
        calculate_sma(&k_values, d_period)
    };

    StochasticValue {
        k: round_to(k, 1),
        d: round_to(d, 1),
    }
}

/// %K for every index from `k_period - 1` to `n - 1`.
fn percent_k_series(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    n: usize,
    k_period: usize,
) -> Vec<f64> {
    (k_period - 1..n)
        .map(|i| {
            let start = i + 1 - k_period;
            let highest = highs[start..=i].iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let lowest = lows[start..=i].iter().copied().fold(f64::INFINITY, f64::min);
            if highest == lowest {
                50.0
            } else {
                (closes[i] - lowest) / (highest - lowest) * 100.0
            }
        })
        .collect()
}
