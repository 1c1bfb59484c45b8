//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow) over the whole series.
//! Signal Line = EMA(signal) of the MACD line's trajectory, i.e. the MACD
//! line as it stood at each bar from index `slow` to the latest.
//! Histogram = MACD Line - Signal Line
//!
//! All three rounded to four decimals. Fewer than `slow + signal` closes
//! yields (0, 0, 0), as does a fast period longer than the slow one.
//!
//! The trajectory comes from a single forward pass of each EMA
//! (see [`ema_trajectory`]) instead of re-running both EMAs on every prefix.

use crate::domain::indicator::{MacdValue, calculate_ema, ema_trajectory, round_to};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdValue {
    if fast == 0 || slow == 0 || signal_period == 0 || fast > slow {
        return MacdValue::NEUTRAL;
    }
    if closes.len() < slow + signal_period {
        return MacdValue::NEUTRAL;
    }

    let line_trajectory = macd_line_trajectory(closes, fast, slow);
    let line = line_trajectory.last().copied().unwrap_or(0.0);
    let signal = calculate_ema(&line_trajectory, signal_period);

    MacdValue {
        line: round_to(line, 4),
        signal: round_to(signal, 4),
        histogram: round_to(line - signal, 4),
    }
}

pub fn calculate_macd_default(closes: &[f64]) -> MacdValue {
    calculate_macd(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

/// MACD line evaluated on `closes[..=i]` for every `i` in `slow..len`.
fn macd_line_trajectory(closes: &[f64], fast: usize, slow: usize) -> Vec<f64> {
    let fast_ema = ema_trajectory(closes, fast);
    let slow_ema = ema_trajectory(closes, slow);

    // trajectory index j holds the EMA of closes[..period + j]
    (slow..closes.len())
        .map(|i| fast_ema[i + 1 - fast] - slow_ema[i + 1 - slow])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn naive_ema(data: &[f64], period: usize) -> f64 {
        if data.len() < period {
            return data.last().copied().unwrap_or(0.0);
        }
        let k = 2.0 / (period as f64 + 1.0);
        let mut ema = data[..period].iter().sum::<f64>() / period as f64;
        for &value in &data[period..] {
            ema = (value - ema) * k + ema;
        }
        ema
    }

    /// Per-prefix evaluation, quadratic in series length.
    fn macd_by_prefix(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdValue {
        if closes.len() < slow + signal_period {
            return MacdValue::NEUTRAL;
        }
        let line = naive_ema(closes, fast) - naive_ema(closes, slow);
        let history: Vec<f64> = (slow..closes.len())
            .map(|i| {
                let prefix = &closes[..=i];
                naive_ema(prefix, fast) - naive_ema(prefix, slow)
            })
            .collect();
        let signal = naive_ema(&history, signal_period);
        MacdValue {
            line: round_to(line, 4),
            signal: round_to(signal, 4),
            histogram: round_to(line - signal, 4),
        }
    }

    fn wave(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 8.0 + i as f64 * 0.1)
            .collect()
    }

    #[test]
    fn macd_insufficient_history_is_zero() {
        let closes: Vec<f64> = (0..34).map(|i| 100.0 + i as f64).collect();
        assert_eq!(calculate_macd_default(&closes), MacdValue::NEUTRAL);
    }

    #[test]
    fn macd_minimum_history_computes() {
        let closes: Vec<f64> = (0..35).map(|i| 100.0 + i as f64).collect();
        let macd = calculate_macd_default(&closes);
        assert!(macd.line > 0.0, "rising series should have positive MACD");
    }

    #[test]
    fn macd_flat_series_is_zero() {
        let closes = [50.0; 60];
        let macd = calculate_macd_default(&closes);
        assert_eq!(macd.line, 0.0);
        assert_eq!(macd.signal, 0.0);
        assert_eq!(macd.histogram, 0.0);
    }

    #[test]
    fn macd_line_is_fast_minus_slow() {
        let closes = wave(80);
        let macd = calculate_macd_default(&closes);
        let expected = calculate_ema(&closes, 12) - calculate_ema(&closes, 26);
        assert_eq!(macd.line, round_to(expected, 4));
    }

    #[test]
    fn macd_histogram_is_line_minus_signal() {
        let closes = wave(80);
        let macd = calculate_macd_default(&closes);
        assert!((macd.histogram - (macd.line - macd.signal)).abs() <= 2e-4);
    }

    #[test]
    fn macd_matches_prefix_evaluation_on_fixture() {
        let closes = wave(120);
        assert_eq!(
            calculate_macd_default(&closes),
            macd_by_prefix(&closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
        );
    }

    #[test]
    fn macd_zero_period_is_zero() {
        let closes = wave(80);
        assert_eq!(calculate_macd(&closes, 0, 26, 9), MacdValue::NEUTRAL);
        assert_eq!(calculate_macd(&closes, 12, 0, 9), MacdValue::NEUTRAL);
        assert_eq!(calculate_macd(&closes, 12, 26, 0), MacdValue::NEUTRAL);
    }

    #[test]
    fn macd_fast_longer_than_slow_is_zero() {
        let closes = wave(80);
        assert_eq!(calculate_macd(&closes, 26, 12, 9), MacdValue::NEUTRAL);
    }

    #[test]
    fn macd_default_constants() {
        assert_eq!(DEFAULT_FAST, 12);
        assert_eq!(DEFAULT_SLOW, 26);
        assert_eq!(DEFAULT_SIGNAL, 9);
    }

    proptest! {
        #[test]
        fn macd_single_pass_equals_prefix_evaluation(
            closes in prop::collection::vec(1.0f64..500.0, 0..90)
        ) {
            let fast = calculate_macd_default(&closes);
            let slow = macd_by_prefix(&closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL);
            prop_assert_eq!(fast.line.to_bits(), slow.line.to_bits());
            prop_assert_eq!(fast.signal.to_bits(), slow.signal.to_bits());
            prop_assert_eq!(fast.histogram.to_bits(), slow.histogram.to_bits());
        }

        #[test]
        fn macd_custom_periods_equal_prefix_evaluation(
            closes in prop::collection::vec(1.0f64..500.0, 0..40),
            fast in 1usize..6,
            extra in 1usize..6,
            signal in 1usize..5,
        ) {
            let slow = fast + extra;
            prop_assert_eq!(
                calculate_macd(&closes, fast, slow, signal),
                macd_by_prefix(&closes, fast, slow, signal)
            );
        }
    }
}
