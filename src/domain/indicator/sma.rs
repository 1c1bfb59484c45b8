//! Simple Moving Average.
//!
//! Mean of the last `period` values. With fewer than `period` values the
//! mean of everything available is returned; an empty input yields 0.

pub fn calculate_sma(data: &[f64], period: usize) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let window = if period == 0 || data.len() < period {
        data
    } else {
        &data[data.len() - period..]
    };
    window.iter().sum::<f64>() / window.len() as f64
}
