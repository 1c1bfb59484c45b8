//! Technical indicator implementations.
//!
//! Every function here is pure and answers for the most recent bar of its
//! input. Short input never errors; each indicator has a fixed neutral
//! fallback:
//!
//! | indicator  | fallback            |
//! |------------|---------------------|
//! | RSI        | 50                  |
//! | MACD       | (0, 0, 0)           |
//! | CCI        | 0                   |
//! | Stochastic | (50, 50)            |
//! | Ichimoku   | `None`              |

pub mod cci;
pub mod ema;
pub mod ichimoku;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use cci::calculate_cci;
pub use ema::{calculate_ema, ema_trajectory};
pub use ichimoku::calculate_ichimoku;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stochastic::calculate_stochastic;

use serde::Serialize;
use std::fmt;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Direction of a two-line crossover at the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cross {
    Bullish,
    Bearish,
}

impl Cross {
    /// Bullish when the fast line is strictly above the slow line.
    pub fn of(fast: f64, slow: f64) -> Self {
        if fast > slow {
            Cross::Bullish
        } else {
            Cross::Bearish
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacdValue {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

impl MacdValue {
    pub const NEUTRAL: MacdValue = MacdValue {
        line: 0.0,
        signal: 0.0,
        histogram: 0.0,
    };

    pub fn cross(&self) -> Cross {
        Cross::of(self.line, self.signal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StochasticValue {
    pub k: f64,
    pub d: f64,
}

impl StochasticValue {
    pub const NEUTRAL: StochasticValue = StochasticValue { k: 50.0, d: 50.0 };

    pub fn cross(&self) -> Cross {
        Cross::of(self.k, self.d)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloudColor {
    Green,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloudPosition {
    AboveCloud,
    BelowCloud,
    InCloud,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IchimokuSignal {
    StrongBullish,
    StrongBearish,
    Bullish,
    Bearish,
    Neutral,
}

impl IchimokuSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            IchimokuSignal::StrongBullish => "STRONG_BULLISH",
            IchimokuSignal::StrongBearish => "STRONG_BEARISH",
            IchimokuSignal::Bullish => "BULLISH",
            IchimokuSignal::Bearish => "BEARISH",
            IchimokuSignal::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for IchimokuSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ichimoku reading at the latest bar. Spans are evaluated at the current
/// bar, without the 26-bar chart displacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IchimokuValue {
    pub tenkan: f64,
    pub kijun: f64,
    pub senkou_a: f64,
    pub senkou_b: f64,
    pub cloud_top: f64,
    pub cloud_bottom: f64,
    pub cloud_color: CloudColor,
    pub price_position: CloudPosition,
    pub tk_cross: Cross,
    pub signal: IchimokuSignal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_places() {
        assert_eq!(round_to(1.23456, 1), 1.2);
        assert_eq!(round_to(1.25001, 1), 1.3);
        assert_eq!(round_to(-0.123456, 4), -0.1235);
        assert_eq!(round_to(70.0, 2), 70.0);
    }

    #[test]
    fn cross_requires_strictly_above() {
        assert_eq!(Cross::of(2.0, 1.0), Cross::Bullish);
        assert_eq!(Cross::of(1.0, 1.0), Cross::Bearish);
        assert_eq!(Cross::of(0.5, 1.0), Cross::Bearish);
    }

    #[test]
    fn neutral_defaults() {
        assert_eq!(MacdValue::NEUTRAL.histogram, 0.0);
        assert_eq!(StochasticValue::NEUTRAL, StochasticValue { k: 50.0, d: 50.0 });
    }

    #[test]
    fn ichimoku_signal_display() {
        assert_eq!(IchimokuSignal::StrongBullish.to_string(), "STRONG_BULLISH");
        assert_eq!(IchimokuSignal::Neutral.to_string(), "NEUTRAL");
    }

    #[test]
    fn enums_serialize_screaming_snake() {
        let json = serde_json::to_string(&CloudPosition::AboveCloud).unwrap();
        assert_eq!(json, "\"ABOVE_CLOUD\"");
        let json = serde_json::to_string(&IchimokuSignal::StrongBearish).unwrap();
        assert_eq!(json, "\"STRONG_BEARISH\"");
    }
}
