//! Ichimoku Cloud.
//!
//! - Tenkan-sen: midpoint of highest high / lowest low over `tenkan` bars
//! - Kijun-sen: same over `kijun` bars
//! - Senkou Span A: (Tenkan + Kijun) / 2
//! - Senkou Span B: midpoint over `senkou_b` bars
//!
//! Both spans are taken at the current bar. Charting packages plot them 26
//! bars ahead (and the Chikou span 26 bars behind); this reading does not
//! displace anything, so the cloud here is the cloud being projected *from*
//! the latest bar, not the one a chart draws *under* it.
//!
//! Categorical fields are decided on unrounded values; numeric fields are
//! rounded to two decimals. Fewer than `senkou_b` bars yields `None`.

use crate::domain::indicator::{
    CloudColor, CloudPosition, Cross, IchimokuSignal, IchimokuValue, round_to,
};

pub const DEFAULT_TENKAN: usize = 9;
pub const DEFAULT_KIJUN: usize = 26;
pub const DEFAULT_SENKOU_B: usize = 52;

pub fn calculate_ichimoku(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    tenkan_period: usize,
    kijun_period: usize,
    senkou_b_period: usize,
) -> Option<IchimokuValue> {
    let n = closes.len().min(highs.len()).min(lows.len());
    if tenkan_period == 0 || kijun_period == 0 || senkou_b_period == 0 {
        return None;
    }
    if n < senkou_b_period || n < kijun_period || n < tenkan_period {
        return None;
    }

    let tenkan = midpoint(&highs[..n], &lows[..n], tenkan_period);
    let kijun = midpoint(&highs[..n], &lows[..n], kijun_period);
    let senkou_a = (tenkan + kijun) / 2.0;
    let senkou_b = midpoint(&highs[..n], &lows[..n], senkou_b_period);

    let cloud_top = senkou_a.max(senkou_b);
    let cloud_bottom = senkou_a.min(senkou_b);
    let cloud_color = if senkou_a > senkou_b {
        CloudColor::Green
    } else {
        CloudColor::Red
    };

    let price = closes[n - 1];
    let price_position = if price > cloud_top {
        CloudPosition::AboveCloud
    } else if price < cloud_bottom {
        CloudPosition::BelowCloud
    } else {
        CloudPosition::InCloud
    };

    let tk_cross = Cross::of(tenkan, kijun);
    let signal = composite_signal(price_position, cloud_color, tk_cross);

    Some(IchimokuValue {
        tenkan: round_to(tenkan, 2),
        kijun: round_to(kijun, 2),
        senkou_a: round_to(senkou_a, 2),
        senkou_b: round_to(senkou_b, 2),
        cloud_top: round_to(cloud_top, 2),
        cloud_bottom: round_to(cloud_bottom, 2),
        cloud_color,
        price_position,
        tk_cross,
        signal,
    })
}

pub fn calculate_ichimoku_default(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
) -> Option<IchimokuValue> {
    calculate_ichimoku(highs, lows, closes, DEFAULT_TENKAN, DEFAULT_KIJUN, DEFAULT_SENKOU_B)
}

/// First match wins.
pub fn composite_signal(
    position: CloudPosition,
    color: CloudColor,
    tk_cross: Cross,
) -> IchimokuSignal {
    match (position, color, tk_cross) {
        (CloudPosition::AboveCloud, CloudColor::Green, Cross::Bullish) => {
            IchimokuSignal::StrongBullish
        }
        (CloudPosition::BelowCloud, CloudColor::Red, Cross::Bearish) => {
            IchimokuSignal::StrongBearish
        }
        (CloudPosition::AboveCloud, _, _) => IchimokuSignal::Bullish,
        (CloudPosition::BelowCloud, _, _) => IchimokuSignal::Bearish,
        (CloudPosition::InCloud, _, _) => IchimokuSignal::Neutral,
    }
}

/// (highest high + lowest low) / 2 over the trailing `period` bars.
fn midpoint(highs: &[f64], lows: &[f64], period: usize) -> f64 {
    let start = highs.len() - period;
    let highest = highs[start..].iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = lows[start..].iter().copied().fold(f64::INFINITY, f64::min);
    (highest + lowest) / 2.0
}
