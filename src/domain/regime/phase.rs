//! Distribution-cycle phase classifier.
//!
//! Re-derived from scratch on every call; no phase is remembered. Rules in
//! priority order, first match wins:
//!
//! 1. volume DEAD and RSI < 40 → ACCUMULATION
//! 2. volume SURGE/EXPLOSIVE and breakout UP → MARKUP
//! 3. volume SURGE/EXPLOSIVE and RSI > 70 → DISTRIBUTION
//! 4. RSI > 65 and 24h change < -5% → MARKDOWN
//! 5. otherwise → NEUTRAL

use crate::domain::regime::{Breakout, VolumeTrend};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Accumulation,
    Markup,
    Distribution,
    Markdown,
    Neutral,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Accumulation => "ACCUMULATION",
            Phase::Markup => "MARKUP",
            Phase::Distribution => "DISTRIBUTION",
            Phase::Markdown => "MARKDOWN",
            Phase::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn classify_phase(
    rsi: f64,
    volume: VolumeTrend,
    breakout: Option<Breakout>,
    change_24h: f64,
) -> Phase {
    let heavy_volume = matches!(volume, VolumeTrend::Surge | VolumeTrend::Explosive);

    match (volume, breakout) {
        (VolumeTrend::Dead, _) if rsi < 40.0 => Phase::Accumulation,
        (_, Some(Breakout::Up)) if heavy_volume => Phase::Markup,
        _ if heavy_volume && rsi > 70.0 => Phase::Distribution,
        _ if rsi > 65.0 && change_24h < -5.0 => Phase::Markdown,
        _ => Phase::Neutral,
    }
}
