//! Volume-surge classifier.
//!
//! ratio = mean(last 5 volumes) / mean(last 20 volumes), two decimals; a zero
//! denominator gives ratio 1. Bands, first match wins:
//!
//! | ratio  | trend     | whale_alert |
//! |--------|-----------|-------------|
//! | > 3    | EXPLOSIVE | true        |
//! | > 2    | SURGE     | true        |
//! | > 1.5  | RISING    | false       |
//! | < 0.5  | DEAD      | false       |
//! | else   | NORMAL    | false       |
//!
//! Fewer than 20 bars returns ratio 1 / NORMAL.

use crate::domain::indicator::round_to;
use serde::Serialize;
use std::fmt;

pub const RECENT_WINDOW: usize = 5;
pub const BASELINE_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeTrend {
    Explosive,
    Surge,
    Rising,
    Normal,
    Dead,
}

impl VolumeTrend {
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > 3.0 {
            VolumeTrend::Explosive
        } else if ratio > 2.0 {
            VolumeTrend::Surge
        } else if ratio > 1.5 {
            VolumeTrend::Rising
        } else if ratio < 0.5 {
            VolumeTrend::Dead
        } else {
            VolumeTrend::Normal
        }
    }

    pub fn whale_alert(&self) -> bool {
        match self {
            VolumeTrend::Explosive | VolumeTrend::Surge => true,
            VolumeTrend::Rising | VolumeTrend::Normal | VolumeTrend::Dead => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VolumeTrend::Explosive => "EXPLOSIVE",
            VolumeTrend::Surge => "SURGE",
            VolumeTrend::Rising => "RISING",
            VolumeTrend::Normal => "NORMAL",
            VolumeTrend::Dead => "DEAD",
        }
    }
}

impl fmt::Display for VolumeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolumeAnalysis {
    pub ratio: f64,
    pub trend: VolumeTrend,
    pub whale_alert: bool,
}

impl Default for VolumeAnalysis {
    fn default() -> Self {
        Self {
            ratio: 1.0,
            trend: VolumeTrend::Normal,
            whale_alert: false,
        }
    }
}

pub fn analyze_volume(volumes: &[f64]) -> VolumeAnalysis {
    if volumes.len() < BASELINE_WINDOW {
        return VolumeAnalysis::default();
    }

    let mean = |window: &[f64]| window.iter().sum::<f64>() / window.len() as f64;
    let recent = mean(&volumes[volumes.len() - RECENT_WINDOW..]);
    let baseline = mean(&volumes[volumes.len() - BASELINE_WINDOW..]);

    let ratio = if baseline > 0.0 {
        round_to(recent / baseline, 2)
    } else {
        1.0
    };
    let trend = VolumeTrend::from_ratio(ratio);

    VolumeAnalysis {
        ratio,
        trend,
        whale_alert: trend.whale_alert(),
    }
}
