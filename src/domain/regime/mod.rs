//! Market-regime classifiers.
//!
//! Each classifier maps indicator readings and raw price/volume data onto a
//! closed set of labels. None of them carries state between calls.

pub mod box_range;
pub mod phase;
pub mod volume;

pub use box_range::{BoxRange, Breakout, detect_box_range};
pub use phase::{Phase, classify_phase};
pub use volume::{VolumeAnalysis, VolumeTrend, analyze_volume};
