//! Core domain types and the analysis pipeline.

pub mod analysis;
pub mod candle;
pub mod confluence;
pub mod config_validation;
pub mod decision;
pub mod error;
pub mod indicator;
pub mod regime;
pub mod snapshot;
