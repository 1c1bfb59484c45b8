//! ohlcv-signal: multi-timeframe technical analysis and trade-signal engine.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], argument parsing and dispatch in
//! [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
