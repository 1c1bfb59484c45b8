//! Port traits the domain talks through.

pub mod config_port;
pub mod market_data_port;
pub mod report_port;
