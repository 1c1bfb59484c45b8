//! Market data port trait.

use crate::domain::candle::{Candle, TickerSnapshot};
use crate::domain::error::AnalyzerError;

/// Source of candles and 24h ticker statistics for a trading pair.
pub trait MarketDataPort {
    /// Up to `limit` most recent candles, oldest first.
    fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, AnalyzerError>;

    fn fetch_ticker(&self, symbol: &str) -> Result<TickerSnapshot, AnalyzerError>;
}
