//! Snapshot acquisition.
//!
//! Normalises the requested symbol and pulls the three candle series and the
//! ticker through a [`MarketDataPort`]. Port failures are logged and degraded
//! to empty data; the analysis precondition turns that into an error report.

use crate::domain::candle::{Candle, CandleSeries, MarketSnapshot};
use crate::ports::market_data_port::MarketDataPort;

pub const DEFAULT_SYMBOL: &str = "BTC";
pub const DEFAULT_QUOTE: &str = "USDT";
pub const DEFAULT_LIMIT: usize = 100;

/// Short/medium/long candle intervals, e.g. 15m / 4h / 1d.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeframes {
    pub short: String,
    pub medium: String,
    pub long: String,
}

impl Default for Timeframes {
    fn default() -> Self {
        Self {
            short: "15m".to_string(),
            medium: "4h".to_string(),
            long: "1d".to_string(),
        }
    }
}

impl Timeframes {
    pub fn as_array(&self) -> [&str; 3] {
        [self.short.as_str(), self.medium.as_str(), self.long.as_str()]
    }
}

/// Upper-case the symbol and append `quote` unless it already ends with it.
pub fn normalize_symbol(raw: &str, quote: &str) -> String {
    let symbol = raw.trim().to_uppercase();
    let symbol = if symbol.is_empty() {
        DEFAULT_SYMBOL.to_string()
    } else {
        symbol
    };
    let quote = quote.trim().to_uppercase();
    if symbol.ends_with(&quote) {
        symbol
    } else {
        format!("{symbol}{quote}")
    }
}

pub fn acquire_snapshot(
    port: &dyn MarketDataPort,
    symbol: &str,
    timeframes: &Timeframes,
    limit: usize,
) -> MarketSnapshot {
    let fetch_series = |interval: &str| match port.fetch_candles(symbol, interval, limit) {
        Ok(candles) => {
            tracing::debug!(
                symbol,
                interval,
                bars = candles.len(),
                latest = ?candles.last().and_then(Candle::open_datetime),
                "fetched candles"
            );
            CandleSeries::new(interval, candles)
        }
        Err(e) => {
            tracing::warn!(
                symbol,
                interval,
                error = %e,
                "candle fetch failed, continuing without it"
            );
            CandleSeries::empty(interval)
        }
    };

    let short = fetch_series(&timeframes.short);
    let medium = fetch_series(&timeframes.medium);
    let long = fetch_series(&timeframes.long);

    let ticker = match port.fetch_ticker(symbol) {
        Ok(ticker) => Some(ticker),
        Err(e) => {
            tracing::warn!(symbol, error = %e, "ticker fetch failed, continuing without it");
            None
        }
    };

    MarketSnapshot {
        symbol: symbol.to_string(),
        short,
        medium,
        long,
        ticker,
    }
}
