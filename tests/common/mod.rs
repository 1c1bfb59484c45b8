#![allow(dead_code)]

use ohlcv_signal::domain::error::AnalyzerError;
pub use ohlcv_signal::domain::candle::{Candle, TickerSnapshot};
use ohlcv_signal::ports::market_data_port::MarketDataPort;
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory market data keyed by interval.
pub struct MockMarketDataPort {
    pub candles: HashMap<String, Vec<Candle>>,
    pub errors: HashMap<String, String>,
    pub ticker: Option<TickerSnapshot>,
    pub requested: RefCell<Vec<(String, String, usize)>>,
}

impl MockMarketDataPort {
    pub fn new() -> Self {
        Self {
            candles: HashMap::new(),
            errors: HashMap::new(),
            ticker: None,
            requested: RefCell::new(Vec::new()),
        }
    }

    pub fn with_candles(mut self, interval: &str, candles: Vec<Candle>) -> Self {
        self.candles.insert(interval.to_string(), candles);
        self
    }

    pub fn with_error(mut self, interval: &str, reason: &str) -> Self {
        self.errors.insert(interval.to_string(), reason.to_string());
        self
    }

    pub fn with_ticker(mut self, last_price: f64, price_change_percent: f64) -> Self {
        self.ticker = Some(TickerSnapshot {
            last_price,
            price_change_percent,
        });
        self
    }

    /// Same candles on 15m, 4h and 1d.
    pub fn with_all_timeframes(self, candles: Vec<Candle>) -> Self {
        self.with_candles("15m", candles.clone())
            .with_candles("4h", candles.clone())
            .with_candles("1d", candles)
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, AnalyzerError> {
        self.requested
            .borrow_mut()
            .push((symbol.to_string(), interval.to_string(), limit));
        if let Some(reason) = self.errors.get(interval) {
            return Err(AnalyzerError::Fetch {
                url: format!("mock://{symbol}/{interval}"),
                reason: reason.clone(),
            });
        }
        let candles = self.candles.get(interval).cloned().unwrap_or_default();
        let skip = candles.len().saturating_sub(limit);
        Ok(candles[skip..].to_vec())
    }

    fn fetch_ticker(&self, symbol: &str) -> Result<TickerSnapshot, AnalyzerError> {
        self.ticker.ok_or_else(|| AnalyzerError::Fetch {
            url: format!("mock://{symbol}/ticker"),
            reason: "no ticker".into(),
        })
    }
}

/// Bar `i` of a 4h series with a ±1 high/low band around `close`.
pub fn make_candle(i: usize, close: f64, volume: f64) -> Candle {
    let open_time = 1_704_067_200_000 + i as i64 * 14_400_000;
    Candle {
        open_time,
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume,
        close_time: open_time + 14_399_999,
    }
}

pub fn generate_candles(closes: &[f64], volumes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .zip(volumes)
        .enumerate()
        .map(|(i, (&c, &v))| make_candle(i, c, v))
        .collect()
}

/// `n` closes starting at `start`, moving `step` per bar.
pub fn linear_closes(n: usize, start: f64, step: f64) -> Vec<f64> {
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// `n` volumes at `base`, with the last `tail_len` replaced by `tail`.
pub fn volumes_with_tail(n: usize, base: f64, tail_len: usize, tail: f64) -> Vec<f64> {
    (0..n)
        .map(|i| if i + tail_len >= n { tail } else { base })
        .collect()
}
