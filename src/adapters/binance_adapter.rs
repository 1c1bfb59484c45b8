//! Binance public REST market data adapter.
//!
//! Uses the unauthenticated spot endpoints `/api/v3/klines` and
//! `/api/v3/ticker/24hr` through a blocking `reqwest` client.

use crate::domain::candle::{Candle, TickerSnapshot};
use crate::domain::error::AnalyzerError;
use crate::ports::market_data_port::MarketDataPort;
use serde_json::Value;
use std::time::Duration;

pub struct BinanceAdapter {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl BinanceAdapter {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AnalyzerError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ohlcv-signal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnalyzerError::Fetch {
                url: base_url.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { base_url, client })
    }

    /// Build a GET for `path`; query values are form-encoded.
    fn request(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<reqwest::blocking::Request, AnalyzerError> {
        let url = format!("{}{path}", self.base_url);
        self.client
            .get(&url)
            .query(query)
            .build()
            .map_err(|e| AnalyzerError::Fetch {
                url,
                reason: e.to_string(),
            })
    }

    fn get(&self, request: reqwest::blocking::Request) -> Result<String, AnalyzerError> {
        let url = request.url().to_string();
        tracing::debug!(url = %url, "GET");
        let fetch_err = |reason: String| AnalyzerError::Fetch {
            url: url.clone(),
            reason,
        };

        let response = self.client.execute(request).map_err(|e| fetch_err(e.to_string()))?;
        let status = response.status();
        let body = response.text().map_err(|e| fetch_err(e.to_string()))?;
        if !status.is_success() {
            return Err(fetch_err(format!("HTTP {status}: {body}")));
        }
        Ok(body)
    }
}

impl MarketDataPort for BinanceAdapter {
    fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, AnalyzerError> {
        let limit = limit.to_string();
        let query = [("symbol", symbol), ("interval", interval), ("limit", limit.as_str())];
        let body = self.get(self.request("/api/v3/klines", &query)?)?;
        parse_klines(&body)
    }

    fn fetch_ticker(&self, symbol: &str) -> Result<TickerSnapshot, AnalyzerError> {
        let body = self.get(self.request("/api/v3/ticker/24hr", &[("symbol", symbol)])?)?;
        parse_ticker(&body)
    }
}

/// Parse a klines payload: an array of
/// `[openTime, "open", "high", "low", "close", "volume", closeTime, ...]`.
pub fn parse_klines(body: &str) -> Result<Vec<Candle>, AnalyzerError> {
    let raw: Vec<Value> = serde_json::from_str(body)
        .map_err(|e| AnalyzerError::parse(format!("klines payload: {e}")))?;

    raw.iter()
        .enumerate()
        .map(|(i, row)| {
            let arr = row
                .as_array()
                .filter(|arr| arr.len() >= 7)
                .ok_or_else(|| {
                    AnalyzerError::parse(format!(
                        "kline {i}: expected an array of at least 7 fields"
                    ))
                })?;
            Ok(Candle {
                open_time: integer_field(&arr[0], i, "open time")?,
                open: decimal_field(&arr[1], i, "open")?,
                high: decimal_field(&arr[2], i, "high")?,
                low: decimal_field(&arr[3], i, "low")?,
                close: decimal_field(&arr[4], i, "close")?,
                volume: decimal_field(&arr[5], i, "volume")?,
                close_time: integer_field(&arr[6], i, "close time")?,
            })
        })
        .collect()
}

/// Parse a 24h ticker payload, reading `lastPrice` and `priceChangePercent`.
pub fn parse_ticker(body: &str) -> Result<TickerSnapshot, AnalyzerError> {
    let raw: Value = serde_json::from_str(body)
        .map_err(|e| AnalyzerError::parse(format!("ticker payload: {e}")))?;

    let field = |name: &str| -> Result<f64, AnalyzerError> {
        raw.get(name)
            .and_then(as_decimal)
            .ok_or_else(|| AnalyzerError::parse(format!("ticker: missing or invalid {name}")))
    };

    Ok(TickerSnapshot {
        last_price: field("lastPrice")?,
        price_change_percent: field("priceChangePercent")?,
    })
}

/// Decimal strings are the wire format; bare numbers are accepted too.
fn as_decimal(value: &Value) -> Option<f64> {
    let parsed: Option<f64> = match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn decimal_field(value: &Value, row: usize, name: &str) -> Result<f64, AnalyzerError> {
    as_decimal(value).ok_or_else(|| AnalyzerError::parse(format!("kline {row}: invalid {name}")))
}

fn integer_field(value: &Value, row: usize, name: &str) -> Result<i64, AnalyzerError> {
    value
        .as_i64()
        .ok_or_else(|| AnalyzerError::parse(format!("kline {row}: invalid {name}")))
}
