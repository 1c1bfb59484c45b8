//! CSV file market data adapter.
//!
//! Reads `<SYMBOL>_<interval>.csv` candle files and a `<SYMBOL>_ticker.csv`
//! file from a base directory. Rows are returned in file order.

use crate::domain::candle::{Candle, TickerSnapshot};
use crate::domain::error::AnalyzerError;
use crate::ports::market_data_port::MarketDataPort;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn candle_path(&self, symbol: &str, interval: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", symbol, interval))
    }

    fn ticker_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}_ticker.csv", symbol))
    }

    fn read_records(&self, path: &Path) -> Result<Vec<csv::StringRecord>, AnalyzerError> {
        tracing::debug!(path = %path.display(), "reading CSV");
        let content = fs::read_to_string(path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        rdr.records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| AnalyzerError::parse(format!("{}: {}", path.display(), e)))
    }
}

fn field<T: FromStr>(record: &csv::StringRecord, idx: usize, name: &str) -> Result<T, AnalyzerError>
where
    T::Err: std::fmt::Display,
{
    record
        .get(idx)
        .ok_or_else(|| AnalyzerError::parse(format!("missing {} column", name)))?
        .parse()
        .map_err(|e| AnalyzerError::parse(format!("invalid {} value: {}", name, e)))
}

/// A price or volume column. `NaN` and infinities parse as `f64` but are rejected.
fn decimal(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, AnalyzerError> {
    let value: f64 = field(record, idx, name)?;
    if !value.is_finite() {
        return Err(AnalyzerError::parse(format!("invalid {} value: not finite", name)));
    }
    Ok(value)
}

impl MarketDataPort for CsvAdapter {
    /// The most recent `limit` rows of the file.
    fn fetch_candles(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, AnalyzerError> {
        let path = self.candle_path(symbol, interval);
        let records = self.read_records(&path)?;

        let mut candles = records
            .iter()
            .map(|record| {
                Ok(Candle {
                    open_time: field(record, 0, "open_time")?,
                    open: decimal(record, 1, "open")?,
                    high: decimal(record, 2, "high")?,
                    low: decimal(record, 3, "low")?,
                    close: decimal(record, 4, "close")?,
                    volume: decimal(record, 5, "volume")?,
                    close_time: field(record, 6, "close_time")?,
                })
            })
            .collect::<Result<Vec<_>, AnalyzerError>>()?;

        if candles.is_empty() {
            return Err(AnalyzerError::NoData {
                symbol: symbol.to_string(),
                interval: interval.to_string(),
            });
        }

        let skip = candles.len().saturating_sub(limit);
        Ok(candles.split_off(skip))
    }

    fn fetch_ticker(&self, symbol: &str) -> Result<TickerSnapshot, AnalyzerError> {
        let path = self.ticker_path(symbol);
        let records = self.read_records(&path)?;
        let record = records.last().ok_or_else(|| AnalyzerError::NoData {
            symbol: symbol.to_string(),
            interval: "ticker".to_string(),
        })?;

        Ok(TickerSnapshot {
            last_price: decimal(record, 0, "last_price")?,
            price_change_percent: decimal(record, 1, "price_change_percent")?,
        })
    }
}
