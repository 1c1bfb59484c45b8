//! Candle, ticker and snapshot representation.

use chrono::{DateTime, Utc};

/// One OHLCV bar. Times are exchange epoch milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: i64,
}

impl Candle {
    pub fn open_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.open_time)
    }
}

/// Candles for one symbol and timeframe, oldest first.
///
/// Order is exactly as delivered by the data source; nothing here sorts or
/// deduplicates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleSeries {
    pub interval: String,
    pub candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(interval: impl Into<String>, candles: Vec<Candle>) -> Self {
        Self {
            interval: interval.into(),
            candles,
        }
    }

    pub fn empty(interval: impl Into<String>) -> Self {
        Self::new(interval, Vec::new())
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.low).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.volume).collect()
    }
}

/// Last traded price and 24h percent change. May disagree slightly with the
/// latest candle close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerSnapshot {
    pub last_price: f64,
    pub price_change_percent: f64,
}

/// Everything one analysis needs, already fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub short: CandleSeries,
    pub medium: CandleSeries,
    pub long: CandleSeries,
    pub ticker: Option<TickerSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_candle() -> Candle {
        Candle {
            open_time: 1_700_000_000_000,
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000.0,
            close_time: 1_700_014_399_999,
        }
    }

    #[test]
    fn open_datetime_from_millis() {
        let c = sample_candle();
        let dt = c.open_datetime().unwrap();
        assert_eq!(dt.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn series_projections_keep_order() {
        let mut a = sample_candle();
        let mut b = sample_candle();
        a.close = 2.0;
        b.close = 1.0;
        let series = CandleSeries::new("4h", vec![a, b]);
        assert_eq!(series.closes(), vec![2.0, 1.0]);
        assert_eq!(series.highs(), vec![110.0, 110.0]);
        assert_eq!(series.lows(), vec![90.0, 90.0]);
        assert_eq!(series.volumes(), vec![50_000.0, 50_000.0]);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn empty_series() {
        let series = CandleSeries::empty("1d");
        assert!(series.is_empty());
        assert_eq!(series.interval, "1d");
    }
}
