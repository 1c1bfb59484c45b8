//! Configuration validation.
//!
//! Runs against the raw [`ConfigPort`] before any data is fetched. Every key
//! is optional; only values that are present and out of range are rejected.

use crate::domain::analysis::DEFAULT_TREND_EMA_PERIOD;
use crate::domain::error::AnalyzerError;
use crate::domain::indicator::{cci, ichimoku, macd, rsi, stochastic};
use crate::domain::regime::box_range;
use crate::domain::snapshot::{DEFAULT_LIMIT, Timeframes};
use crate::ports::config_port::ConfigPort;

/// Interval codes the exchange accepts for klines.
pub const SUPPORTED_INTERVALS: [&str; 15] = [
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w", "1M",
];

pub const MAX_LIMIT: i64 = 1000;
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";
pub const DEFAULT_TIMEOUT_SECS: i64 = 10;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    validate_market_config(config)?;
    validate_timeframes_config(config)?;
    validate_indicator_config(config)?;
    Ok(())
}

pub fn validate_market_config(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    validate_base_url(config)?;
    validate_positive(config, "market", "timeout_secs", DEFAULT_TIMEOUT_SECS)?;
    validate_quote(config)?;
    Ok(())
}

pub fn validate_timeframes_config(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    validate_limit(config)?;
    validate_intervals(config)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    let periods = [
        ("indicators", "rsi_period", rsi::DEFAULT_PERIOD),
        ("indicators", "macd_fast", macd::DEFAULT_FAST),
        ("indicators", "macd_slow", macd::DEFAULT_SLOW),
        ("indicators", "macd_signal", macd::DEFAULT_SIGNAL),
        ("indicators", "cci_period", cci::DEFAULT_PERIOD),
        ("indicators", "stoch_k", stochastic::DEFAULT_K_PERIOD),
        ("indicators", "stoch_d", stochastic::DEFAULT_D_PERIOD),
        ("indicators", "ichimoku_tenkan", ichimoku::DEFAULT_TENKAN),
        ("indicators", "ichimoku_kijun", ichimoku::DEFAULT_KIJUN),
        ("indicators", "ichimoku_senkou_b", ichimoku::DEFAULT_SENKOU_B),
        ("indicators", "trend_ema_period", DEFAULT_TREND_EMA_PERIOD),
        ("regime", "box_lookback", box_range::DEFAULT_LOOKBACK),
    ];
    for (section, key, default) in periods {
        validate_positive(config, section, key, default as i64)?;
    }
    validate_macd_order(config)?;
    validate_ichimoku_order(config)?;
    Ok(())
}

/// A present key must parse as a whole number.
fn validate_integer(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), AnalyzerError> {
    match config.get_string(section, key) {
        Some(raw) if raw.parse::<i64>().is_err() => Err(AnalyzerError::invalid(
            section,
            key,
            format!("{key} must be an integer, got '{raw}'"),
        )),
        _ => Ok(()),
    }
}

fn validate_positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<(), AnalyzerError> {
    validate_integer(config, section, key)?;
    let value = config.get_int(section, key, default);
    if value <= 0 {
        return Err(AnalyzerError::invalid(
            section,
            key,
            format!("{key} must be positive"),
        ));
    }
    Ok(())
}

fn validate_base_url(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    let Some(url) = config.get_string("market", "base_url") else {
        return Ok(());
    };
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(AnalyzerError::invalid(
            "market",
            "base_url",
            "base_url must start with http:// or https://",
        ));
    }
    Ok(())
}

fn validate_quote(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    let Some(quote) = config.get_string("market", "quote") else {
        return Ok(());
    };
    if quote.trim().is_empty() || !quote.trim().chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AnalyzerError::invalid(
            "market",
            "quote",
            "quote must be a non-empty alphanumeric asset code",
        ));
    }
    Ok(())
}

fn validate_limit(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    validate_integer(config, "timeframes", "limit")?;
    let value = config.get_int("timeframes", "limit", DEFAULT_LIMIT as i64);
    if !(1..=MAX_LIMIT).contains(&value) {
        return Err(AnalyzerError::invalid(
            "timeframes",
            "limit",
            format!("limit must be between 1 and {MAX_LIMIT}"),
        ));
    }
    Ok(())
}

fn validate_intervals(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    let defaults = Timeframes::default();
    let slots = [
        ("short", defaults.short),
        ("medium", defaults.medium),
        ("long", defaults.long),
    ];

    let mut seen: Vec<String> = Vec::with_capacity(slots.len());
    for (key, default) in slots {
        let interval = config.get_string("timeframes", key).unwrap_or(default);
        if !SUPPORTED_INTERVALS.contains(&interval.as_str()) {
            return Err(AnalyzerError::invalid(
                "timeframes",
                key,
                format!("unsupported interval '{interval}'"),
            ));
        }
        if seen.contains(&interval) {
            return Err(AnalyzerError::invalid(
                "timeframes",
                key,
                format!("interval '{interval}' is used by more than one timeframe"),
            ));
        }
        seen.push(interval);
    }
    Ok(())
}

fn validate_macd_order(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    let fast = config.get_int("indicators", "macd_fast", macd::DEFAULT_FAST as i64);
    let slow = config.get_int("indicators", "macd_slow", macd::DEFAULT_SLOW as i64);
    if fast >= slow {
        return Err(AnalyzerError::invalid(
            "indicators",
            "macd_fast",
            "macd_fast must be less than macd_slow",
        ));
    }
    Ok(())
}

fn validate_ichimoku_order(config: &dyn ConfigPort) -> Result<(), AnalyzerError> {
    let tenkan = config.get_int("indicators", "ichimoku_tenkan", ichimoku::DEFAULT_TENKAN as i64);
    let kijun = config.get_int("indicators", "ichimoku_kijun", ichimoku::DEFAULT_KIJUN as i64);
    let senkou_b = config.get_int(
        "indicators",
        "ichimoku_senkou_b",
        ichimoku::DEFAULT_SENKOU_B as i64,
    );
    if tenkan > kijun || kijun > senkou_b {
        return Err(AnalyzerError::invalid(
            "indicators",
            "ichimoku_kijun",
            "periods must satisfy tenkan <= kijun <= senkou_b",
        ));
    }
    Ok(())
}
