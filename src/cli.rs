//! CLI definition and dispatch.

use chrono::{DateTime, Utc};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::analysis::{self, AnalysisConfig, Report};
use crate::domain::config_validation::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, validate_config};
use crate::domain::error::AnalyzerError;
use crate::domain::snapshot::{
    DEFAULT_LIMIT, DEFAULT_QUOTE, DEFAULT_SYMBOL, Timeframes, acquire_snapshot, normalize_symbol,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::market_data_port::MarketDataPort;
use crate::ports::report_port::ReportPort;

/// Exit status when the report is `{"error": ...}`.
const EXIT_ERROR_REPORT: u8 = 5;

#[derive(Parser, Debug)]
#[command(
    name = "ohlcv-signal",
    version,
    about = "Multi-timeframe technical analysis and trade signal for a crypto pair"
)]
pub struct Cli {
    /// Base asset or pair, e.g. BTC or ETHUSDT
    #[arg(default_value = DEFAULT_SYMBOL)]
    pub symbol: String,
    /// INI configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Read candles and ticker from CSV files in this directory instead of the network
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,
}

/// Where and how to pull market data.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub quote: String,
    pub limit: usize,
}

pub fn run(cli: Cli) -> ExitCode {
    // Stage 1: Load config
    let adapter = match load_config(cli.config.as_ref()) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // Stage 2: Validate
    if let Err(e) = validate_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // Stage 3: Build configs
    let market = match build_market_config(&adapter) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    let analysis_config = match build_analysis_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Choose data source
    let port = match build_data_port(cli.data_dir.as_ref(), &market) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stages 5-6: Acquire and analyse
    let report = analyze_symbol(port.as_ref(), &cli.symbol, &market, &analysis_config, Utc::now());

    // Stage 7: Render
    let renderer = JsonReportAdapter::new(adapter.get_bool("report", "pretty", true));
    if let Err(e) = renderer.write(&report, &mut io::stdout().lock()) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    if report.is_error() {
        ExitCode::from(EXIT_ERROR_REPORT)
    } else {
        ExitCode::SUCCESS
    }
}

pub fn load_config(path: Option<&PathBuf>) -> Result<FileConfigAdapter, ExitCode> {
    let Some(path) = path else {
        tracing::debug!("no config file, using defaults");
        return Ok(FileConfigAdapter::empty());
    };
    tracing::info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Normalise the symbol, acquire a snapshot through `port` and run the pipeline.
pub fn analyze_symbol(
    port: &dyn MarketDataPort,
    raw_symbol: &str,
    market: &MarketConfig,
    config: &AnalysisConfig,
    generated_at: DateTime<Utc>,
) -> Report {
    let symbol = normalize_symbol(raw_symbol, &market.quote);
    tracing::info!(
        symbol = %symbol,
        short = %config.timeframes.short,
        medium = %config.timeframes.medium,
        long = %config.timeframes.long,
        "fetching market data"
    );
    let snapshot = acquire_snapshot(port, &symbol, &config.timeframes, market.limit);

    let report = analysis::analyze(&snapshot, config, generated_at);
    match &report {
        Report::Analysis(result) => tracing::info!(
            symbol = %result.symbol,
            action = %result.action,
            confluence = %result.confluence,
            "analysis complete"
        ),
        Report::Error { error } => {
            tracing::warn!(symbol = %symbol, error = %error, "analysis aborted")
        }
    }
    report
}

pub fn build_market_config(adapter: &dyn ConfigPort) -> Result<MarketConfig, AnalyzerError> {
    Ok(MarketConfig {
        base_url: adapter
            .get_string("market", "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        timeout: Duration::from_secs(positive(
            adapter,
            "market",
            "timeout_secs",
            DEFAULT_TIMEOUT_SECS as usize,
        )? as u64),
        quote: adapter
            .get_string("market", "quote")
            .map(|q| q.to_uppercase())
            .unwrap_or_else(|| DEFAULT_QUOTE.to_string()),
        limit: positive(adapter, "timeframes", "limit", DEFAULT_LIMIT)?,
    })
}

pub fn build_analysis_config(adapter: &dyn ConfigPort) -> Result<AnalysisConfig, AnalyzerError> {
    let d = AnalysisConfig::default();
    let interval =
        |key: &str, default: String| adapter.get_string("timeframes", key).unwrap_or(default);
    let period = |key: &str, default: usize| positive(adapter, "indicators", key, default);

    Ok(AnalysisConfig {
        timeframes: Timeframes {
            short: interval("short", d.timeframes.short),
            medium: interval("medium", d.timeframes.medium),
            long: interval("long", d.timeframes.long),
        },
        rsi_period: period("rsi_period", d.rsi_period)?,
        macd_fast: period("macd_fast", d.macd_fast)?,
        macd_slow: period("macd_slow", d.macd_slow)?,
        macd_signal: period("macd_signal", d.macd_signal)?,
        cci_period: period("cci_period", d.cci_period)?,
        stoch_k: period("stoch_k", d.stoch_k)?,
        stoch_d: period("stoch_d", d.stoch_d)?,
        ichimoku_tenkan: period("ichimoku_tenkan", d.ichimoku_tenkan)?,
        ichimoku_kijun: period("ichimoku_kijun", d.ichimoku_kijun)?,
        ichimoku_senkou_b: period("ichimoku_senkou_b", d.ichimoku_senkou_b)?,
        trend_ema_period: period("trend_ema_period", d.trend_ema_period)?,
        box_lookback: positive(adapter, "regime", "box_lookback", d.box_lookback)?,
    })
}

fn positive(
    adapter: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: usize,
) -> Result<usize, AnalyzerError> {
    let value = adapter.get_int(section, key, default as i64);
    usize::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| AnalyzerError::invalid(section, key, format!("{key} must be positive")))
}

pub fn build_data_port(
    data_dir: Option<&PathBuf>,
    market: &MarketConfig,
) -> Result<Box<dyn MarketDataPort>, AnalyzerError> {
    if let Some(dir) = data_dir {
        tracing::info!(dir = %dir.display(), "reading market data from CSV files");
        return Ok(Box::new(CsvAdapter::new(dir.clone())));
    }
    network_port(market)
}

#[cfg(feature = "fetch")]
fn network_port(market: &MarketConfig) -> Result<Box<dyn MarketDataPort>, AnalyzerError> {
    use crate::adapters::binance_adapter::BinanceAdapter;

    tracing::info!(base_url = %market.base_url, "reading market data over HTTP");
    Ok(Box::new(BinanceAdapter::new(&market.base_url, market.timeout)?))
}

#[cfg(not(feature = "fetch"))]
fn network_port(market: &MarketConfig) -> Result<Box<dyn MarketDataPort>, AnalyzerError> {
    Err(AnalyzerError::Fetch {
        url: market.base_url.clone(),
        reason: "built without the `fetch` feature; pass --data-dir".to_string(),
    })
}
