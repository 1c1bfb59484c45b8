//! Analysis pipeline and result record.
//!
//! `analyze` is a pure function of the snapshot, the configuration and the
//! caller-supplied timestamp:
//!
//! 1. precondition: medium-timeframe candles and the ticker must be present
//! 2. indicators per timeframe (RSI on all three; MACD, CCI, Stochastic and
//!    Ichimoku on medium; Ichimoku also on long)
//! 3. regimes: volume and box range on medium, phase from average RSI
//! 4. confluence tally over average RSI and the medium-timeframe readings
//! 5. decision rule table

use crate::domain::candle::{CandleSeries, MarketSnapshot};
use crate::domain::confluence::{self, ConfluenceInputs, ConfluenceScore};
use crate::domain::decision::{self, Action, DecisionContext, RiskLevel};
use crate::domain::indicator::{
    IchimokuValue, MacdValue, StochasticValue, calculate_cci, calculate_ema, calculate_ichimoku,
    calculate_macd, calculate_rsi, calculate_stochastic, cci, ichimoku, macd, round_to, rsi,
    stochastic,
};
use crate::domain::regime::{
    BoxRange, Phase, VolumeAnalysis, analyze_volume, box_range, classify_phase, detect_box_range,
};
use crate::domain::snapshot::Timeframes;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_TREND_EMA_PERIOD: usize = 20;
const TREND_BAND: f64 = 0.02;

/// Indicator periods and timeframes for one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub timeframes: Timeframes,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub cci_period: usize,
    pub stoch_k: usize,
    pub stoch_d: usize,
    pub ichimoku_tenkan: usize,
    pub ichimoku_kijun: usize,
    pub ichimoku_senkou_b: usize,
    pub trend_ema_period: usize,
    pub box_lookback: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timeframes: Timeframes::default(),
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            cci_period: cci::DEFAULT_PERIOD,
            stoch_k: stochastic::DEFAULT_K_PERIOD,
            stoch_d: stochastic::DEFAULT_D_PERIOD,
            ichimoku_tenkan: ichimoku::DEFAULT_TENKAN,
            ichimoku_kijun: ichimoku::DEFAULT_KIJUN,
            ichimoku_senkou_b: ichimoku::DEFAULT_SENKOU_B,
            trend_ema_period: DEFAULT_TREND_EMA_PERIOD,
            box_lookback: box_range::DEFAULT_LOOKBACK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Bullish,
    Bearish,
    Neutral,
}

impl Trend {
    /// Price against an EMA with a ±2% dead band.
    pub fn classify(price: f64, ema: f64) -> Self {
        if price > ema * (1.0 + TREND_BAND) {
            Trend::Bullish
        } else if price < ema * (1.0 - TREND_BAND) {
            Trend::Bearish
        } else {
            Trend::Neutral
        }
    }
}

/// RSI per timeframe label plus the average of all three.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsiSnapshot {
    #[serde(flatten)]
    pub by_timeframe: BTreeMap<String, f64>,
    pub avg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub symbol: String,
    pub price: f64,
    pub change_24h: String,
    pub trend: Trend,
    pub rsi: RsiSnapshot,
    pub macd: MacdValue,
    pub cci: f64,
    pub stochastic: StochasticValue,
    pub ichimoku: BTreeMap<String, Option<IchimokuValue>>,
    #[serde(serialize_with = "serialize_display")]
    pub confluence: ConfluenceScore,
    pub volume: VolumeAnalysis,
    pub box_range: BoxRange,
    pub whale_phase: Phase,
    pub action: Action,
    pub signal_reason: String,
    pub risk_level: RiskLevel,
    pub timestamp: DateTime<Utc>,
}

/// What one invocation prints: a full analysis or `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Analysis(Box<AnalysisResult>),
    Error { error: String },
}

impl Report {
    pub fn error(message: impl Into<String>) -> Self {
        Report::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Report::Error { .. })
    }
}

fn serialize_display<T: fmt::Display, S: Serializer>(value: &T, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(value)
}

/// `+1.2%` / `-3.4%`
pub fn format_change(percent: f64) -> String {
    format!("{percent:+.1}%")
}

pub fn analyze(
    snapshot: &MarketSnapshot,
    config: &AnalysisConfig,
    generated_at: DateTime<Utc>,
) -> Report {
    let ticker = match snapshot.ticker {
        Some(ticker) if !snapshot.medium.is_empty() => ticker,
        Some(_) => {
            return Report::error(format!(
                "Failed to fetch data: no {} candles for {}",
                snapshot.medium.interval, snapshot.symbol
            ));
        }
        None => {
            return Report::error(format!(
                "Failed to fetch data: no ticker for {}",
                snapshot.symbol
            ));
        }
    };
    let price = ticker.last_price;
    let change_24h = ticker.price_change_percent;

    let series = [&snapshot.short, &snapshot.medium, &snapshot.long];
    let rsi_values: Vec<f64> = series
        .iter()
        .map(|s| calculate_rsi(&s.closes(), config.rsi_period))
        .collect();
    let rsi_avg = round_to(rsi_values.iter().sum::<f64>() / rsi_values.len() as f64, 1);
    let rsi = RsiSnapshot {
        by_timeframe: series
            .iter()
            .zip(&rsi_values)
            .map(|(s, &value)| (s.interval.clone(), value))
            .collect(),
        avg: rsi_avg,
    };

    let medium = &snapshot.medium;
    let (highs, lows, closes) = (medium.highs(), medium.lows(), medium.closes());

    let macd = calculate_macd(&closes, config.macd_fast, config.macd_slow, config.macd_signal);
    let cci = calculate_cci(&highs, &lows, &closes, config.cci_period);
    let stochastic = calculate_stochastic(&highs, &lows, &closes, config.stoch_k, config.stoch_d);
    let ichimoku_medium = ichimoku_for(medium, config);
    let ichimoku_long = ichimoku_for(&snapshot.long, config);

    let volume = analyze_volume(&medium.volumes());
    let box_range = detect_box_range(&highs, &lows, &closes, config.box_lookback);
    let phase = classify_phase(rsi_avg, volume.trend, box_range.breakout, change_24h);

    let trend_ema = calculate_ema(&closes, config.trend_ema_period);
    let trend = Trend::classify(price, trend_ema);

    let medium_signal = ichimoku_medium.map(|i| i.signal);
    let score = confluence::score(&ConfluenceInputs {
        rsi: rsi_avg,
        macd,
        cci,
        stochastic,
        ichimoku: medium_signal,
    });

    let decision = decision::decide(&DecisionContext {
        phase,
        breakout: box_range.breakout,
        volume_ratio: volume.ratio,
        ichimoku: medium_signal,
        score,
    });

    let mut ichimoku = BTreeMap::new();
    ichimoku.insert(medium.interval.clone(), ichimoku_medium);
    ichimoku.insert(snapshot.long.interval.clone(), ichimoku_long);

    Report::Analysis(Box::new(AnalysisResult {
        symbol: snapshot.symbol.clone(),
        price,
        change_24h: format_change(change_24h),
        trend,
        rsi,
        macd,
        cci,
        stochastic,
        ichimoku,
        confluence: score,
        volume,
        box_range,
        whale_phase: phase,
        action: decision.action,
        signal_reason: decision.reason,
        risk_level: decision.risk,
        timestamp: generated_at,
    }))
}

fn ichimoku_for(series: &CandleSeries, config: &AnalysisConfig) -> Option<IchimokuValue> {
    calculate_ichimoku(
        &series.highs(),
        &series.lows(),
        &series.closes(),
        config.ichimoku_tenkan,
        config.ichimoku_kijun,
        config.ichimoku_senkou_b,
    )
}
