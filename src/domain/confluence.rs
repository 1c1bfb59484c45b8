//! Confluence scoring.
//!
//! Each indicator votes for at most one side:
//!
//! | indicator  | bullish                         | bearish                         | weight |
//! |------------|---------------------------------|---------------------------------|--------|
//! | RSI        | < 30                            | > 70                            | 1      |
//! | MACD       | bullish cross, histogram > 0    | bearish cross, histogram < 0    | 1      |
//! | CCI        | < -100                          | > 100                           | 1      |
//! | Stochastic | %K < 20 and bullish cross       | %K > 80 and bearish cross       | 1      |
//! | Ichimoku   | STRONG_BULLISH (2) / BULLISH (1)| STRONG_BEARISH (2) / BEARISH (1)| 1-2    |

use crate::domain::indicator::{Cross, IchimokuSignal, MacdValue, StochasticValue};
use std::fmt;

/// Latest readings the scorer looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfluenceInputs {
    pub rsi: f64,
    pub macd: MacdValue,
    pub cci: f64,
    pub stochastic: StochasticValue,
    pub ichimoku: Option<IchimokuSignal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vote {
    pub indicator: &'static str,
    pub side: Side,
    pub weight: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfluenceScore {
    pub bullish: u32,
    pub bearish: u32,
}

impl fmt::Display for ConfluenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}B/{}S", self.bullish, self.bearish)
    }
}

/// Every non-abstaining vote, one entry per indicator at most.
pub fn indicator_votes(inputs: &ConfluenceInputs) -> Vec<Vote> {
    let ballots = [
        ("RSI", rsi_vote(inputs.rsi)),
        ("MACD", macd_vote(&inputs.macd)),
        ("CCI", cci_vote(inputs.cci)),
        ("STOCHASTIC", stochastic_vote(&inputs.stochastic)),
        ("ICHIMOKU", inputs.ichimoku.and_then(ichimoku_vote)),
    ];

    ballots
        .into_iter()
        .filter_map(|(indicator, ballot)| {
            ballot.map(|(side, weight)| Vote {
                indicator,
                side,
                weight,
            })
        })
        .collect()
}

pub fn score(inputs: &ConfluenceInputs) -> ConfluenceScore {
    indicator_votes(inputs)
        .iter()
        .fold(ConfluenceScore::default(), |mut acc, vote| {
            match vote.side {
                Side::Bullish => acc.bullish += vote.weight,
                Side::Bearish => acc.bearish += vote.weight,
            }
            acc
        })
}

fn rsi_vote(rsi: f64) -> Option<(Side, u32)> {
    if rsi < 30.0 {
        Some((Side::Bullish, 1))
    } else if rsi > 70.0 {
        Some((Side::Bearish, 1))
    } else {
        None
    }
}

fn macd_vote(macd: &MacdValue) -> Option<(Side, u32)> {
    match macd.cross() {
        Cross::Bullish if macd.histogram > 0.0 => Some((Side::Bullish, 1)),
        Cross::Bearish if macd.histogram < 0.0 => Some((Side::Bearish, 1)),
        _ => None,
    }
}

fn cci_vote(cci: f64) -> Option<(Side, u32)> {
    if cci < -100.0 {
        Some((Side::Bullish, 1))
    } else if cci > 100.0 {
        Some((Side::Bearish, 1))
    } else {
        None
    }
}

fn stochastic_vote(stoch: &StochasticValue) -> Option<(Side, u32)> {
    match stoch.cross() {
        Cross::Bullish if stoch.k < 20.0 => Some((Side::Bullish, 1)),
        Cross::Bearish if stoch.k > 80.0 => Some((Side::Bearish, 1)),
        _ => None,
    }
}

fn ichimoku_vote(signal: IchimokuSignal) -> Option<(Side, u32)> {
    match signal {
        IchimokuSignal::StrongBullish => Some((Side::Bullish, 2)),
        IchimokuSignal::Bullish => Some((Side::Bullish, 1)),
        IchimokuSignal::StrongBearish => Some((Side::Bearish, 2)),
        IchimokuSignal::Bearish => Some((Side::Bearish, 1)),
        IchimokuSignal::Neutral => None,
    }
}
