//! Decision engine.
//!
//! An ordered rule table evaluated top-down; the first rule whose predicate
//! holds decides the action, reason and risk. The last rule matches
//! everything, so exactly one rule fires for any input.
//!
//! Directional tiers are split into a bullish rule followed by a bearish one;
//! both share the tier's priority and the bullish side is checked first.

use crate::domain::confluence::ConfluenceScore;
use crate::domain::indicator::IchimokuSignal;
use crate::domain::regime::{Breakout, Phase};
use serde::Serialize;
use std::fmt;

/// Everything the rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionContext {
    pub phase: Phase,
    pub breakout: Option<Breakout>,
    pub volume_ratio: f64,
    pub ichimoku: Option<IchimokuSignal>,
    pub score: ConfluenceScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    Danger,
    Breakout,
    StrongLong,
    StrongShort,
    Long,
    Short,
    Watch,
    Wait,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Danger => "DANGER",
            Action::Breakout => "BREAKOUT",
            Action::StrongLong => "STRONG_LONG",
            Action::StrongShort => "STRONG_SHORT",
            Action::Long => "LONG",
            Action::Short => "SHORT",
            Action::Watch => "WATCH",
            Action::Wait => "WAIT",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Normal,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub action: Action,
    pub reason: String,
    pub risk: RiskLevel,
}

/// One row of the rule table.
pub struct DecisionRule {
    pub priority: u8,
    pub name: &'static str,
    pub applies: fn(&DecisionContext) -> bool,
    pub action: Action,
    pub reason: fn(&DecisionContext) -> String,
    pub risk: RiskLevel,
}

impl fmt::Debug for DecisionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionRule")
            .field("priority", &self.priority)
            .field("name", &self.name)
            .field("action", &self.action)
            .field("risk", &self.risk)
            .finish()
    }
}

pub static RULES: [DecisionRule; 10] = [
    DecisionRule {
        priority: 1,
        name: "distribution",
        applies: |ctx| ctx.phase == Phase::Distribution,
        action: Action::Danger,
        reason: |_| "Distribution phase: heavy volume into overbought RSI, do not buy".to_string(),
        risk: RiskLevel::High,
    },
    DecisionRule {
        priority: 2,
        name: "volume_breakout",
        applies: |ctx| ctx.breakout == Some(Breakout::Up) && ctx.volume_ratio > 2.0,
        action: Action::Breakout,
        reason: |ctx| format!("Box range broken upward on {}x volume", ctx.volume_ratio),
        risk: RiskLevel::Medium,
    },
    DecisionRule {
        priority: 3,
        name: "strong_bullish_confluence",
        applies: |ctx| {
            ctx.ichimoku == Some(IchimokuSignal::StrongBullish) && ctx.score.bullish >= 3
        },
        action: Action::StrongLong,
        reason: |ctx| {
            format!(
                "Ichimoku STRONG_BULLISH confirmed by {} bullish votes ({})",
                ctx.score.bullish, ctx.score
            )
        },
        risk: RiskLevel::Medium,
    },
    DecisionRule {
        priority: 3,
        name: "strong_bearish_confluence",
        applies: |ctx| {
            ctx.ichimoku == Some(IchimokuSignal::StrongBearish) && ctx.score.bearish >= 3
        },
        action: Action::StrongShort,
        reason: |ctx| {
            format!(
                "Ichimoku STRONG_BEARISH confirmed by {} bearish votes ({})",
                ctx.score.bearish, ctx.score
            )
        },
        risk: RiskLevel::Medium,
    },
    DecisionRule {
        priority: 4,
        name: "bullish_confluence",
        applies: |ctx| ctx.score.bullish >= 4,
        action: Action::Long,
        reason: |ctx| format!("{} bullish indicators agree ({})", ctx.score.bullish, ctx.score),
        risk: RiskLevel::Medium,
    },
    DecisionRule {
        priority: 4,
        name: "bearish_confluence",
        applies: |ctx| ctx.score.bearish >= 4,
        action: Action::Short,
        reason: |ctx| format!("{} bearish indicators agree ({})", ctx.score.bearish, ctx.score),
        risk: RiskLevel::Medium,
    },
    DecisionRule {
        priority: 5,
        name: "accumulation",
        applies: |ctx| ctx.phase == Phase::Accumulation,
        action: Action::Watch,
        reason: |_| {
            "Possible accumulation: dried-up volume with weak RSI, keep watching".to_string()
        },
        risk: RiskLevel::Low,
    },
    DecisionRule {
        priority: 6,
        name: "bullish_lean",
        applies: |ctx| ctx.score.bullish >= 2 && ctx.score.bearish == 0,
        action: Action::Watch,
        reason: |ctx| {
            format!("Bullish lean without opposition ({}), wait for confirmation", ctx.score)
        },
        risk: RiskLevel::Low,
    },
    DecisionRule {
        priority: 6,
        name: "bearish_lean",
        applies: |ctx| ctx.score.bearish >= 2 && ctx.score.bullish == 0,
        action: Action::Watch,
        reason: |ctx| {
            format!("Bearish lean without opposition ({}), wait for confirmation", ctx.score)
        },
        risk: RiskLevel::Low,
    },
    DecisionRule {
        priority: 7,
        name: "no_signal",
        applies: |_| true,
        action: Action::Wait,
        reason: |ctx| format!("No clear signal ({})", ctx.score),
        risk: RiskLevel::Normal,
    },
];

/// The rule that decides `ctx`.
pub fn fired_rule(ctx: &DecisionContext) -> &'static DecisionRule {
    RULES
        .iter()
        .find(|rule| (rule.applies)(ctx))
        .unwrap_or(&RULES[RULES.len() - 1])
}

pub fn decide(ctx: &DecisionContext) -> Decision {
    let rule = fired_rule(ctx);
    Decision {
        action: rule.action,
        reason: (rule.reason)(ctx),
        risk: rule.risk,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ctx() -> DecisionContext {
        DecisionContext {
            phase: Phase::Neutral,
            breakout: None,
            volume_ratio: 1.0,
            ichimoku: None,
            score: ConfluenceScore::default(),
        }
    }

    fn score(bullish: u32, bearish: u32) -> ConfluenceScore {
        ConfluenceScore { bullish, bearish }
    }

    #[test]
    fn table_is_ordered_by_priority() {
        assert!(RULES.windows(2).all(|w| w[0].priority <= w[1].priority));
        assert_eq!(RULES[0].priority, 1);
        assert_eq!(RULES[RULES.len() - 1].priority, 7);
    }

    #[test]
    fn distribution_overrides_everything() {
        let c = DecisionContext {
            phase: Phase::Distribution,
            breakout: Some(Breakout::Up),
            volume_ratio: 5.0,
            ichimoku: Some(IchimokuSignal::StrongBullish),
            score: score(6, 0),
        };
        let d = decide(&c);
        assert_eq!(d.action, Action::Danger);
        assert_eq!(d.risk, RiskLevel::High);
    }

    #[test]
    fn breakout_needs_volume_above_two() {
        let mut c = ctx();
        c.breakout = Some(Breakout::Up);
        c.volume_ratio = 2.5;
        let d = decide(&c);
        assert_eq!(d.action, Action::Breakout);
        assert_eq!(d.risk, RiskLevel::Medium);
        assert_eq!(d.reason, "Box range broken upward on 2.5x volume");

        c.volume_ratio = 2.0;
        assert_eq!(decide(&c).action, Action::Wait);
    }

    #[test]
    fn downside_breakout_is_not_a_breakout_signal() {
        let mut c = ctx();
        c.breakout = Some(Breakout::Down);
        c.volume_ratio = 4.0;
        assert_eq!(decide(&c).action, Action::Wait);
    }

    #[test]
    fn strong_ichimoku_with_three_votes() {
        let mut c = ctx();
        c.ichimoku = Some(IchimokuSignal::StrongBullish);
        c.score = score(3, 1);
        assert_eq!(decide(&c).action, Action::StrongLong);

        c.ichimoku = Some(IchimokuSignal::StrongBearish);
        c.score = score(0, 3);
        assert_eq!(decide(&c).action, Action::StrongShort);

        c.score = score(0, 2);
        assert_eq!(decide(&c).action, Action::Watch);
    }

    #[test]
    fn four_votes_is_directional() {
        let mut c = ctx();
        c.score = score(4, 1);
        let d = decide(&c);
        assert_eq!(d.action, Action::Long);
        assert_eq!(d.risk, RiskLevel::Medium);

        c.score = score(1, 4);
        assert_eq!(decide(&c).action, Action::Short);
    }

    #[test]
    fn accumulation_is_low_risk_watch() {
        let mut c = ctx();
        c.phase = Phase::Accumulation;
        c.score = score(1, 1);
        let d = decide(&c);
        assert_eq!(d.action, Action::Watch);
        assert_eq!(d.risk, RiskLevel::Low);
        assert_eq!(fired_rule(&c).name, "accumulation");
    }

    #[test]
    fn one_sided_lean_is_watch() {
        let mut c = ctx();
        c.score = score(2, 0);
        assert_eq!(fired_rule(&c).name, "bullish_lean");
        c.score = score(0, 3);
        assert_eq!(fired_rule(&c).name, "bearish_lean");
        c.score = score(2, 1);
        assert_eq!(fired_rule(&c).name, "no_signal");
    }

    #[test]
    fn default_reports_tally() {
        let mut c = ctx();
        c.score = score(1, 1);
        let d = decide(&c);
        assert_eq!(d.action, Action::Wait);
        assert_eq!(d.risk, RiskLevel::Normal);
        assert_eq!(d.reason, "No clear signal (1B/1S)");
    }

    fn arb_ctx() -> impl Strategy<Value = DecisionContext> {
        let phase = prop_oneof![
            Just(Phase::Accumulation),
            Just(Phase::Markup),
            Just(Phase::Distribution),
            Just(Phase::Markdown),
            Just(Phase::Neutral),
        ];
        let breakout =
            prop_oneof![Just(None), Just(Some(Breakout::Up)), Just(Some(Breakout::Down))];
        let ichimoku = prop_oneof![
            Just(None),
            Just(Some(IchimokuSignal::StrongBullish)),
            Just(Some(IchimokuSignal::StrongBearish)),
            Just(Some(IchimokuSignal::Bullish)),
            Just(Some(IchimokuSignal::Bearish)),
            Just(Some(IchimokuSignal::Neutral)),
        ];
        (phase, breakout, 0.0f64..6.0, ichimoku, 0u32..7, 0u32..7).prop_map(
            |(phase, breakout, volume_ratio, ichimoku, bullish, bearish)| DecisionContext {
                phase,
                breakout,
                volume_ratio,
                ichimoku,
                score: ConfluenceScore { bullish, bearish },
            },
        )
    }

    proptest! {
        #[test]
        fn first_matching_rule_decides(c in arb_ctx()) {
            let first = RULES.iter().position(|r| (r.applies)(&c));
            prop_assert!(first.is_some());
            let rule = &RULES[first.unwrap_or(RULES.len() - 1)];
            let d = decide(&c);
            prop_assert_eq!(d.action, rule.action);
            prop_assert_eq!(d.risk, rule.risk);
        }

        #[test]
        fn distribution_always_danger(c in arb_ctx()) {
            let c = DecisionContext { phase: Phase::Distribution, ..c };
            let d = decide(&c);
            prop_assert_eq!(d.action, Action::Danger);
            prop_assert_eq!(d.risk, RiskLevel::High);
        }

        #[test]
        fn decision_is_deterministic(c in arb_ctx()) {
            prop_assert_eq!(decide(&c), decide(&c));
        }
    }
}
