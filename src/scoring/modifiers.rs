use serde::{Deserialize, Serialize};

use crate::model::numeric::round2;
use crate::model::submission::ScoreCard;
use crate::model::weights::{EarlyBonusRule, PenaltyRule, ScoringWeights};

/// Full bonus inside the early window, nothing after the cutoff, linear in between.
pub fn early_submission_bonus(delay_ms: i64, rule: &EarlyBonusRule) -> u32 {
    if delay_ms < 0 {
        return 0;
    }
    if delay_ms <= rule.full_bonus_window_ms {
        return rule.max_bonus;
    }
    if delay_ms >= rule.zero_bonus_after_ms {
        return 0;
    }
    let span = (rule.zero_bonus_after_ms - rule.full_bonus_window_ms) as f64;
    let remaining = (rule.zero_bonus_after_ms - delay_ms) as f64;
    (remaining / span * rule.max_bonus as f64).round() as u32
}

pub fn multiple_submission_penalty(submission_count: u32, rule: &PenaltyRule) -> u32 {
    submission_count
        .saturating_sub(rule.max_allowed)
        .saturating_mul(rule.penalty_per_extra)
}

pub fn final_score(composite_score: f64, early_bonus: u32, penalty: u32) -> f64 {
    round2((composite_score + early_bonus as f64 - penalty as f64).max(0.0))
}

/// Integer points contributed by each axis, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub accuracy_points: u32,
    pub speed_points: u32,
    pub efficiency_points: u32,
    pub early_bonus: u32,
    pub penalty: u32,
}

impl ScoreBreakdown {
    pub fn from_card(card: &ScoreCard, weights: ScoringWeights) -> Self {
        let points = |axis: f64, weight: f64| (axis * weight * 100.0).round().max(0.0) as u32;
        let (early_bonus, penalty) = card
            .adjustment
            .map(|adj| (adj.early_bonus, adj.penalty))
            .unwrap_or((0, 0));
        Self {
            accuracy_points: points(card.accuracy, weights.accuracy),
            speed_points: points(card.speed, weights.speed),
            efficiency_points: points(card.efficiency, weights.efficiency),
            early_bonus,
            penalty,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/scoring/modifiers.rs"]
mod tests;
