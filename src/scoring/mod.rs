//! Pure scoring functions. Every function is total: out-of-range measurements are
//! clamped rather than rejected, and rejection is left to [`validate_scoring_params`].

pub mod components;
pub mod modifiers;
pub mod validate;

use chrono::{DateTime, Utc};

use crate::model::contest::Contest;
use crate::model::submission::{JudgeMeasurements, ScoreAdjustment, ScoreCard};
use crate::model::weights::{ScoringProfile, ScoringWeights};

pub use components::{
    accuracy_score, coding_composite_score, composite_score, efficiency_score, ranking_score,
    speed_score,
};
pub use modifiers::{
    ScoreBreakdown, early_submission_bonus, final_score, multiple_submission_penalty,
};
pub use validate::{ParamViolation, ValidationReport, validate_scoring_params};

/// Scores one judged submission.
///
/// `submission_count` is the participant's number of submissions to this contest
/// including this one; it only matters when the profile carries a penalty rule.
pub fn score_submission(
    measurements: &JudgeMeasurements,
    submitted_at: DateTime<Utc>,
    contest: &Contest,
    profile: &ScoringProfile,
    submission_count: u32,
) -> ScoreCard {
    let delay_ms = contest.delay_ms(submitted_at);
    let accuracy = accuracy_score(
        measurements.test_cases_passed,
        measurements.total_test_cases,
    );
    let speed = speed_score(delay_ms, contest.duration_ms());
    let efficiency = efficiency_score(
        measurements.execution_time_ms,
        measurements.memory_usage_kb,
        profile.baseline_time_ms,
        profile.baseline_memory_kb,
    );
    let weights = ScoringWeights::for_contest(contest.contest_type);
    let composite = composite_score(accuracy, speed, efficiency, weights);

    let adjustment = profile.has_modifiers().then(|| {
        let early_bonus = profile
            .early_bonus
            .map(|rule| early_submission_bonus(delay_ms, &rule))
            .unwrap_or(0);
        let penalty = profile
            .penalty
            .map(|rule| multiple_submission_penalty(submission_count, &rule))
            .unwrap_or(0);
        ScoreAdjustment {
            early_bonus,
            penalty,
            final_score: final_score(composite, early_bonus, penalty),
        }
    });

    ScoreCard {
        accuracy,
        speed,
        efficiency,
        composite_score: composite,
        adjustment,
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/scoring/mod.rs"]
mod tests;
