use crate::model::contest::ContestType;
use crate::model::numeric::{clip01, non_negative, round2};
use crate::model::weights::ScoringWeights;

/// Fraction of test cases passed. A non-positive total scores 0.
pub fn accuracy_score(test_cases_passed: i64, total_test_cases: i64) -> f64 {
    if total_test_cases <= 0 {
        return 0.0;
    }
    clip01(test_cases_passed as f64 / total_test_cases as f64)
}

/// Linear decay from 1 at contest start to 0 at contest end.
///
/// Degenerate contests (`duration_ms <= 0`) and submissions stamped before the
/// start both score 1; anything after the end scores 0.
pub fn speed_score(delay_ms: i64, duration_ms: i64) -> f64 {
    if duration_ms <= 0 || delay_ms < 0 {
        return 1.0;
    }
    if delay_ms > duration_ms {
        return 0.0;
    }
    clip01(1.0 - delay_ms as f64 / duration_ms as f64)
}

pub fn efficiency_score(
    execution_time_ms: f64,
    memory_usage_kb: f64,
    baseline_time_ms: f64,
    baseline_memory_kb: f64,
) -> f64 {
    let time_score = budget_score(execution_time_ms, baseline_time_ms);
    let memory_score = budget_score(memory_usage_kb, baseline_memory_kb);
    clip01(0.6 * time_score + 0.4 * memory_score)
}

fn budget_score(cost: f64, baseline: f64) -> f64 {
    if !(baseline.is_finite() && baseline > 0.0) {
        return 0.0;
    }
    clip01(1.0 - non_negative(cost) / baseline)
}

/// Weighted sum on a 0..100 scale, rounded to 2 decimals.
pub fn composite_score(accuracy: f64, speed: f64, efficiency: f64, weights: ScoringWeights) -> f64 {
    let raw = weighted_sum(accuracy, speed, efficiency, weights);
    round2(raw.clamp(0.0, 100.0))
}

/// Composite score with coding weights.
pub fn coding_composite_score(accuracy: f64, speed: f64, efficiency: f64) -> f64 {
    composite_score(accuracy, speed, efficiency, ScoringWeights::default())
}

/// Unrounded weighted sum, used to re-rank stored components under another contest type.
pub fn ranking_score(accuracy: f64, speed: f64, efficiency: f64, contest_type: ContestType) -> f64 {
    weighted_sum(
        accuracy,
        speed,
        efficiency,
        ScoringWeights::for_contest(contest_type),
    )
}

fn weighted_sum(accuracy: f64, speed: f64, efficiency: f64, weights: ScoringWeights) -> f64 {
    100.0
        * (weights.accuracy * clip01(accuracy)
            + weights.speed * clip01(speed)
            + weights.efficiency * clip01(efficiency))
}

#[cfg(test)]
#[path = "../../tests/src_inline/scoring/components.rs"]
mod tests;
