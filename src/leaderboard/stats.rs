use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::numeric::{round2, round_to};
use crate::model::submission::Submission;

/// Aggregate over every scored submission a user made, across contests.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_submissions: usize,
    pub avg_composite_score: f64,
    pub avg_accuracy: f64,
    pub avg_speed: f64,
    pub avg_efficiency: f64,
    pub best_score: f64,
    pub contests_participated: usize,
}

pub fn user_stats(submissions: &[Submission], user_id: &str) -> UserStats {
    let mut n = 0usize;
    let mut composite = 0.0f64;
    let mut accuracy = 0.0f64;
    let mut speed = 0.0f64;
    let mut efficiency = 0.0f64;
    let mut best = f64::NEG_INFINITY;
    let mut contests = BTreeSet::new();

    for submission in submissions.iter().filter(|s| s.user_id == user_id) {
        let Some(card) = submission.ranked_card() else {
            continue;
        };
        n += 1;
        composite += card.composite_score;
        accuracy += card.accuracy;
        speed += card.speed;
        efficiency += card.efficiency;
        best = best.max(card.composite_score);
        contests.insert(submission.contest_id.as_str());
    }

    if n == 0 {
        return UserStats::default();
    }

    let denom = n as f64;
    UserStats {
        total_submissions: n,
        avg_composite_score: round2(composite / denom),
        avg_accuracy: round_to(accuracy / denom, 3),
        avg_speed: round_to(speed / denom, 3),
        avg_efficiency: round_to(efficiency / denom, 3),
        best_score: round2(best),
        contests_participated: contests.len(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/leaderboard/stats.rs"]
mod tests;
