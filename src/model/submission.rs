use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw judge output. Signed so malformed reports survive until validation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeMeasurements {
    pub test_cases_passed: i64,
    pub total_test_cases: i64,
    #[serde(rename = "executionTime")]
    pub execution_time_ms: f64,
    #[serde(rename = "memoryUsage")]
    pub memory_usage_kb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestOutcome {
    pub passed: bool,
    #[serde(rename = "executionTime", default)]
    pub execution_time_ms: f64,
    #[serde(rename = "memory", default)]
    pub memory_kb: f64,
    #[serde(default)]
    pub status: String,
}

/// Per-test results as reported by the external judge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgeReport {
    pub test_results: Vec<TestOutcome>,
}

impl JudgeReport {
    /// Collapses per-test results: passes are counted, time and memory take the worst test.
    pub fn measurements(&self, total_test_cases: usize) -> JudgeMeasurements {
        let mut passed = 0i64;
        let mut time = 0.0f64;
        let mut memory = 0.0f64;
        for outcome in &self.test_results {
            if outcome.passed {
                passed += 1;
            }
            time = time.max(outcome.execution_time_ms);
            memory = memory.max(outcome.memory_kb);
        }
        JudgeMeasurements {
            test_cases_passed: passed,
            total_test_cases: total_test_cases as i64,
            execution_time_ms: time,
            memory_usage_kb: memory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAdjustment {
    pub early_bonus: u32,
    pub penalty: u32,
    pub final_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    pub accuracy: f64,
    pub speed: f64,
    pub efficiency: f64,
    pub composite_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<ScoreAdjustment>,
}

impl ScoreCard {
    /// Score compared when ranking: the adjusted final score if modifiers were applied.
    pub fn ranked_score(&self) -> f64 {
        match self.adjustment {
            Some(adj) => adj.final_score,
            None => self.composite_score,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.accuracy.is_finite()
            && self.speed.is_finite()
            && self.efficiency.is_finite()
            && self.composite_score.is_finite()
            && self.adjustment.is_none_or(|adj| adj.final_score.is_finite())
    }
}

/// A judged submission that has not been scored yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JudgedSubmission {
    pub id: String,
    pub contest_id: String,
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub language: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub measurements: JudgeMeasurements,
}

impl JudgedSubmission {
    pub fn into_scored(self, score: ScoreCard) -> Submission {
        Submission {
            id: self.id,
            contest_id: self.contest_id,
            user_id: self.user_id,
            username: self.username,
            language: self.language,
            submitted_at: self.submitted_at,
            measurements: self.measurements,
            score: Some(score),
        }
    }
}

/// One entry of a contest's append-only submission history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub contest_id: String,
    pub user_id: String,
    pub username: String,
    #[serde(default)]
    pub language: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub measurements: JudgeMeasurements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreCard>,
}

impl Submission {
    /// The score card if it can take part in ranking.
    pub fn ranked_card(&self) -> Option<&ScoreCard> {
        self.score.as_ref().filter(|card| card.is_finite())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/submission.rs"]
mod tests;
