use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub username: String,
    pub composite_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_score: Option<f64>,
    pub accuracy: f64,
    pub speed: f64,
    pub efficiency: f64,
    pub submitted_at: DateTime<Utc>,
    pub submission_id: String,
}

impl LeaderboardEntry {
    pub fn ranked_score(&self) -> f64 {
        self.final_score.unwrap_or(self.composite_score)
    }
}

/// A complete snapshot for one contest. Only ever replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaderboard {
    pub contest_id: String,
    pub entries: Vec<LeaderboardEntry>,
    pub last_updated: DateTime<Utc>,
    /// Length of the submission history this snapshot was computed from.
    #[serde(default)]
    pub source_revision: u64,
}

impl Leaderboard {
    pub fn empty(contest_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            contest_id: contest_id.to_string(),
            entries: Vec::new(),
            last_updated: now,
            source_revision: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn page(&self, offset: usize, limit: usize) -> &[LeaderboardEntry] {
        let start = offset.min(self.entries.len());
        let end = start.saturating_add(limit).min(self.entries.len());
        &self.entries[start..end]
    }

    pub fn position_of(&self, user_id: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.user_id == user_id)
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/leaderboard.rs"]
mod tests;
