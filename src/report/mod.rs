pub mod json;
pub mod text;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::leaderboard::{Leaderboard, LeaderboardEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Json,
    Text,
}

/// A paginated window onto a snapshot plus summary figures over all entries.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardView<'a> {
    pub contest_id: &'a str,
    pub entries: &'a [LeaderboardEntry],
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
    pub last_updated: DateTime<Utc>,
    pub summary: ScoreSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub participants: usize,
    pub top_score: f64,
    pub median_score: f64,
    pub p90_score: f64,
}

impl<'a> LeaderboardView<'a> {
    pub fn new(board: &'a Leaderboard, offset: usize, limit: usize) -> Self {
        Self {
            contest_id: &board.contest_id,
            entries: board.page(offset, limit),
            total: board.len(),
            offset,
            limit,
            last_updated: board.last_updated,
            summary: summarize(board),
        }
    }
}

pub fn summarize(board: &Leaderboard) -> ScoreSummary {
    let scores: Vec<f64> = board.entries.iter().map(|e| e.ranked_score()).collect();
    ScoreSummary {
        participants: scores.len(),
        top_score: scores.iter().copied().fold(0.0, f64::max),
        median_score: median(&scores),
        p90_score: p90(&scores),
    }
}

pub fn format_score(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn quantile_indexed(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    let idx = ((n - 1) as f64 * p).ceil() as usize;
    sorted[idx]
}

pub fn median(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.5)
}

pub fn p90(values: &[f64]) -> f64 {
    quantile_indexed(values, 0.90)
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
