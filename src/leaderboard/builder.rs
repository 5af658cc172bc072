use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::model::leaderboard::{Leaderboard, LeaderboardEntry};
use crate::model::submission::{ScoreCard, Submission};

struct Qualifying<'a> {
    submission: &'a Submission,
    card: &'a ScoreCard,
}

impl Qualifying<'_> {
    fn score(&self) -> f64 {
        self.card.ranked_score()
    }
}

/// Recomputes the whole snapshot for `contest_id` from its submission history.
///
/// Submissions for other contests and submissions without a usable score card are
/// skipped. The revision counts this contest's submissions, scored or not, which is
/// the same number a store reports for the contest's history.
pub fn rebuild_leaderboard(
    contest_id: &str,
    submissions: &[Submission],
    now: DateTime<Utc>,
) -> Leaderboard {
    let revision = submissions
        .iter()
        .filter(|s| s.contest_id == contest_id)
        .count() as u64;
    build_snapshot(contest_id, submissions, revision, now)
}

pub fn build_snapshot(
    contest_id: &str,
    submissions: &[Submission],
    source_revision: u64,
    now: DateTime<Utc>,
) -> Leaderboard {
    let mut best: BTreeMap<&str, Qualifying<'_>> = BTreeMap::new();
    let mut skipped = 0usize;

    for submission in submissions {
        if submission.contest_id != contest_id {
            skipped += 1;
            continue;
        }
        let Some(card) = submission.ranked_card() else {
            skipped += 1;
            continue;
        };
        let candidate = Qualifying { submission, card };
        let user = submission.user_id.as_str();
        if best
            .get(user)
            .is_none_or(|current| beats(&candidate, current))
        {
            best.insert(user, candidate);
        }
    }

    if skipped > 0 {
        tracing::debug!(
            contest_id,
            skipped,
            "submissions left out of ranking (foreign contest or unscored)"
        );
    }

    let mut qualifying: Vec<Qualifying<'_>> = best.into_values().collect();
    qualifying.sort_by(compare_for_rank);

    let entries = qualifying
        .iter()
        .enumerate()
        .map(|(idx, q)| to_entry(idx, q))
        .collect::<Vec<_>>();

    Leaderboard {
        contest_id: contest_id.to_string(),
        entries,
        last_updated: now,
        source_revision,
    }
}

/// A participant's best: higher score, then earlier submission, then lower id.
fn beats(candidate: &Qualifying<'_>, current: &Qualifying<'_>) -> bool {
    candidate
        .score()
        .total_cmp(&current.score())
        .reverse()
        .then_with(|| {
            candidate
                .submission
                .submitted_at
                .cmp(&current.submission.submitted_at)
        })
        .then_with(|| candidate.submission.id.cmp(&current.submission.id))
        == Ordering::Less
}

/// Score descending, submission time ascending, user id ascending.
fn compare_for_rank(a: &Qualifying<'_>, b: &Qualifying<'_>) -> Ordering {
    b.score()
        .total_cmp(&a.score())
        .then_with(|| a.submission.submitted_at.cmp(&b.submission.submitted_at))
        .then_with(|| a.submission.user_id.cmp(&b.submission.user_id))
}

fn to_entry(idx: usize, q: &Qualifying<'_>) -> LeaderboardEntry {
    LeaderboardEntry {
        rank: idx as u32 + 1,
        user_id: q.submission.user_id.clone(),
        username: q.submission.username.clone(),
        composite_score: q.card.composite_score,
        final_score: q.card.adjustment.map(|adj| adj.final_score),
        accuracy: q.card.accuracy,
        speed: q.card.speed,
        efficiency: q.card.efficiency,
        submitted_at: q.submission.submitted_at,
        submission_id: q.submission.id.clone(),
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/leaderboard/builder.rs"]
mod tests;
