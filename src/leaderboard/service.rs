use chrono::{DateTime, Utc};

use crate::leaderboard::builder::build_snapshot;
use crate::leaderboard::store::{
    BroadcastSink, LeaderboardWriter, Recorded, StoreError, SubmissionStore, WriteOutcome,
};
use crate::model::contest::Contest;
use crate::model::leaderboard::Leaderboard;
use crate::model::submission::{JudgedSubmission, Submission};
use crate::model::weights::ScoringProfile;
use crate::scoring::{ParamViolation, score_submission, validate_scoring_params};

#[derive(Debug, thiserror::Error)]
pub enum RebuildError {
    #[error("failed to read submission history for contest {contest_id}: {source}")]
    Read {
        contest_id: String,
        #[source]
        source: StoreError,
    },
    /// The snapshot was computed but could not be stored; it is handed back for a retry.
    #[error("failed to persist leaderboard for contest {}: {source}", .snapshot.contest_id)]
    Persist {
        snapshot: Box<Leaderboard>,
        #[source]
        source: StoreError,
    },
}

impl RebuildError {
    pub fn into_snapshot(self) -> Option<Leaderboard> {
        match self {
            RebuildError::Persist { snapshot, .. } => Some(*snapshot),
            RebuildError::Read { .. } => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("submission {submission_id} targets contest {got}, expected {expected}")]
    ContestMismatch {
        submission_id: String,
        expected: String,
        got: String,
    },
    #[error("submission {submission_id} rejected: {}", join_violations(.violations))]
    Invalid {
        submission_id: String,
        violations: Vec<ParamViolation>,
    },
    #[error("failed to record submission {submission_id}: {source}")]
    Append {
        submission_id: String,
        #[source]
        source: StoreError,
    },
    /// The submission is stored; only the leaderboard refresh failed.
    #[error("submission {submission_id} recorded but leaderboard rebuild failed: {source}")]
    Rebuild {
        submission_id: String,
        #[source]
        source: RebuildError,
    },
}

fn join_violations(violations: &[ParamViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone)]
pub struct RebuildOutcome {
    pub snapshot: Leaderboard,
    pub write: WriteOutcome,
    pub broadcast_delivered: bool,
}

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub submission: Submission,
    pub rebuild: RebuildOutcome,
}

/// Scores incoming submissions and keeps each contest's stored leaderboard a full,
/// self-consistent snapshot of some prefix of the submission history.
///
/// Rebuilds for the same contest may run concurrently from several threads. Each one
/// reads the history once, computes a complete snapshot and replaces the stored
/// document as a whole, so racing rebuilds can only overwrite each other, never merge.
pub struct LeaderboardService<S, W, B> {
    store: S,
    writer: W,
    sink: B,
    profile: ScoringProfile,
    clock: fn() -> DateTime<Utc>,
}

impl<S, W, B> LeaderboardService<S, W, B>
where
    S: SubmissionStore,
    W: LeaderboardWriter,
    B: BroadcastSink,
{
    pub fn new(store: S, writer: W, sink: B, profile: ScoringProfile) -> Self {
        Self {
            store,
            writer,
            sink,
            profile,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn profile(&self) -> &ScoringProfile {
        &self.profile
    }

    /// Validates, scores and records one judged submission, then rebuilds its contest.
    pub fn submit(
        &self,
        contest: &Contest,
        judged: JudgedSubmission,
    ) -> Result<SubmitOutcome, SubmitError> {
        if judged.contest_id != contest.id {
            return Err(SubmitError::ContestMismatch {
                submission_id: judged.id,
                expected: contest.id.clone(),
                got: judged.contest_id,
            });
        }

        let report = validate_scoring_params(&judged.measurements);
        if !report.is_valid {
            tracing::warn!(
                submission_id = %judged.id,
                contest_id = %contest.id,
                violations = report.errors.len(),
                "rejecting judged submission with invalid measurements"
            );
            return Err(SubmitError::Invalid {
                submission_id: judged.id,
                violations: report.errors,
            });
        }

        let submission_id = judged.id.clone();
        let submitted_at = judged.submitted_at;
        let measurements = judged.measurements;
        let score = |attempt: u32| {
            score_submission(
                &measurements,
                submitted_at,
                contest,
                &self.profile,
                attempt,
            )
        };
        let Recorded {
            submission,
            attempt,
            ..
        } = self
            .store
            .append_scored(judged, &score)
            .map_err(|source| SubmitError::Append {
                submission_id,
                source,
            })?;
        tracing::debug!(
            submission_id = %submission.id,
            user_id = %submission.user_id,
            attempt,
            composite = ?submission.score.map(|card| card.composite_score),
            "submission scored and recorded"
        );

        let rebuild = self
            .rebuild(&contest.id)
            .map_err(|source| SubmitError::Rebuild {
                submission_id: submission.id.clone(),
                source,
            })?;
        Ok(SubmitOutcome {
            submission,
            rebuild,
        })
    }

    /// Full recomputation from the stored history followed by an atomic replace.
    pub fn rebuild(&self, contest_id: &str) -> Result<RebuildOutcome, RebuildError> {
        let read = self
            .store
            .read_history(contest_id)
            .map_err(|source| RebuildError::Read {
                contest_id: contest_id.to_string(),
                source,
            })?;
        let now = (self.clock)();
        let snapshot = build_snapshot(contest_id, &read.submissions, read.revision, now);
        self.publish(snapshot)
    }

    /// Re-attempts the write of a snapshot returned by [`RebuildError::Persist`].
    pub fn retry_write(&self, snapshot: Leaderboard) -> Result<RebuildOutcome, RebuildError> {
        self.publish(snapshot)
    }

    pub fn current(&self, contest_id: &str) -> Result<Option<Leaderboard>, StoreError> {
        self.writer.load(contest_id)
    }

    fn publish(&self, snapshot: Leaderboard) -> Result<RebuildOutcome, RebuildError> {
        let write = match self.writer.replace(&snapshot) {
            Ok(write) => write,
            Err(source) => {
                tracing::error!(
                    contest_id = %snapshot.contest_id,
                    error = %source,
                    "leaderboard write failed"
                );
                return Err(RebuildError::Persist {
                    snapshot: Box::new(snapshot),
                    source,
                });
            }
        };

        let broadcast_delivered = match write {
            WriteOutcome::Replaced => match self.sink.broadcast(&snapshot) {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(error = %err, "leaderboard broadcast failed; stored snapshot kept");
                    false
                }
            },
            WriteOutcome::Superseded { stored_revision } => {
                tracing::debug!(
                    contest_id = %snapshot.contest_id,
                    revision = snapshot.source_revision,
                    stored_revision,
                    "newer leaderboard already stored; skipping broadcast"
                );
                false
            }
        };

        Ok(RebuildOutcome {
            snapshot,
            write,
            broadcast_delivered,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/leaderboard/service.rs"]
mod tests;
