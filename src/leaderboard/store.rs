use crate::model::leaderboard::Leaderboard;
use crate::model::submission::{JudgedSubmission, ScoreCard, Submission};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage lock poisoned for contest {0}")]
    Poisoned(String),
}

#[derive(Debug, thiserror::Error)]
#[error("broadcast for contest {contest_id} failed: {reason}")]
pub struct BroadcastError {
    pub contest_id: String,
    pub reason: String,
}

/// One consistent read of a contest's append-only history.
#[derive(Debug, Clone, Default)]
pub struct HistoryRead {
    pub submissions: Vec<Submission>,
    /// Number of submissions appended so far; grows by one per append.
    pub revision: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Replaced,
    /// A snapshot from a newer history read was already stored; this one was dropped.
    Superseded { stored_revision: u64 },
}

pub trait SubmissionStore: Send + Sync {
    fn read_history(&self, contest_id: &str) -> Result<HistoryRead, StoreError>;

    /// Appends a scored submission and returns the new revision.
    fn append(&self, submission: Submission) -> Result<u64, StoreError>;

    /// Scores and appends `judged` while holding the history for writing.
    ///
    /// `score` receives the participant's 1-based submission number for the contest,
    /// counted under the same lock as the append, so racing submissions from one
    /// participant never see the same number.
    fn append_scored(
        &self,
        judged: JudgedSubmission,
        score: &dyn Fn(u32) -> ScoreCard,
    ) -> Result<Recorded, StoreError>;
}

/// A submission as stored by [`SubmissionStore::append_scored`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub submission: Submission,
    pub revision: u64,
    pub attempt: u32,
}

/// Whole-document storage for leaderboards. `replace` must be atomic.
pub trait LeaderboardWriter: Send + Sync {
    fn replace(&self, snapshot: &Leaderboard) -> Result<WriteOutcome, StoreError>;

    fn load(&self, contest_id: &str) -> Result<Option<Leaderboard>, StoreError>;
}

/// Best-effort fan-out of fresh snapshots.
pub trait BroadcastSink: Send + Sync {
    fn broadcast(&self, snapshot: &Leaderboard) -> Result<(), BroadcastError>;
}

impl<T: SubmissionStore + ?Sized> SubmissionStore for std::sync::Arc<T> {
    fn read_history(&self, contest_id: &str) -> Result<HistoryRead, StoreError> {
        (**self).read_history(contest_id)
    }

    fn append(&self, submission: Submission) -> Result<u64, StoreError> {
        (**self).append(submission)
    }

    fn append_scored(
        &self,
        judged: JudgedSubmission,
        score: &dyn Fn(u32) -> ScoreCard,
    ) -> Result<Recorded, StoreError> {
        (**self).append_scored(judged, score)
    }
}

impl<T: LeaderboardWriter + ?Sized> LeaderboardWriter for std::sync::Arc<T> {
    fn replace(&self, snapshot: &Leaderboard) -> Result<WriteOutcome, StoreError> {
        (**self).replace(snapshot)
    }

    fn load(&self, contest_id: &str) -> Result<Option<Leaderboard>, StoreError> {
        (**self).load(contest_id)
    }
}

impl<T: BroadcastSink + ?Sized> BroadcastSink for std::sync::Arc<T> {
    fn broadcast(&self, snapshot: &Leaderboard) -> Result<(), BroadcastError> {
        (**self).broadcast(snapshot)
    }
}
