use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::mpsc::Sender;

use crate::leaderboard::store::{
    BroadcastError, BroadcastSink, HistoryRead, LeaderboardWriter, Recorded, StoreError,
    SubmissionStore, WriteOutcome,
};
use crate::model::leaderboard::Leaderboard;
use crate::model::submission::{JudgedSubmission, ScoreCard, Submission};

/// In-process storage: per-contest histories plus one leaderboard document per contest.
#[derive(Debug, Default)]
pub struct MemoryStore {
    histories: RwLock<HashMap<String, Vec<Submission>>>,
    boards: RwLock<HashMap<String, Leaderboard>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history<I>(submissions: I) -> Self
    where
        I: IntoIterator<Item = Submission>,
    {
        let mut histories: HashMap<String, Vec<Submission>> = HashMap::new();
        for submission in submissions {
            histories
                .entry(submission.contest_id.clone())
                .or_default()
                .push(submission);
        }
        Self {
            histories: RwLock::new(histories),
            boards: RwLock::new(HashMap::new()),
        }
    }
}

impl SubmissionStore for MemoryStore {
    fn read_history(&self, contest_id: &str) -> Result<HistoryRead, StoreError> {
        let histories = self
            .histories
            .read()
            .map_err(|_| StoreError::Poisoned(contest_id.to_string()))?;
        let submissions = histories.get(contest_id).cloned().unwrap_or_default();
        let revision = submissions.len() as u64;
        Ok(HistoryRead {
            submissions,
            revision,
        })
    }

    fn append(&self, submission: Submission) -> Result<u64, StoreError> {
        let mut histories = self
            .histories
            .write()
            .map_err(|_| StoreError::Poisoned(submission.contest_id.clone()))?;
        let history = histories.entry(submission.contest_id.clone()).or_default();
        history.push(submission);
        Ok(history.len() as u64)
    }

    fn append_scored(
        &self,
        judged: JudgedSubmission,
        score: &dyn Fn(u32) -> ScoreCard,
    ) -> Result<Recorded, StoreError> {
        let mut histories = self
            .histories
            .write()
            .map_err(|_| StoreError::Poisoned(judged.contest_id.clone()))?;
        let history = histories.entry(judged.contest_id.clone()).or_default();
        let previous = history
            .iter()
            .filter(|s| s.user_id == judged.user_id)
            .count();
        let attempt = u32::try_from(previous + 1).unwrap_or(u32::MAX);
        let submission = judged.into_scored(score(attempt));
        history.push(submission.clone());
        Ok(Recorded {
            submission,
            revision: history.len() as u64,
            attempt,
        })
    }
}

impl LeaderboardWriter for MemoryStore {
    fn replace(&self, snapshot: &Leaderboard) -> Result<WriteOutcome, StoreError> {
        let mut boards = self
            .boards
            .write()
            .map_err(|_| StoreError::Poisoned(snapshot.contest_id.clone()))?;
        if let Some(stored) = boards.get(&snapshot.contest_id)
            && stored.source_revision > snapshot.source_revision
        {
            return Ok(WriteOutcome::Superseded {
                stored_revision: stored.source_revision,
            });
        }
        boards.insert(snapshot.contest_id.clone(), snapshot.clone());
        Ok(WriteOutcome::Replaced)
    }

    fn load(&self, contest_id: &str) -> Result<Option<Leaderboard>, StoreError> {
        let boards = self
            .boards
            .read()
            .map_err(|_| StoreError::Poisoned(contest_id.to_string()))?;
        Ok(boards.get(contest_id).cloned())
    }
}

/// Forwards every snapshot to a channel receiver.
#[derive(Debug)]
pub struct ChannelSink {
    tx: Sender<Leaderboard>,
}

impl ChannelSink {
    pub fn new(tx: Sender<Leaderboard>) -> Self {
        Self { tx }
    }
}

impl BroadcastSink for ChannelSink {
    fn broadcast(&self, snapshot: &Leaderboard) -> Result<(), BroadcastError> {
        self.tx.send(snapshot.clone()).map_err(|_| BroadcastError {
            contest_id: snapshot.contest_id.clone(),
            reason: "listener disconnected".to_string(),
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl BroadcastSink for LogSink {
    fn broadcast(&self, snapshot: &Leaderboard) -> Result<(), BroadcastError> {
        tracing::info!(
            contest_id = %snapshot.contest_id,
            entries = snapshot.entries.len(),
            revision = snapshot.source_revision,
            "leaderboard updated"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/leaderboard/memory.rs"]
mod tests;
