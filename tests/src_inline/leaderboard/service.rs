use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, mpsc};

use chrono::TimeZone;

use super::*;
use crate::leaderboard::builder::rebuild_leaderboard;
use crate::leaderboard::memory::{ChannelSink, LogSink, MemoryStore};
use crate::leaderboard::store::{HistoryRead, Recorded};
use crate::model::contest::ContestType;
use crate::model::submission::{JudgeMeasurements, ScoreCard};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap()
}

fn contest() -> Contest {
    Contest {
        id: "c1".to_string(),
        title: "Finals".to_string(),
        contest_type: ContestType::Coding,
        start_time: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        end_time: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        test_cases: Vec::new(),
    }
}

fn judged(id: &str, user: &str, passed: i64, minute: u32) -> JudgedSubmission {
    JudgedSubmission {
        id: id.to_string(),
        contest_id: "c1".to_string(),
        user_id: user.to_string(),
        username: user.to_uppercase(),
        language: "rust".to_string(),
        submitted_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, minute, 0).unwrap(),
        measurements: JudgeMeasurements {
            test_cases_passed: passed,
            total_test_cases: 10,
            execution_time_ms: 250.0,
            memory_usage_kb: 512.0,
        },
    }
}

type MemoryService<B> = LeaderboardService<Arc<MemoryStore>, Arc<MemoryStore>, B>;

fn service_with<B: BroadcastSink>(
    sink: B,
    profile: ScoringProfile,
) -> (Arc<MemoryStore>, MemoryService<B>) {
    let store = Arc::new(MemoryStore::new());
    let service = LeaderboardService::new(Arc::clone(&store), Arc::clone(&store), sink, profile)
        .with_clock(fixed_now);
    (store, service)
}

/// Fails the first `failures` writes, then delegates to the inner store.
struct FlakyWriter {
    inner: Arc<MemoryStore>,
    failures: AtomicUsize,
}

impl LeaderboardWriter for FlakyWriter {
    fn replace(&self, snapshot: &Leaderboard) -> Result<WriteOutcome, StoreError> {
        let left = self.failures.load(Ordering::SeqCst);
        if left > 0 {
            self.failures.store(left - 1, Ordering::SeqCst);
            return Err(StoreError::Unavailable("write timed out".to_string()));
        }
        self.inner.replace(snapshot)
    }

    fn load(&self, contest_id: &str) -> Result<Option<Leaderboard>, StoreError> {
        self.inner.load(contest_id)
    }
}

/// Holds appends numbered `gate_from..gate_from + 2` until both have arrived.
struct GatedStore {
    inner: Arc<MemoryStore>,
    calls: AtomicUsize,
    gate_from: usize,
    barrier: Barrier,
}

impl SubmissionStore for GatedStore {
    fn read_history(&self, contest_id: &str) -> Result<HistoryRead, StoreError> {
        self.inner.read_history(contest_id)
    }

    fn append(&self, submission: Submission) -> Result<u64, StoreError> {
        self.inner.append(submission)
    }

    fn append_scored(
        &self,
        judged: JudgedSubmission,
        score: &dyn Fn(u32) -> ScoreCard,
    ) -> Result<Recorded, StoreError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if (self.gate_from..self.gate_from + 2).contains(&n) {
            self.barrier.wait();
        }
        self.inner.append_scored(judged, score)
    }
}

#[test]
fn test_submit_scores_records_and_broadcasts() {
    let (tx, rx) = mpsc::channel();
    let (store, service) = service_with(ChannelSink::new(tx), ScoringProfile::default_v1());

    let outcome = service.submit(&contest(), judged("s1", "ada", 10, 0)).unwrap();
    let card = outcome.submission.score.unwrap();
    assert_eq!(card.accuracy, 1.0);
    assert_eq!(outcome.rebuild.write, WriteOutcome::Replaced);
    assert!(outcome.rebuild.broadcast_delivered);

    let stored = service.current("c1").unwrap().unwrap();
    assert_eq!(stored, outcome.rebuild.snapshot);
    assert_eq!(stored.last_updated, fixed_now());
    assert_eq!(stored.source_revision, 1);
    assert_eq!(rx.recv().unwrap(), stored);
    assert_eq!(store.read_history("c1").unwrap().revision, 1);
}

#[test]
fn test_submit_rejects_invalid_measurements() {
    let (store, service) = service_with(LogSink, ScoringProfile::default_v1());
    let err = service
        .submit(&contest(), judged("bad", "ada", 11, 0))
        .unwrap_err();
    match err {
        SubmitError::Invalid { violations, .. } => {
            assert_eq!(violations, vec![ParamViolation::PassedExceedsTotal]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.read_history("c1").unwrap().revision, 0);
    assert!(service.current("c1").unwrap().is_none());
}

#[test]
fn test_submit_rejects_foreign_contest() {
    let (_, service) = service_with(LogSink, ScoringProfile::default_v1());
    let mut j = judged("s1", "ada", 5, 0);
    j.contest_id = "c2".to_string();
    let err = service.submit(&contest(), j).unwrap_err();
    assert!(matches!(err, SubmitError::ContestMismatch { .. }));
}

#[test]
fn test_penalty_counts_prior_submissions() {
    let (_, service) = service_with(LogSink, ScoringProfile::with_modifiers_v1());
    let mut last = None;
    for i in 0..4u32 {
        let out = service
            .submit(&contest(), judged(&format!("s{i}"), "ada", 10, 55))
            .unwrap();
        last = out.submission.score;
    }
    let adj = last.unwrap().adjustment.unwrap();
    assert_eq!(adj.penalty, 5);
    assert_eq!(adj.early_bonus, 0);

    let board = service.current("c1").unwrap().unwrap();
    assert_eq!(board.entries.len(), 1);
    assert_eq!(board.entries[0].submission_id, "s0");
}

#[test]
fn test_persist_failure_hands_back_snapshot_for_retry() {
    let store = Arc::new(MemoryStore::new());
    let writer = FlakyWriter {
        inner: Arc::clone(&store),
        failures: AtomicUsize::new(1),
    };
    let service = LeaderboardService::new(
        Arc::clone(&store),
        writer,
        LogSink,
        ScoringProfile::default_v1(),
    )
    .with_clock(fixed_now);

    let err = service
        .submit(&contest(), judged("s1", "ada", 7, 20))
        .unwrap_err();
    let SubmitError::Rebuild { source, .. } = err else {
        panic!("expected rebuild failure");
    };
    assert!(matches!(source, RebuildError::Persist { .. }));
    let snapshot = source.into_snapshot().unwrap();
    assert_eq!(snapshot.entries.len(), 1);
    assert_eq!(store.read_history("c1").unwrap().revision, 1);
    assert!(service.current("c1").unwrap().is_none());

    let retried = service.retry_write(snapshot.clone()).unwrap();
    assert_eq!(retried.write, WriteOutcome::Replaced);
    assert_eq!(service.current("c1").unwrap().unwrap(), snapshot);
}

#[test]
fn test_broadcast_failure_keeps_stored_snapshot() {
    let (tx, rx) = mpsc::channel();
    drop(rx);
    let (_, service) = service_with(ChannelSink::new(tx), ScoringProfile::default_v1());
    let outcome = service.submit(&contest(), judged("s1", "ada", 3, 5)).unwrap();
    assert!(!outcome.rebuild.broadcast_delivered);
    assert_eq!(
        service.current("c1").unwrap().unwrap(),
        outcome.rebuild.snapshot
    );
}

#[test]
fn test_rebuild_of_unknown_contest_is_empty() {
    let (_, service) = service_with(LogSink, ScoringProfile::default_v1());
    let outcome = service.rebuild("nothing-yet").unwrap();
    assert!(outcome.snapshot.entries.is_empty());
    assert_eq!(outcome.write, WriteOutcome::Replaced);
}

#[test]
fn test_concurrent_submissions_converge_on_full_snapshot() {
    let (store, service) = service_with(LogSink, ScoringProfile::default_v1());
    let contest = contest();
    let threads = 8u32;
    let per_thread = 25u32;

    std::thread::scope(|scope| {
        for t in 0..threads {
            let service = &service;
            let contest = &contest;
            scope.spawn(move || {
                for i in 0..per_thread {
                    let user = format!("user{:02}", (t * per_thread + i) % 30);
                    let id = format!("t{t}-s{i:02}");
                    let passed = ((t + i) % 11) as i64;
                    service
                        .submit(contest, judged(&id, &user, passed, (i * 2) % 60))
                        .unwrap();
                }
            });
        }
    });

    let history = store.read_history("c1").unwrap();
    let total = (threads * per_thread) as u64;
    assert_eq!(history.revision, total);

    let stored = service.current("c1").unwrap().unwrap();
    assert_eq!(stored.source_revision, total);
    let expected = rebuild_leaderboard("c1", &history.submissions, fixed_now());
    assert_eq!(stored.entries, expected.entries);

    let ranks: Vec<u32> = stored.entries.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, (1..=30).collect::<Vec<_>>());
}

#[test]
fn test_concurrent_rebuilds_of_same_history_agree() {
    let (_, service) = service_with(LogSink, ScoringProfile::default_v1());
    let contest = contest();
    for i in 0..12u32 {
        let j = judged(&format!("s{i}"), &format!("u{}", i % 5), (i % 10) as i64, i);
        service.submit(&contest, j).unwrap();
    }

    let snapshots: Vec<Leaderboard> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..6)
            .map(|_| scope.spawn(|| service.rebuild("c1").unwrap().snapshot))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for snapshot in &snapshots[1..] {
        assert_eq!(snapshot.entries, snapshots[0].entries);
        assert_eq!(snapshot.source_revision, 12);
    }
    let stored = service.current("c1").unwrap().unwrap();
    assert_eq!(stored.entries, snapshots[0].entries);
}

#[test]
fn test_racing_submissions_from_one_user_get_distinct_penalties() {
    let memory = Arc::new(MemoryStore::new());
    let gated = GatedStore {
        inner: Arc::clone(&memory),
        calls: AtomicUsize::new(0),
        gate_from: 3,
        barrier: Barrier::new(2),
    };
    let service = LeaderboardService::new(
        gated,
        Arc::clone(&memory),
        LogSink,
        ScoringProfile::with_modifiers_v1(),
    )
    .with_clock(fixed_now);
    let contest = contest();
    for i in 0..3u32 {
        service
            .submit(&contest, judged(&format!("s{i}"), "ada", 10, 55))
            .unwrap();
    }

    let mut penalties: Vec<u32> = std::thread::scope(|scope| {
        let handles: Vec<_> = (3..5u32)
            .map(|i| {
                let service = &service;
                let contest = &contest;
                scope.spawn(move || {
                    let out = service
                        .submit(contest, judged(&format!("s{i}"), "ada", 10, 55))
                        .unwrap();
                    out.submission.score.unwrap().adjustment.unwrap().penalty
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    penalties.sort_unstable();
    assert_eq!(penalties, vec![5, 10]);
    assert_eq!(memory.read_history("c1").unwrap().revision, 5);
}

#[test]
fn test_snapshot_from_mixed_history_does_not_block_later_rebuilds() {
    let first = judged("s1", "ada", 8, 5);
    let card = score_submission(
        &first.measurements,
        first.submitted_at,
        &contest(),
        &ScoringProfile::default_v1(),
        1,
    );
    let mut history = vec![first.into_scored(card)];
    for i in 0..5 {
        let mut foreign = history[0].clone();
        foreign.id = format!("x{i}");
        foreign.contest_id = "c2".to_string();
        history.push(foreign);
    }

    let store = Arc::new(MemoryStore::with_history(history.clone()));
    let service = LeaderboardService::new(
        Arc::clone(&store),
        Arc::clone(&store),
        LogSink,
        ScoringProfile::default_v1(),
    )
    .with_clock(fixed_now);

    let offline = rebuild_leaderboard("c1", &history, fixed_now());
    assert_eq!(offline.source_revision, 1);
    assert_eq!(store.replace(&offline).unwrap(), WriteOutcome::Replaced);

    let outcome = service.submit(&contest(), judged("s2", "bob", 10, 6)).unwrap();
    assert_eq!(outcome.rebuild.write, WriteOutcome::Replaced);
    let stored = service.current("c1").unwrap().unwrap();
    let users: Vec<&str> = stored.entries.iter().map(|e| e.user_id.as_str()).collect();
    assert_eq!(users, vec!["bob", "ada"]);
}
