pub mod builder;
pub mod memory;
pub mod service;
pub mod stats;
pub mod store;

pub use builder::{build_snapshot, rebuild_leaderboard};
pub use memory::{ChannelSink, LogSink, MemoryStore};
pub use service::{LeaderboardService, RebuildError, RebuildOutcome, SubmitError, SubmitOutcome};
pub use stats::{UserStats, user_stats};
pub use store::{
    BroadcastError, BroadcastSink, HistoryRead, LeaderboardWriter, Recorded, StoreError,
    SubmissionStore, WriteOutcome,
};
