pub mod contest;
pub mod leaderboard;
pub mod numeric;
pub mod submission;
pub mod weights;

pub use contest::{Contest, ContestType, TestCase};
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use submission::{
    JudgeMeasurements, JudgeReport, JudgedSubmission, ScoreAdjustment, ScoreCard, Submission,
    TestOutcome,
};
pub use weights::{EarlyBonusRule, PenaltyRule, ScoringProfile, ScoringWeights};
