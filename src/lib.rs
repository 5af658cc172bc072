//! Contest-submission scoring and leaderboard rebuild engine.
//!
//! [`scoring`] turns one judged submission into bounded component scores, and
//! [`leaderboard`] folds a contest's whole submission history into a ranked snapshot
//! that is always rebuilt in full and stored by whole-document replacement.

pub mod error;
pub mod input;
pub mod leaderboard;
pub mod logging;
pub mod model;
pub mod report;
pub mod scoring;
