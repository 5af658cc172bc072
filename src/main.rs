use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;

use contest_scoring::error::AppError;
use contest_scoring::input::{load_contest, load_judged, load_profile, load_submissions};
use contest_scoring::leaderboard::{LeaderboardService, LogSink, MemoryStore, user_stats};
use contest_scoring::logging::init_tracing;
use contest_scoring::model::leaderboard::DEFAULT_PAGE_LIMIT;
use contest_scoring::model::{ScoreCard, ScoringProfile, ScoringWeights, Submission};
use contest_scoring::report::json::render_leaderboard_json;
use contest_scoring::report::text::render_leaderboard_text;
use contest_scoring::report::{LeaderboardView, ReportFormat};
use contest_scoring::scoring::{ScoreBreakdown, score_submission, validate_scoring_params};

#[derive(Debug, Parser)]
#[command(name = "contest-scoring", version, about)]
struct Cli {
    /// Log at debug level unless CONTEST_SCORING_LOG overrides it.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score one judged submission against its contest.
    Score {
        #[arg(long)]
        contest: PathBuf,
        #[arg(long)]
        judged: PathBuf,
        #[command(flatten)]
        profile: ProfileArgs,
        /// Submissions this participant has made to the contest, including this one.
        #[arg(long, default_value_t = 1)]
        submission_count: u32,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check judged measurements without scoring them.
    Validate {
        #[arg(long)]
        judged: PathBuf,
    },
    /// Rebuild a contest leaderboard from its full submission history.
    Rebuild {
        #[arg(long)]
        contest_id: String,
        #[arg(long)]
        submissions: PathBuf,
        #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Aggregate one user's scored submissions across contests.
    Stats {
        #[arg(long)]
        submissions: PathBuf,
        #[arg(long)]
        user: String,
    },
}

#[derive(Debug, Clone, clap::Args)]
struct ProfileArgs {
    /// JSON scoring profile; missing fields take the v1 defaults.
    #[arg(long)]
    profile: Option<PathBuf>,
    /// Apply the default early-submission bonus and multiple-submission penalty.
    #[arg(long, conflicts_with = "profile")]
    with_modifiers: bool,
}

impl ProfileArgs {
    fn resolve(&self) -> Result<ScoringProfile, AppError> {
        match &self.profile {
            Some(path) => Ok(load_profile(path)?),
            None if self.with_modifiers => Ok(ScoringProfile::with_modifiers_v1()),
            None => Ok(ScoringProfile::default_v1()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScoredOutput<'a> {
    submission: &'a Submission,
    breakdown: ScoreBreakdown,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Err(err) = run(cli.command) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Score {
            contest,
            judged,
            profile,
            submission_count,
            out,
        } => {
            let contest = load_contest(&contest)?;
            let judged = load_judged(&judged)?;
            let profile = profile.resolve()?;

            let report = validate_scoring_params(&judged.measurements);
            if !report.is_valid {
                let reasons = report
                    .errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>();
                return Err(AppError::Rejected(format!(
                    "submission {} rejected: {}",
                    judged.id,
                    reasons.join("; ")
                )));
            }

            let card: ScoreCard = score_submission(
                &judged.measurements,
                judged.submitted_at,
                &contest,
                &profile,
                submission_count.max(1),
            );
            let weights = ScoringWeights::for_contest(contest.contest_type);
            let submission = judged.into_scored(card);
            let output = ScoredOutput {
                submission: &submission,
                breakdown: ScoreBreakdown::from_card(&card, weights),
            };
            emit(out.as_deref(), &to_json(&output)?)
        }
        Command::Validate { judged } => {
            let judged = load_judged(&judged)?;
            let report = validate_scoring_params(&judged.measurements);
            emit(None, &to_json(&report)?)?;
            if report.is_valid {
                Ok(())
            } else {
                Err(AppError::Rejected(format!(
                    "submission {} has {} invalid measurement(s)",
                    judged.id,
                    report.errors.len()
                )))
            }
        }
        Command::Rebuild {
            contest_id,
            submissions,
            format,
            offset,
            limit,
            out,
        } => {
            let history = load_submissions(&submissions)?;
            let store = Arc::new(MemoryStore::with_history(history));
            let service = LeaderboardService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                LogSink,
                ScoringProfile::default_v1(),
            );
            let outcome = service.rebuild(&contest_id)?;
            let view = LeaderboardView::new(&outcome.snapshot, offset, limit);
            let body = match format {
                ReportFormat::Json => render_leaderboard_json(&view)?,
                ReportFormat::Text => render_leaderboard_text(&view),
            };
            emit(out.as_deref(), &body)
        }
        Command::Stats { submissions, user } => {
            let history = load_submissions(&submissions)?;
            let stats = user_stats(&history, &user);
            emit(None, &to_json(&stats)?)
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

fn emit(out: Option<&Path>, body: &str) -> Result<(), AppError> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|source| AppError::Output {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
            std::fs::write(path, body).map_err(|source| AppError::Output {
                path: path.display().to_string(),
                source,
            })?;
            tracing::info!(path = %path.display(), "wrote output");
            Ok(())
        }
        None => {
            print!("{body}");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
