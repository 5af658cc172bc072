use std::fmt::Write;

use crate::report::{LeaderboardView, format_score};

pub fn render_leaderboard_text(view: &LeaderboardView<'_>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Leaderboard: {}", view.contest_id);
    let _ = writeln!(
        out,
        "Updated: {}",
        view.last_updated.format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(
        out,
        "Participants: {}  top={}  median={}  p90={}",
        view.summary.participants,
        format_score(view.summary.top_score),
        format_score(view.summary.median_score),
        format_score(view.summary.p90_score)
    );
    out.push('\n');

    if view.total == 0 {
        out.push_str("(no ranked submissions)\n");
        return out;
    }
    if view.entries.is_empty() {
        let _ = writeln!(
            out,
            "Showing ranks none of {} (offset {} is past the last rank)",
            view.total, view.offset
        );
        return out;
    }

    let name_width = view
        .entries
        .iter()
        .map(|e| e.username.chars().count())
        .max()
        .unwrap_or(0)
        .max("USER".len());

    let _ = writeln!(
        out,
        "{:>4}  {:<name_width$}  {:>7}  {:>5}  {:>5}  {:>5}  SUBMITTED",
        "RANK", "USER", "SCORE", "ACC", "SPD", "EFF"
    );
    for e in view.entries {
        let _ = writeln!(
            out,
            "{:>4}  {:<name_width$}  {:>7}  {:>5.3}  {:>5.3}  {:>5.3}  {}",
            e.rank,
            e.username,
            format_score(e.ranked_score()),
            e.accuracy,
            e.speed,
            e.efficiency,
            e.submitted_at.format("%Y-%m-%dT%H:%M:%SZ")
        );
    }

    let shown_end = view.offset + view.entries.len();
    if shown_end < view.total || view.offset > 0 {
        let _ = writeln!(
            out,
            "\nShowing ranks {}-{} of {}",
            view.offset + 1,
            shown_end,
            view.total
        );
    }
    out
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/text.rs"]
mod tests;
