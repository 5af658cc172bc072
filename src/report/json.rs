use crate::report::LeaderboardView;

pub fn render_leaderboard_json(view: &LeaderboardView<'_>) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(view)?;
    out.push('\n');
    Ok(out)
}
