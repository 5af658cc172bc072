use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CONTEST_SCORING_LOG";

/// Installs the stderr subscriber; stdout is reserved for reports.
/// A second call is a no-op.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
