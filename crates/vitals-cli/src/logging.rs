//! tracing-subscriber setup.
//!
//! Logs go to stderr so stdout stays reserved for widget text and reports.

use crate::constants::ENV_LOG;

/// Pick the filter directive: `VITALS_LOG`, then `RUST_LOG`, then
/// `--verbose`, then the config file level.
pub fn resolve_filter(
    verbose: bool,
    vitals_log: Option<String>,
    rust_log: Option<String>,
    config_level: &str,
) -> String {
    vitals_log
        .or(rust_log)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| {
            if verbose {
                "debug".to_string()
            } else {
                config_level.to_string()
            }
        })
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool, config_level: &str) {
    let directive = resolve_filter(
        verbose,
        std::env::var(ENV_LOG).ok(),
        std::env::var("RUST_LOG").ok(),
        config_level,
    );
    let env_filter = tracing_subscriber::EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .try_init();
    tracing::debug!("log filter: {}", directive);
}
