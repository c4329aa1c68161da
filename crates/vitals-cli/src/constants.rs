//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// General failure.
    pub const FAILURE: i32 = 1;

    /// Resource not found (data directory, goals, credentials).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication with the health service failed.
    pub const AUTH_FAILED: i32 = 5;

    /// A backing data file exists but cannot be parsed.
    pub const DATA_CORRUPT: i32 = 6;
}

/// Keychain service holding the account credentials.
pub const KEYCHAIN_SERVICE: &str = "garmin";

/// Keychain account names.
pub const KEYCHAIN_EMAIL: &str = "garmin-email";
pub const KEYCHAIN_PASSWORD: &str = "garmin-password";

/// Env overrides consulted before the keychain.
pub const ENV_EMAIL: &str = "GARMIN_EMAIL";
pub const ENV_PASSWORD: &str = "GARMIN_PASSWORD";

/// Env var overriding the config file location.
pub const ENV_CONFIG: &str = "VITALS_CONFIG";

/// Env var with a tracing filter directive; wins over `RUST_LOG`.
pub const ENV_LOG: &str = "VITALS_LOG";

/// Link shown in the widget footer.
pub const SERVICE_URL: &str = "https://connect.garmin.com";

/// Width of the `█░` bars in the goals report.
pub const GOAL_BAR_WIDTH: usize = 20;
