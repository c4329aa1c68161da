//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes; anything else bubbling up as a
//! plain `anyhow::Error` exits with the general failure code.

use std::fmt;

use vitals_core::VitalsError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (data directory, credentials, goals)
    NotFound { message: String, hint: String },

    /// The health service rejected the credentials
    AuthFailed {
        message: String,
        hint: Option<String>,
    },

    /// Invalid user input
    InvalidInput(String),

    /// A backing file is unreadable
    DataCorrupt { message: String, hint: String },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } | CliError::DataCorrupt { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an AuthFailed error with message and hint.
    pub fn auth_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
            CliError::DataCorrupt { .. } => exit_codes::DATA_CORRUPT,
        }
    }
}

/// Translate core errors into CLI errors where an exit code applies.
pub fn from_core(err: VitalsError) -> anyhow::Error {
    match err {
        VitalsError::Corrupt { .. } => CliError::DataCorrupt {
            message: err.to_string(),
            hint: "Hint: Re-run `vitals export` to rebuild the data files.".to_string(),
        }
        .into(),
        VitalsError::InvalidInput(message) => CliError::InvalidInput(message).into(),
        VitalsError::Client(ref detail) if is_auth_failure(detail) => {
            CliError::auth_failed_with_hint(
                err.to_string(),
                "Hint: Check your login with `vitals credentials status`.",
            )
            .into()
        }
        other => anyhow::Error::new(other),
    }
}

fn is_auth_failure(detail: &str) -> bool {
    let lower = detail.to_lowercase();
    ["auth", "login", "401", "403", "password"]
        .iter()
        .any(|needle| lower.contains(needle))
}

/// Exit code for any error that reached `main`.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli) = err.downcast_ref::<CliError>() {
        return cli.exit_code();
    }
    if let Some(core) = err.downcast_ref::<VitalsError>() {
        if core.is_corrupt() {
            return exit_codes::DATA_CORRUPT;
        }
    }
    exit_codes::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CliError::not_found("x", "y").exit_code(), exit_codes::NOT_FOUND);
        assert_eq!(
            CliError::invalid_input("bad").exit_code(),
            exit_codes::INVALID_INPUT
        );
        assert_eq!(
            CliError::auth_failed_with_hint("no", "Hint: login").exit_code(),
            exit_codes::AUTH_FAILED
        );
    }

    #[test]
    fn test_not_found_display_includes_hint() {
        let err = CliError::not_found("No goals", "Hint: create goals.json");
        assert_eq!(err.to_string(), "No goals\nHint: create goals.json");
    }

    #[test]
    fn test_core_corrupt_maps_to_data_corrupt() {
        let core = VitalsError::Corrupt {
            path: "sleep.json".into(),
            message: "expected value".to_string(),
        };
        let err = from_core(core);
        assert_eq!(exit_code_for(&err), exit_codes::DATA_CORRUPT);
        assert!(err.to_string().contains("sleep.json"));
    }

    #[test]
    fn test_client_login_failure_maps_to_auth_failed() {
        let err = from_core(VitalsError::Client("login failed".to_string()));
        assert_eq!(exit_code_for(&err), exit_codes::AUTH_FAILED);
        assert!(err.to_string().contains("\nHint: Check your login"));

        let err = from_core(VitalsError::Client("timed out".to_string()));
        assert_eq!(exit_code_for(&err), exit_codes::FAILURE);
    }

    #[test]
    fn test_plain_error_is_general_failure() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(exit_code_for(&err), exit_codes::FAILURE);
    }
}
