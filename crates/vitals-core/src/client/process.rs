use std::fmt;
use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

use super::{HealthClient, Request};
use crate::error::{Result, VitalsError};

/// Login material handed to the client backend through its environment.
#[derive(Clone, Default)]
pub struct ClientCredentials {
    pub email: String,
    pub password: String,
    /// Directory where the backend caches its session tokens.
    pub token_dir: Option<PathBuf>,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("token_dir", &self.token_dir)
            .finish()
    }
}

/// Runs an external helper once per request and parses its stdout as JSON.
///
/// The helper is invoked as `<command> [args..] <operation> <op-args..>`
/// with `GARMIN_EMAIL`, `GARMIN_PASSWORD` and `GARMIN_TOKEN_DIR` set.
#[derive(Debug, Clone)]
pub struct ProcessClient {
    command: String,
    args: Vec<String>,
    credentials: ClientCredentials,
}

impl ProcessClient {
    pub fn new(command: impl Into<String>, credentials: ClientCredentials) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            credentials,
        }
    }

    /// Leading arguments placed before the operation name.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

impl HealthClient for ProcessClient {
    fn fetch(&self, request: &Request) -> Result<Value> {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args)
            .arg(request.operation())
            .args(request.args())
            .env("GARMIN_EMAIL", &self.credentials.email)
            .env("GARMIN_PASSWORD", &self.credentials.password);
        if let Some(dir) = &self.credentials.token_dir {
            cmd.env("GARMIN_TOKEN_DIR", dir);
        }

        tracing::debug!(
            command = %self.command,
            operation = request.operation(),
            "running client"
        );

        let output = cmd.output().map_err(|err| {
            VitalsError::Client(format!("Failed to run {}: {}", self.command, err))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let detail = if stderr.is_empty() {
                format!("{} exited with {}", request.operation(), output.status)
            } else {
                stderr
            };
            return Err(VitalsError::Client(detail));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let body = stdout.trim();
        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(body).map_err(|err| {
            VitalsError::Client(format!(
                "Invalid JSON from {} {}: {}",
                self.command,
                request.operation(),
                err
            ))
        })
    }
}
