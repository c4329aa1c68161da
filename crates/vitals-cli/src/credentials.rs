//! Account credentials: environment first, then the OS keychain.

use std::path::PathBuf;

use vitals_core::client::ClientCredentials;

use crate::constants::{ENV_EMAIL, ENV_PASSWORD, KEYCHAIN_EMAIL, KEYCHAIN_PASSWORD, KEYCHAIN_SERVICE};
use crate::errors::CliError;

/// Where a credential pair was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    Keychain,
}

impl CredentialSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Environment => "environment",
            Self::Keychain => "keychain",
        }
    }
}

/// Resolve the credential pair handed to the client process.
pub fn resolve(token_dir: Option<PathBuf>) -> anyhow::Result<ClientCredentials> {
    match lookup()? {
        Some((email, password, source)) => {
            tracing::debug!(source = source.label(), "using stored credentials");
            Ok(ClientCredentials {
                email,
                password,
                token_dir,
            })
        }
        None => Err(CliError::not_found(
            "Garmin credentials not found",
            "Hint: Run `vitals credentials set` or export GARMIN_EMAIL and GARMIN_PASSWORD.",
        )
        .into()),
    }
}

/// Find a complete email/password pair, if any.
pub fn lookup() -> anyhow::Result<Option<(String, String, CredentialSource)>> {
    let env_pair = pair(
        std::env::var(ENV_EMAIL).ok(),
        std::env::var(ENV_PASSWORD).ok(),
    );
    if let Some((email, password)) = env_pair {
        return Ok(Some((email, password, CredentialSource::Environment)));
    }
    let keychain_pair = pair(
        keychain_get(KEYCHAIN_EMAIL)?,
        keychain_get(KEYCHAIN_PASSWORD)?,
    );
    Ok(keychain_pair.map(|(email, password)| (email, password, CredentialSource::Keychain)))
}

/// Both halves present and non-blank.
fn pair(email: Option<String>, password: Option<String>) -> Option<(String, String)> {
    let email = email.filter(|v| !v.trim().is_empty())?;
    let password = password.filter(|v| !v.is_empty())?;
    Some((email, password))
}

pub fn store(email: &str, password: &str) -> anyhow::Result<()> {
    keychain_set(KEYCHAIN_EMAIL, email)?;
    keychain_set(KEYCHAIN_PASSWORD, password)
}

pub fn clear() -> anyhow::Result<()> {
    keychain_clear(KEYCHAIN_EMAIL)?;
    keychain_clear(KEYCHAIN_PASSWORD)
}

pub fn keychain_get(account: &str) -> anyhow::Result<Option<String>> {
    let entry = keychain_entry(account)?;
    match entry.get_password() {
        Ok(value) => Ok(Some(value)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(err) => Err(anyhow::anyhow!("Keychain read failed: {}", err)),
    }
}

pub fn keychain_set(account: &str, secret: &str) -> anyhow::Result<()> {
    let entry = keychain_entry(account)?;
    entry
        .set_password(secret)
        .map_err(|e| anyhow::anyhow!("Keychain write failed: {}", e))
}

pub fn keychain_clear(account: &str) -> anyhow::Result<()> {
    let entry = keychain_entry(account)?;
    match entry.delete_password() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(err) => Err(anyhow::anyhow!("Keychain delete failed: {}", err)),
    }
}

fn keychain_entry(account: &str) -> anyhow::Result<keyring::Entry> {
    keyring::Entry::new(KEYCHAIN_SERVICE, account)
        .map_err(|e| anyhow::anyhow!("Keychain entry failed: {}", e))
}
