//! Application context for the Vitals CLI.
//!
//! Bundles the parsed arguments with the effective configuration and a
//! lazily opened [`HealthStore`], so handlers take one parameter.

use std::path::PathBuf;

use once_cell::unsync::OnceCell;

use vitals_core::client::ProcessClient;
use vitals_core::HealthStore;

use crate::cli::Cli;
use crate::config::{token_cache_dir, VitalsConfig};
use crate::credentials;
use crate::ui::UiContext;

use super::resolver::resolve_data_dir;

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: VitalsConfig,
    data_dir: OnceCell<PathBuf>,
    store: OnceCell<HealthStore>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli, config: VitalsConfig) -> Self {
        Self {
            cli,
            config,
            data_dir: OnceCell::new(),
            store: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    pub fn config(&self) -> &VitalsConfig {
        &self.config
    }

    /// Build a UI context for a command's `--json` flag.
    pub fn ui_context(&self, json: bool) -> UiContext {
        UiContext::from_env(json, self.cli.no_color, self.cli.ascii)
    }

    pub fn data_dir(&self) -> anyhow::Result<&PathBuf> {
        self.data_dir.get_or_try_init(|| resolve_data_dir(self.cli))
    }

    /// The store over the data directory, opened on first use.
    pub fn store(&self) -> anyhow::Result<&HealthStore> {
        self.store.get_or_try_init(|| {
            let dir = self.data_dir()?;
            tracing::debug!(data_dir = %dir.display(), "opening health store");
            Ok(HealthStore::new(dir.clone()))
        })
    }

    /// A client for the configured backend command, with resolved credentials.
    pub fn client(&self) -> anyhow::Result<ProcessClient> {
        let token_dir = token_cache_dir().ok();
        let creds = credentials::resolve(token_dir)?;
        let section = &self.config.client;
        Ok(ProcessClient::new(section.command.clone(), creds).with_args(section.args.clone()))
    }
}
