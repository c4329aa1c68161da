use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Effective configuration; every field has a default so partial files load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalsConfig {
    pub sync: SyncSection,
    pub notifications: NotificationsSection,
    pub widget: WidgetSection,
    pub client: ClientSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSection {
    /// How often the scheduler is expected to call `vitals sync`.
    pub interval_minutes: u32,
    /// Step difference that triggers a rewrite of today's entry.
    pub change_threshold_steps: u32,
    pub waking_hours_start: u32,
    pub waking_hours_end: u32,
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            interval_minutes: 10,
            change_threshold_steps: 100,
            waking_hours_start: 7,
            waking_hours_end: 23,
        }
    }
}

impl SyncSection {
    /// Whether `hour` (0-23, local) falls inside the waking window, inclusive.
    pub fn should_sync_now(&self, hour: u32) -> bool {
        self.waking_hours_start <= hour && hour <= self.waking_hours_end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsSection {
    pub daily_summary_enabled: bool,
    /// Informational; the scheduler decides when `vitals summary` runs.
    pub daily_summary_time: String,
    pub sound: String,
    pub log_to_markdown: bool,
    /// Relative to the data directory.
    pub log_file: String,
}

impl Default for NotificationsSection {
    fn default() -> Self {
        Self {
            daily_summary_enabled: true,
            daily_summary_time: "00:00".to_string(),
            sound: "Glass".to_string(),
            log_to_markdown: true,
            log_file: "daily-summaries.md".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSection {
    pub show_freshness: bool,
    pub freshness_warning_minutes: i64,
    pub refresh_method: RefreshMethod,
    pub plugin_name: String,
}

impl Default for WidgetSection {
    fn default() -> Self {
        Self {
            show_freshness: true,
            freshness_warning_minutes: 30,
            refresh_method: RefreshMethod::UrlScheme,
            plugin_name: "vitals.30m.sh".to_string(),
        }
    }
}

/// How the menu bar host is told to re-run the widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshMethod {
    #[default]
    UrlScheme,
    Touch,
    Restart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    /// Program implementing the client protocol.
    pub command: String,
    /// Leading arguments passed before the operation name.
    pub args: Vec<String>,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            command: "garmin-client".to_string(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn read_config(path: &Path) -> anyhow::Result<VitalsConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Load the config, falling back to defaults.
///
/// A missing file is silent. An unreadable or unparseable file still yields
/// defaults, and the problem is handed back so the caller can log it once
/// logging is up.
pub fn load_or_default(path: &Path) -> (VitalsConfig, Option<anyhow::Error>) {
    if !path.exists() {
        return (VitalsConfig::default(), None);
    }
    match read_config(path) {
        Ok(config) => (config, None),
        Err(err) => (VitalsConfig::default(), Some(err)),
    }
}

pub fn write_config(path: &Path, config: &VitalsConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents = to_toml(config)?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn to_toml(config: &VitalsConfig) -> anyhow::Result<String> {
    toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Some(value) = non_empty_env("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(value).join("vitals"));
    }
    Ok(home_dir()?.join(".config").join("vitals"))
}

/// Token cache handed to the client: `$XDG_CACHE_HOME/garmin`.
pub fn token_cache_dir() -> anyhow::Result<PathBuf> {
    if let Some(value) = non_empty_env("XDG_CACHE_HOME") {
        return Ok(PathBuf::from(value).join("garmin"));
    }
    Ok(home_dir()?.join(".cache").join("garmin"))
}

/// Default data directory when neither `--data-dir` nor `GARMIN_DATA_DIR` is set.
pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    Ok(data_dir_under(&home_dir()?))
}

/// `~/Health/Garmin` when it exists, else the iCloud Drive location.
pub fn data_dir_under(home: &Path) -> PathBuf {
    let local = home.join("Health").join("Garmin");
    if local.is_dir() {
        return local;
    }
    home.join("Library")
        .join("Mobile Documents")
        .join("com~apple~CloudDocs")
        .join("Health")
        .join("Garmin")
}

pub fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = VitalsConfig::default();
        assert_eq!(config.sync.interval_minutes, 10);
        assert_eq!(config.sync.change_threshold_steps, 100);
        assert_eq!(config.notifications.sound, "Glass");
        assert_eq!(config.notifications.log_file, "daily-summaries.md");
        assert_eq!(config.widget.freshness_warning_minutes, 30);
        assert_eq!(config.widget.refresh_method, RefreshMethod::UrlScheme);
        assert_eq!(config.client.command, "garmin-client");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: VitalsConfig = toml::from_str(
            r#"
[sync]
change_threshold_steps = 250

[widget]
refresh_method = "restart"
"#,
        )
        .expect("partial config should parse");
        assert_eq!(config.sync.change_threshold_steps, 250);
        assert_eq!(config.sync.waking_hours_start, 7);
        assert_eq!(config.widget.refresh_method, RefreshMethod::Restart);
        assert!(config.notifications.daily_summary_enabled);
    }

    #[test]
    fn test_should_sync_now_is_inclusive() {
        let sync = SyncSection::default();
        assert!(!sync.should_sync_now(6));
        assert!(sync.should_sync_now(7));
        assert!(sync.should_sync_now(23));
        assert!(!sync.should_sync_now(0));
    }

    #[test]
    fn test_broken_file_yields_defaults_and_problem() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sync\ninterval_minutes = ").expect("write");

        let (config, problem) = load_or_default(&path);
        assert_eq!(config, VitalsConfig::default());
        let problem = problem.expect("parse problem reported");
        assert!(problem.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_missing_file_is_silent() {
        let dir = TempDir::new().expect("tempdir");
        let (config, problem) = load_or_default(&dir.path().join("absent.toml"));
        assert_eq!(config, VitalsConfig::default());
        assert!(problem.is_none());
    }

    #[test]
    fn test_written_config_reads_back() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let mut config = VitalsConfig::default();
        config.client.args = vec!["--profile".to_string(), "home".to_string()];

        write_config(&path, &config).expect("write config");
        assert_eq!(read_config(&path).expect("read config"), config);
    }

    #[test]
    fn test_data_dir_prefers_local_health_folder() {
        let home = TempDir::new().expect("tempdir");
        let icloud = data_dir_under(home.path());
        assert!(icloud.ends_with("com~apple~CloudDocs/Health/Garmin"));

        let local = home.path().join("Health").join("Garmin");
        std::fs::create_dir_all(&local).expect("mkdir");
        assert_eq!(data_dir_under(home.path()), local);
    }
}
