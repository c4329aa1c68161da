use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use vitals_core::VERSION;

/// Vitals - personal health dashboard over your exported Garmin data
#[derive(Parser)]
#[command(name = "vitals")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the exported JSON files
    #[arg(long, global = true, env = "GARMIN_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// ASCII-only bars and rules
    #[arg(long, global = true)]
    pub ascii: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Today's activity, latest weight and last night's sleep
    Today(TodayArgs),

    /// Progress toward weight, steps, sleep and workout goals
    Goals(GoalsArgs),

    /// Current weight, weekly trend and recent weigh-ins
    Weight(WeightArgs),

    /// Long-run weight chart
    WeightTrend,

    /// Last night's sleep
    Sleep(SleepArgs),

    /// Sleep analysis across every recorded night
    SleepReport,

    /// Day-of-week and monthly activity patterns
    Patterns,

    /// Recent workouts
    Activities(ActivitiesArgs),

    /// Download the full account history into the data directory
    Export(ExportArgs),

    /// Refresh today's activity entry when it changed
    Sync(SyncArgs),

    /// Send the end-of-day notification and append to the log
    Summary(SummaryArgs),

    /// Print SwiftBar plugin output
    Widget,

    /// Check every data file
    Check(CheckArgs),

    /// Verify the connection to the service
    Test,

    /// Manage stored service credentials
    Credentials(CredentialsArgs),

    /// Manage the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `today` command
#[derive(Args)]
pub struct TodayArgs {
    /// Fetch from the service instead of the data directory
    #[arg(long)]
    pub live: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `goals` command
#[derive(Args)]
pub struct GoalsArgs {
    /// Ask the service for today's steps when the file has no entry yet
    #[arg(long)]
    pub live: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `weight` command
#[derive(Args)]
pub struct WeightArgs {
    /// Days of history to fetch with --live
    #[arg(long, default_value_t = 30)]
    pub days: u32,

    /// Fetch from the service instead of the data directory
    #[arg(long)]
    pub live: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `sleep` command
#[derive(Args)]
pub struct SleepArgs {
    /// Fetch from the service instead of the data directory
    #[arg(long)]
    pub live: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `activities` command
#[derive(Args)]
pub struct ActivitiesArgs {
    /// Number of workouts to show
    #[arg(long, default_value_t = 10)]
    pub limit: usize,

    /// Fetch from the service instead of the data directory
    #[arg(long)]
    pub live: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Limit per-day datasets to the last N days
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub days: Option<u32>,

    /// Output the export report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `sync` command
#[derive(Args)]
pub struct SyncArgs {
    /// Sync even outside waking hours
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `summary` command
#[derive(Args)]
pub struct SummaryArgs {
    /// Print the summary without notifying or logging
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `check` command
#[derive(Args)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `credentials` command
#[derive(Args)]
pub struct CredentialsArgs {
    #[command(subcommand)]
    pub command: CredentialsSubcommand,
}

#[derive(Subcommand)]
pub enum CredentialsSubcommand {
    /// Store email and password in the OS keychain
    Set(CredentialsSetArgs),
    /// Remove stored credentials
    Clear,
    /// Show where credentials come from
    Status,
}

/// Arguments for the `credentials set` command
#[derive(Args)]
pub struct CredentialsSetArgs {
    /// Account email (prompted when omitted)
    #[arg(long)]
    pub email: Option<String>,
}

/// Arguments for the `config` command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Write a config file with default values
    Init(ConfigInitArgs),
    /// Print the effective configuration
    Show,
    /// Print the config file path
    Path,
}

/// Arguments for the `config init` command
#[derive(Args)]
pub struct ConfigInitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["vitals", "goals", "--ascii", "-q", "--data-dir", "/tmp/g"])
            .unwrap();
        assert!(cli.ascii);
        assert!(cli.quiet);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/g")));
        assert!(matches!(cli.command, Some(Commands::Goals(_))));
    }

    #[test]
    fn test_kebab_case_report_commands() {
        for name in ["sleep-report", "weight-trend", "patterns", "widget"] {
            assert!(Cli::try_parse_from(["vitals", name]).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_nested_subcommands() {
        let cli = Cli::try_parse_from(["vitals", "config", "init", "--force"]).unwrap();
        match cli.command {
            Some(Commands::Config(ConfigArgs {
                command: ConfigSubcommand::Init(args),
            })) => assert!(args.force),
            _ => panic!("expected config init"),
        }
    }

    #[test]
    fn test_export_days_must_be_positive() {
        assert!(Cli::try_parse_from(["vitals", "export", "--days", "0"]).is_err());
        let cli = Cli::try_parse_from(["vitals", "export", "--days", "7"]).unwrap();
        match cli.command {
            Some(Commands::Export(args)) => assert_eq!(args.days, Some(7)),
            _ => panic!("expected export"),
        }
    }
}
