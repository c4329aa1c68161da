//! Vitals CLI - a personal health dashboard over exported Garmin data
//!
//! Reports, the SwiftBar widget, the daily summary and the sync drivers all
//! read and write the JSON files in one data directory through `vitals_core`.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod credentials;
mod errors;
mod logging;
mod platform;
mod ui;
mod views;

use clap::Parser;
use vitals_core::{VitalsError, VERSION};

use crate::app::{resolve_config_path, AppContext};
use crate::cli::{Cli, Commands};
use crate::commands::{
    activities, check, config as config_cmd, connection, credentials as credentials_cmd, export,
    goals, misc, reports, sleep, summary, sync, today, weight, widget,
};
use crate::ui::{hint, print, print_error};

fn main() {
    let cli = Cli::parse();

    let (config, config_err) = match resolve_config_path() {
        Ok(path) => config::load_or_default(&path),
        Err(err) => (config::VitalsConfig::default(), Some(err)),
    };
    logging::init(cli.verbose, &config.logging.level);
    if let Some(err) = config_err {
        tracing::warn!(error = %err, "using default configuration");
    }

    let ctx = AppContext::new(&cli, config);

    if let Err(e) = run(&ctx, &cli) {
        let e = match e.downcast::<VitalsError>() {
            Ok(core) => errors::from_core(core),
            Err(other) => other,
        };
        let ui_ctx = ctx.ui_context(false);

        let error_msg = format!("{}", e);
        let (message, hint) = split_hint(&error_msg);

        print_error(&ui_ctx, message, hint.as_deref());
        std::process::exit(errors::exit_code_for(&e));
    }
}

/// Separate an embedded `Hint:` line from the message, or supply one when
/// the client backend could not be started.
fn split_hint(error: &str) -> (&str, Option<String>) {
    if let Some(idx) = error.find("\nHint:") {
        return (&error[..idx], Some(error[idx + 1..].to_string()));
    }

    let error_lower = error.to_lowercase();

    if error_lower.contains("failed to run") {
        return (
            error,
            Some("Hint: Set [client] command in the config to the backend program.".to_string()),
        );
    }

    (error, None)
}

fn run(ctx: &AppContext, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Today(args)) => today::handle_today(ctx, args),
        Some(Commands::Goals(args)) => goals::handle_goals(ctx, args),
        Some(Commands::Weight(args)) => weight::handle_weight(ctx, args),
        Some(Commands::WeightTrend) => reports::handle_weight_trend(ctx),
        Some(Commands::Sleep(args)) => sleep::handle_sleep(ctx, args),
        Some(Commands::SleepReport) => reports::handle_sleep_report(ctx),
        Some(Commands::Patterns) => reports::handle_patterns(ctx),
        Some(Commands::Activities(args)) => activities::handle_activities(ctx, args),
        Some(Commands::Export(args)) => export::handle_export(ctx, args),
        Some(Commands::Sync(args)) => sync::handle_sync(ctx, args),
        Some(Commands::Summary(args)) => summary::handle_summary(ctx, args),
        Some(Commands::Widget) => widget::handle_widget(ctx),
        Some(Commands::Check(args)) => check::handle_check(ctx, args),
        Some(Commands::Test) => connection::handle_test(ctx),
        Some(Commands::Credentials(args)) => credentials_cmd::handle_credentials(ctx, args),
        Some(Commands::Config(args)) => config_cmd::handle_config(ctx, args),
        Some(Commands::Completions(args)) => misc::handle_completions(args),
        None => {
            let ui_ctx = ctx.ui_context(false);
            print(&ui_ctx, &format!("vitals {}", VERSION));
            if !cli.quiet {
                print(&ui_ctx, &hint(&ui_ctx, "Run `vitals --help` for commands."));
            }
            Ok(())
        }
    }
}
