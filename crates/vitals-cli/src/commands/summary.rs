use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::Context;

use crate::app::AppContext;
use crate::cli::SummaryArgs;
use crate::platform;
use crate::ui::{badge, print, Badge};
use crate::views::summary::{DaySummary, LOG_HEADER, NOTIFICATION_TITLE};

pub fn handle_summary(ctx: &AppContext, args: &SummaryArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let settings = &ctx.config().notifications;

    if !settings.daily_summary_enabled {
        tracing::info!("daily summary disabled in config");
        if !ctx.quiet() {
            print(
                &ui_ctx,
                &badge(&ui_ctx, Badge::Info, "Daily summary is disabled in the config"),
            );
        }
        return Ok(());
    }

    let summary = DaySummary::collect(ctx.store()?)?;

    if args.dry_run {
        print(&ui_ctx, NOTIFICATION_TITLE);
        print(&ui_ctx, summary.status());
        print(&ui_ctx, &summary.message());
        return Ok(());
    }

    if let Err(err) = platform::send_notification(
        NOTIFICATION_TITLE,
        Some(summary.status()),
        &summary.message(),
        &settings.sound,
    ) {
        tracing::warn!(error = %err, "notification not delivered");
    }

    if settings.log_to_markdown {
        let log_path = ctx.data_dir()?.join(&settings.log_file);
        append_log(&log_path, &summary.markdown_entry())?;
        tracing::info!(path = %log_path.display(), "summary logged");
        if !ctx.quiet() {
            print(
                &ui_ctx,
                &badge(
                    &ui_ctx,
                    Badge::Ok,
                    &format!("Summary logged to {}", log_path.display()),
                ),
            );
        }
    }
    Ok(())
}

/// Append an entry, writing the header first when the log is new.
pub(crate) fn append_log(path: &Path, entry: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let is_new = !path.exists();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    if is_new {
        file.write_all(LOG_HEADER.as_bytes())?;
    }
    write!(file, "\n{}", entry)?;
    Ok(())
}
