use chrono::{Local, Timelike};

use vitals_core::sync::DailySync;

use crate::app::AppContext;
use crate::cli::SyncArgs;
use crate::platform;
use crate::ui::format::format_number;
use crate::ui::{badge, print, Badge};

pub fn handle_sync(ctx: &AppContext, args: &SyncArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let settings = &ctx.config().sync;
    let now = Local::now();

    if !args.force && !settings.should_sync_now(now.hour()) {
        tracing::debug!(hour = now.hour(), "outside waking hours; skipping sync");
        if !ctx.quiet() {
            print(
                &ui_ctx,
                &badge(&ui_ctx, Badge::Info, "Outside waking hours, skipped (use --force)"),
            );
        }
        return Ok(());
    }

    let data_dir = ctx.data_dir()?;
    let client = ctx.client()?;
    let outcome =
        DailySync::new(client, data_dir).run(now.date_naive(), settings.change_threshold_steps)?;

    if outcome.changed {
        match platform::refresh_widget(&ctx.config().widget) {
            Ok(true) => tracing::debug!("widget refresh requested"),
            Ok(false) => tracing::debug!("widget refresh not available"),
            Err(err) => tracing::warn!(error = %err, "widget refresh failed"),
        }
    }

    if ctx.quiet() {
        return Ok(());
    }
    let line = if outcome.updated {
        badge(
            &ui_ctx,
            Badge::Ok,
            &format!(
                "Steps updated: {} -> {}",
                format_number(i64::from(outcome.local_steps)),
                format_number(i64::from(outcome.remote_steps))
            ),
        )
    } else {
        badge(
            &ui_ctx,
            Badge::Info,
            &format!(
                "No significant change ({} steps)",
                format_number(i64::from(outcome.remote_steps))
            ),
        )
    };
    print(&ui_ctx, &line);
    Ok(())
}
