use vitals_core::records::Record;
use vitals_core::{ActivityRecord, HealthClient, Request};

use crate::app::AppContext;
use crate::cli::GoalsArgs;
use crate::ui::print;
use crate::views::reports::{render_goals, GoalProgress};

use super::{print_json, with_day};

pub fn handle_goals(ctx: &AppContext, args: &GoalsArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let store = ctx.store()?;
    let mut progress = GoalProgress::collect(store)?;

    if args.live && progress.steps_missing_today(store)? {
        let today = store.today();
        match ctx
            .client()
            .and_then(|client| Ok(client.fetch(&Request::Stats(today))?))
        {
            Ok(raw) => {
                let stats = ActivityRecord::from_raw(&with_day(raw, today));
                progress.set_today_steps(stats.total_steps);
            }
            Err(err) => tracing::warn!(error = %err, "live step count unavailable"),
        }
    }

    if ui_ctx.mode.is_json() {
        return print_json(&progress);
    }
    print(&ui_ctx, &render_goals(&ui_ctx, &progress));
    Ok(())
}
