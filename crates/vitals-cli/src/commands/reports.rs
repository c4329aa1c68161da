use chrono::Datelike;

use vitals_core::analysis::{PatternReport, SleepReport, WeightTrendReport};
use vitals_core::Metric;

use crate::app::{missing_data_error, AppContext};
use crate::errors::CliError;
use crate::ui::print;
use crate::views::reports::{render_patterns, render_sleep_report, render_weight_trend};

pub fn handle_sleep_report(ctx: &AppContext) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let store = ctx.store()?;

    let path = store.path_for(Metric::Sleep);
    if !path.exists() {
        return Err(missing_data_error("sleep data", &path));
    }

    let report = SleepReport::build(store.sleep()?, store.stats()?);
    print(&ui_ctx, &render_sleep_report(&ui_ctx, &report));
    Ok(())
}

pub fn handle_patterns(ctx: &AppContext) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let store = ctx.store()?;

    let path = store.path_for(Metric::Activity);
    if !path.exists() {
        return Err(missing_data_error("daily stats", &path));
    }

    let report = PatternReport::build(store.stats()?, store.stress()?, store.today().year());
    print(&ui_ctx, &render_patterns(&ui_ctx, &report));
    Ok(())
}

pub fn handle_weight_trend(ctx: &AppContext) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false);
    let store = ctx.store()?;

    let path = store.path_for(Metric::Weight);
    if !path.exists() {
        return Err(missing_data_error("weight data", &path));
    }

    let Some(report) = WeightTrendReport::build(store.weight()?) else {
        return Err(CliError::not_found(
            "No weigh-ins with a weight value",
            "Hint: Step on the scale, then run `vitals export`.",
        )
        .into());
    };
    let goal_kg = store.goals()?.weight_kg;
    print(&ui_ctx, &render_weight_trend(&ui_ctx, &report, Some(goal_kg)));
    Ok(())
}
