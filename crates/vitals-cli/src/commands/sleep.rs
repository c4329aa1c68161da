use chrono::Duration;

use vitals_core::records::Record;
use vitals_core::{HealthClient, Request, SleepRecord};

use crate::app::AppContext;
use crate::cli::SleepArgs;
use crate::errors::CliError;
use crate::ui::format::format_hours_minutes;
use crate::ui::{blank_line, header, kv, print, Spinner};

use super::{print_json, with_day};

pub fn handle_sleep(ctx: &AppContext, args: &SleepArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let store = ctx.store()?;

    let night: Option<SleepRecord> = if args.live {
        let night_of = store.today() - Duration::days(1);
        let client = ctx.client()?;
        let spinner = Spinner::start(&ui_ctx, "Fetching last night's sleep");
        let raw = client.fetch(&Request::Sleep(night_of))?;
        spinner.clear();
        Some(SleepRecord::from_raw(&with_day(raw, night_of))).filter(SleepRecord::has_data)
    } else {
        store.latest_with_sleep()?.cloned()
    };

    let Some(night) = night else {
        return Err(CliError::not_found(
            "No sleep recorded",
            "Hint: Wear the watch overnight, then run `vitals export`.",
        )
        .into());
    };

    if ui_ctx.mode.is_json() {
        return print_json(&night);
    }

    print(
        &ui_ctx,
        &header(&ui_ctx, "sleep", Some(&night.date.to_string())),
    );
    blank_line(&ui_ctx);
    print(
        &ui_ctx,
        &kv(
            &ui_ctx,
            "Duration",
            &format_hours_minutes(u64::from(night.duration_seconds)),
        ),
    );
    for (label, seconds) in [
        ("Deep", night.deep_seconds),
        ("Light", night.light_seconds),
        ("REM", night.rem_seconds),
        ("Awake", night.awake_seconds),
    ] {
        print(&ui_ctx, &kv(&ui_ctx, label, &format!("{} min", seconds / 60)));
    }
    if night.score > 0 {
        print(&ui_ctx, &kv(&ui_ctx, "Score", &format!("{}/100", night.score)));
    }
    Ok(())
}
