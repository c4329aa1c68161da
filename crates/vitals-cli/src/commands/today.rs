use chrono::{Duration, NaiveDate};
use serde::Serialize;

use vitals_core::records::Record;
use vitals_core::{ActivityRecord, HealthClient, Request, SleepRecord, WeightRecord};

use crate::app::AppContext;
use crate::cli::TodayArgs;
use crate::ui::format::{format_hours_minutes, format_number};
use crate::ui::{blank_line, header, hint, kv, print, Spinner};

use super::{print_json, with_day};

#[derive(Debug, Serialize)]
struct TodaySnapshot {
    date: NaiveDate,
    step_goal: u32,
    stats: Option<ActivityRecord>,
    weight: Option<WeightRecord>,
    sleep: Option<SleepRecord>,
}

pub fn handle_today(ctx: &AppContext, args: &TodayArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let store = ctx.store()?;
    let today = store.today();
    let step_goal = store.goals()?.daily_steps;

    let snapshot = if args.live {
        let client = ctx.client()?;
        let spinner = Spinner::start(&ui_ctx, "Fetching today's stats");
        let stats = client.fetch(&Request::Stats(today))?;
        // Weight and sleep are extras; a failed call leaves them out.
        let weight = client
            .fetch(&Request::BodyComposition(today))
            .map_err(|e| tracing::debug!(error = %e, "no live weight"))
            .ok()
            .map(|raw| WeightRecord::from_raw(&with_day(raw, today)))
            .filter(WeightRecord::has_data);
        let sleep = client
            .fetch(&Request::Sleep(today))
            .map_err(|e| tracing::debug!(error = %e, "no live sleep"))
            .ok()
            .map(|raw| SleepRecord::from_raw(&with_day(raw, today)))
            .filter(SleepRecord::has_data);
        spinner.clear();
        TodaySnapshot {
            date: today,
            step_goal,
            stats: Some(ActivityRecord::from_raw(&with_day(stats, today))),
            weight,
            sleep,
        }
    } else {
        TodaySnapshot {
            date: today,
            step_goal,
            stats: store.today_stats()?.cloned(),
            weight: store.latest_where(WeightRecord::has_data)?.cloned(),
            sleep: store
                .latest_where(|s: &SleepRecord| {
                    s.has_data() && s.date >= today - Duration::days(1)
                })?
                .cloned(),
        }
    };

    if ui_ctx.mode.is_json() {
        return print_json(&snapshot);
    }

    print(
        &ui_ctx,
        &header(&ui_ctx, "today", Some(&today.to_string())),
    );
    blank_line(&ui_ctx);

    match &snapshot.stats {
        Some(stats) => {
            print(
                &ui_ctx,
                &kv(
                    &ui_ctx,
                    "Steps",
                    &format!(
                        "{} / {}",
                        format_number(i64::from(stats.total_steps)),
                        format_number(i64::from(snapshot.step_goal))
                    ),
                ),
            );
            print(
                &ui_ctx,
                &kv(
                    &ui_ctx,
                    "Calories",
                    &format!("{} kcal", format_number(i64::from(stats.total_calories))),
                ),
            );
            print(
                &ui_ctx,
                &kv(
                    &ui_ctx,
                    "Active minutes",
                    &format!("{} min", stats.active_minutes()),
                ),
            );
            if let Some(rhr) = stats.resting_hr {
                print(&ui_ctx, &kv(&ui_ctx, "Resting HR", &format!("{} bpm", rhr)));
            }
        }
        None => {
            print(&ui_ctx, &kv(&ui_ctx, "Steps", "no entry for today yet"));
        }
    }

    if let Some(weight) = &snapshot.weight {
        print(
            &ui_ctx,
            &kv(
                &ui_ctx,
                "Weight",
                &format!("{:.1} kg ({})", weight.weight_kg, weight.date),
            ),
        );
    }

    if let Some(sleep) = &snapshot.sleep {
        print(
            &ui_ctx,
            &kv(
                &ui_ctx,
                "Sleep",
                &format_hours_minutes(u64::from(sleep.duration_seconds)),
            ),
        );
    }

    if snapshot.stats.is_none() && !args.live && !ctx.quiet() {
        blank_line(&ui_ctx);
        print(
            &ui_ctx,
            &hint(&ui_ctx, "Run `vitals sync` or use --live for fresh numbers."),
        );
    }

    Ok(())
}
