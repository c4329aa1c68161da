use vitals_core::{HealthClient, Request, WorkoutSummary};

use crate::app::AppContext;
use crate::cli::ActivitiesArgs;
use crate::ui::format::truncate;
use crate::ui::{header, hint, print, simple_table, Spinner};

use super::print_json;

const NAME_WIDTH: usize = 28;

pub fn handle_activities(ctx: &AppContext, args: &ActivitiesArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);

    // Newest first in both branches.
    let workouts: Vec<WorkoutSummary> = if args.live {
        let client = ctx.client()?;
        let spinner = Spinner::start(&ui_ctx, "Fetching activities");
        let raw = client.fetch(&Request::Activities {
            start: 0,
            limit: args.limit,
        })?;
        spinner.clear();
        raw.as_array()
            .map(|items| items.iter().map(WorkoutSummary::from_raw).collect())
            .unwrap_or_default()
    } else {
        ctx.store()?
            .workouts()?
            .iter()
            .rev()
            .take(args.limit)
            .cloned()
            .collect()
    };

    if ui_ctx.mode.is_json() {
        return print_json(&workouts);
    }

    print(&ui_ctx, &header(&ui_ctx, "activities", None));
    if workouts.is_empty() {
        print(&ui_ctx, &hint(&ui_ctx, "No workouts recorded."));
        return Ok(());
    }

    let rows: Vec<Vec<String>> = workouts
        .iter()
        .map(|w| {
            vec![
                w.start_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                truncate(&w.name, NAME_WIDTH),
                w.kind.clone(),
                format!("{} min", w.duration_minutes()),
                distance_cell(w),
            ]
        })
        .collect();
    print(
        &ui_ctx,
        &simple_table(
            &ui_ctx,
            &["Date", "Name", "Type", "Duration", "Distance"],
            &rows,
        ),
    );
    Ok(())
}

fn distance_cell(workout: &WorkoutSummary) -> String {
    if workout.distance_meters > 0.0 {
        format!("{:.2} km", workout.distance_km())
    } else {
        "-".to_string()
    }
}
