use chrono::Duration;
use serde::Serialize;
use serde_json::Value;

use vitals_core::records::Record;
use vitals_core::{HealthClient, Request, WeightRecord};

use crate::app::AppContext;
use crate::cli::WeightArgs;
use crate::errors::CliError;
use crate::ui::format::signed;
use crate::ui::theme::trend_arrow;
use crate::ui::{blank_line, header, kv, print, simple_table, Spinner};

use super::print_json;

const RECENT_ROWS: usize = 5;

#[derive(Debug, Serialize)]
struct WeightView<'a> {
    current: &'a WeightRecord,
    week_change_kg: Option<f64>,
    recent: &'a [WeightRecord],
}

pub fn handle_weight(ctx: &AppContext, args: &WeightArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);

    let weigh_ins: Vec<WeightRecord> = if args.live {
        let store = ctx.store()?;
        let end = store.today();
        let start = end - Duration::days(i64::from(args.days));
        let client = ctx.client()?;
        let spinner = Spinner::start(&ui_ctx, "Fetching weigh-ins");
        let raw = client.fetch(&Request::WeighIns { start, end })?;
        spinner.clear();
        let mut records: Vec<WeightRecord> = raw
            .get("dailyWeightSummaries")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(WeightRecord::from_raw).collect())
            .unwrap_or_default();
        records.sort_by_key(|w| w.date);
        records
    } else {
        ctx.store()?.weight()?.to_vec()
    };
    let weigh_ins: Vec<WeightRecord> = weigh_ins.into_iter().filter(|w| w.has_data()).collect();

    let Some(current) = weigh_ins.last() else {
        return Err(CliError::not_found(
            "No weight entries found",
            "Hint: Run `vitals export` or step on the scale.",
        )
        .into());
    };
    let week_change_kg = (weigh_ins.len() >= 2)
        .then(|| current.weight_kg - weigh_ins[weigh_ins.len().saturating_sub(8)].weight_kg);
    let recent = &weigh_ins[weigh_ins.len().saturating_sub(RECENT_ROWS)..];

    if ui_ctx.mode.is_json() {
        return print_json(&WeightView {
            current,
            week_change_kg,
            recent,
        });
    }

    print(&ui_ctx, &header(&ui_ctx, "weight", None));
    blank_line(&ui_ctx);
    print(
        &ui_ctx,
        &kv(
            &ui_ctx,
            "Current",
            &format!("{:.1} kg ({})", current.weight_kg, current.date),
        ),
    );
    if let Some(change) = week_change_kg {
        print(
            &ui_ctx,
            &kv(
                &ui_ctx,
                "7-day trend",
                &format!(
                    "{} {:.1} kg",
                    trend_arrow(change, ui_ctx.unicode),
                    change.abs()
                ),
            ),
        );
    }
    if let Some(fat) = current.body_fat_pct {
        print(&ui_ctx, &kv(&ui_ctx, "Body fat", &format!("{:.1}%", fat)));
    }

    blank_line(&ui_ctx);
    let mut previous: Option<f64> = None;
    let rows: Vec<Vec<String>> = recent
        .iter()
        .map(|w| {
            let change = previous
                .map(|p| signed(w.weight_kg - p, 1))
                .unwrap_or_default();
            previous = Some(w.weight_kg);
            vec![
                w.date.to_string(),
                format!("{:.1} kg", w.weight_kg),
                change,
            ]
        })
        .collect();
    print(&ui_ctx, &simple_table(&ui_ctx, &["Date", "Weight", "Change"], &rows));
    Ok(())
}
