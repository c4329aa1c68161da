use std::time::Instant;

use vitals_core::sync::{
    Dataset, DatasetOutcome, DatasetResult, ExportObserver, ExportPlan, Exporter,
};
use vitals_core::HealthClient;

use crate::app::AppContext;
use crate::cli::ExportArgs;
use crate::ui::format::format_duration_secs;
use crate::ui::{
    badge, blank_line, format_bytes, format_number, header, hint, print, Badge, ProgressBar,
    Spinner, UiContext,
};

use super::print_json;

/// Draws one progress bar per per-day dataset and a status line per file.
struct ExportProgress<'a> {
    ctx: &'a UiContext,
    quiet: bool,
    bar: ProgressBar,
}

impl<'a> ExportProgress<'a> {
    fn new(ctx: &'a UiContext, quiet: bool) -> Self {
        Self {
            ctx,
            quiet,
            bar: ProgressBar::hidden(),
        }
    }

    fn silent(&self) -> bool {
        self.quiet || self.ctx.mode.is_json()
    }
}

impl ExportObserver for ExportProgress<'_> {
    fn dataset_started(&mut self, dataset: Dataset, total: Option<u64>) {
        self.bar = match total {
            Some(days) if !self.silent() => ProgressBar::new(self.ctx, days, dataset.label()),
            _ => ProgressBar::hidden(),
        };
    }

    fn progress(&mut self, dataset: Dataset, done: u64, found: usize) {
        self.bar.set(done);
        self.bar
            .set_message(&format!("{} ({} found)", dataset.label(), found));
    }

    fn dataset_finished(&mut self, outcome: &DatasetOutcome) {
        self.bar.finish();
        if self.silent() {
            return;
        }
        let line = match &outcome.result {
            DatasetResult::Saved { records } => badge(
                self.ctx,
                Badge::Ok,
                &format!(
                    "{:<20} {:>7} records  {}",
                    outcome.dataset.label(),
                    format_number(*records as i64),
                    outcome.dataset.file_name()
                ),
            ),
            DatasetResult::Failed { error } => badge(
                self.ctx,
                Badge::Err,
                &format!("{:<20} {}", outcome.dataset.label(), error),
            ),
        };
        print(self.ctx, &line);
    }
}

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json);
    let data_dir = ctx.data_dir()?.clone();
    let client = ctx.client()?;

    let spinner = Spinner::start(&ui_ctx, "Connecting");
    let name = client.full_name()?;
    spinner.clear();

    if !ui_ctx.mode.is_json() {
        print(
            &ui_ctx,
            &header(&ui_ctx, "export", Some(&data_dir.display().to_string())),
        );
        print(&ui_ctx, &format!("Connected as: {}", name));
        blank_line(&ui_ctx);
    }

    let mut plan = ExportPlan::default();
    if let Some(days) = args.days {
        plan = plan.with_history_days(days);
    }
    tracing::info!(data_dir = %data_dir.display(), history_days = ?args.days, "starting export");

    let started = Instant::now();
    let exporter = Exporter::new(&client, &data_dir, plan);
    let mut observer = ExportProgress::new(&ui_ctx, ctx.quiet());
    let report = exporter.run(ctx.store()?.today(), &mut observer);
    let elapsed = started.elapsed().as_secs_f64();

    if ui_ctx.mode.is_json() {
        return print_json(&report);
    }

    let total_bytes: u64 = report
        .outcomes
        .iter()
        .filter(|o| o.is_saved())
        .filter_map(|o| std::fs::metadata(&o.path).ok())
        .map(|m| m.len())
        .sum();

    blank_line(&ui_ctx);
    print(
        &ui_ctx,
        &format!(
            "Saved {} of {} files ({}) in {}",
            report.saved_count(),
            report.outcomes.len(),
            format_bytes(total_bytes),
            format_duration_secs(elapsed)
        ),
    );

    let failed: Vec<&DatasetOutcome> = report.failed().collect();
    if !failed.is_empty() && !ctx.quiet() {
        print(
            &ui_ctx,
            &hint(
                &ui_ctx,
                &format!(
                    "{} dataset(s) failed; run with --verbose for details.",
                    failed.len()
                ),
            ),
        );
    }
    Ok(())
}
