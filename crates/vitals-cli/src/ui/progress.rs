//! Spinners for live client calls and day counters for the export.
//!
//! Nothing is drawn unless the context allows animation; under SwiftBar,
//! cron or a pipe both types are empty shells.

use std::time::Duration;

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};

use super::context::UiContext;
use super::render::badge;
use super::theme::Badge;

const BRAILLE_TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", ""];
const ASCII_TICKS: &[&str] = &["|", "/", "-", "\\", ""];

fn styled_bar(bar: IndicatifBar, style: ProgressStyle, message: &str) -> IndicatifBar {
    bar.set_style(style);
    bar.set_message(message.to_string());
    bar
}

/// Shown while waiting on the vendor backend.
pub struct Spinner<'a> {
    ctx: &'a UiContext,
    bar: Option<IndicatifBar>,
}

impl<'a> Spinner<'a> {
    pub fn start(ctx: &'a UiContext, message: &str) -> Self {
        let bar = ctx.allows_animation().then(|| {
            let ticks = if ctx.unicode { BRAILLE_TICKS } else { ASCII_TICKS };
            let style = ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}...")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(ticks);
            let bar = styled_bar(IndicatifBar::new_spinner(), style, message);
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Self { ctx, bar }
    }

    pub fn clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish(&self, message: &str) {
        self.clear();
        println!("{}", badge(self.ctx, Badge::Ok, message));
    }

    /// Errors go to stderr so `vitals test` output stays scriptable.
    pub fn finish_err(&self, message: &str) {
        self.clear();
        eprintln!("{}", badge(self.ctx, Badge::Err, message));
    }
}

impl Drop for Spinner<'_> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Counts days fetched for one export dataset.
pub struct ProgressBar {
    bar: Option<IndicatifBar>,
}

impl ProgressBar {
    pub fn new(ctx: &UiContext, days: u64, label: &str) -> Self {
        let bar = ctx.allows_animation().then(|| {
            let (template, fill) = if ctx.unicode {
                ("{msg:<14} [{bar:24.cyan/dim}] {pos}/{len} days", "━━─")
            } else {
                ("{msg:<14} [{bar:24}] {pos}/{len} days", "=>-")
            };
            let style = ProgressStyle::default_bar()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars(fill);
            styled_bar(IndicatifBar::new(days), style, label)
        });
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self { bar: None }
    }

    pub fn set(&self, days_done: u64) {
        if let Some(bar) = &self.bar {
            bar.set_position(days_done);
        }
    }

    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::OutputMode;

    #[test]
    fn test_progress_is_inert_under_cron() {
        let ctx = UiContext {
            is_tty: false,
            color: false,
            unicode: true,
            width: 80,
            mode: OutputMode::Plain,
        };
        let bar = ProgressBar::new(&ctx, 30, "Sleep");
        assert!(bar.bar.is_none());
        bar.set(12);
        bar.finish();

        let spinner = Spinner::start(&ctx, "Connecting");
        assert!(spinner.bar.is_none());
    }
}
