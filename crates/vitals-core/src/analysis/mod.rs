//! Multi-record analyses behind the long-form reports.
//!
//! Each report is built from sorted record slices borrowed from a
//! [`crate::store::HealthStore`] and holds plain numbers; formatting is left
//! to the caller. Records dated with the parse-failure sentinel are skipped.

mod patterns;
mod sleep;
mod weight;

pub use patterns::{stress_label, DayExtreme, PatternReport};
pub use sleep::{ActivityCorrelation, RecentSleepTrend, SleepOverview, SleepReport};
pub use weight::{WeightPoint, WeightTrendReport, RECENT_WEIGH_INS};

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Arithmetic mean; `None` for an empty input.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Running sums for per-bucket averages.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Bucket {
    sum: f64,
    count: usize,
}

impl Bucket {
    pub(crate) fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub(crate) fn average(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}
