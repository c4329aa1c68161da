//! Backing-file catalogue.

use std::fmt;

/// A per-day metric with its own backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Sleep,
    Activity,
    Weight,
    Stress,
    BodyBattery,
}

/// Top-level shape of a backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileLayout {
    /// A JSON array of per-day objects.
    Flat,
    /// A JSON object holding the per-day array under the given key.
    Nested(&'static str),
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Sleep,
        Metric::Activity,
        Metric::Weight,
        Metric::Stress,
        Metric::BodyBattery,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Metric::Sleep => "sleep.json",
            Metric::Activity => "daily_stats.json",
            Metric::Weight => "weight.json",
            Metric::Stress => "stress.json",
            Metric::BodyBattery => "body_battery.json",
        }
    }

    pub fn layout(&self) -> FileLayout {
        match self {
            Metric::Weight => FileLayout::Nested("dailyWeightSummaries"),
            _ => FileLayout::Flat,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Sleep => "sleep",
            Metric::Activity => "stats",
            Metric::Weight => "weight",
            Metric::Stress => "stress",
            Metric::BodyBattery => "body_battery",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// File holding the user's goals.
pub const GOALS_FILE: &str = "goals.json";

/// Collaborator file with individual workouts; not a per-day metric.
pub const ACTIVITIES_FILE: &str = "activities.json";
