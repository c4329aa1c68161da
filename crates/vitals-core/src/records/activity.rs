use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::raw::RawRecord;
use super::{Record, DAY_ALIASES};
use crate::metric::Metric;

/// One day of activity totals from `daily_stats.json`.
///
/// Heart-rate and stress fields stay `None` when the device did not report
/// them, so "not measured" is distinguishable from a measured zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub total_steps: u32,
    pub total_calories: u32,
    pub active_calories: u32,
    pub active_seconds: u32,
    pub resting_hr: Option<u32>,
    pub max_hr: Option<u32>,
    pub min_hr: Option<u32>,
    pub avg_stress: Option<u32>,
    pub floors_climbed: f64,
    pub distance_meters: f64,
}

impl ActivityRecord {
    pub fn active_minutes(&self) -> u32 {
        self.active_seconds / 60
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }

    /// Whether the day has any recorded steps.
    pub fn has_data(&self) -> bool {
        self.total_steps > 0
    }
}

impl Record for ActivityRecord {
    const METRIC: Metric = Metric::Activity;

    fn from_raw(raw: &Value) -> Self {
        let raw = RawRecord::new(raw);
        Self {
            date: raw.date(DAY_ALIASES),
            total_steps: raw.count(&["totalSteps"]),
            total_calories: raw.count(&["totalKilocalories"]),
            active_calories: raw.count(&["activeKilocalories"]),
            active_seconds: raw.count(&["activeSeconds"]),
            resting_hr: raw.optional_u32(&["restingHeartRate"]),
            max_hr: raw.optional_u32(&["maxHeartRate"]),
            min_hr: raw.optional_u32(&["minHeartRate"]),
            avg_stress: raw.optional_u32(&["averageStressLevel"]),
            floors_climbed: raw.number(&["floorsAscended"]),
            distance_meters: raw.number(&["totalDistanceMeters"]),
        }
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}
