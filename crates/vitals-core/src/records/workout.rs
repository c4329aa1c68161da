use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::raw::{parse_day, RawRecord};

/// One workout from `activities.json`.
///
/// Workouts are not one-per-day, so this type is not a [`super::Record`];
/// the store keeps them in file order sorted by start date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutSummary {
    pub start_date: Option<NaiveDate>,
    pub name: String,
    pub kind: String,
    pub duration_seconds: f64,
    pub distance_meters: f64,
}

impl WorkoutSummary {
    pub fn from_raw(raw: &Value) -> Self {
        let raw = RawRecord::new(raw);
        Self {
            start_date: raw.text(&["startTimeLocal"]).and_then(parse_day),
            name: raw.text(&["activityName"]).unwrap_or("Unknown").to_string(),
            kind: raw
                .text(&["activityType.typeKey"])
                .unwrap_or("unknown")
                .to_string(),
            duration_seconds: raw.number(&["duration"]),
            distance_meters: raw.number(&["distance"]),
        }
    }

    pub fn duration_minutes(&self) -> u32 {
        (self.duration_seconds / 60.0).max(0.0) as u32
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_meters / 1000.0
    }
}
