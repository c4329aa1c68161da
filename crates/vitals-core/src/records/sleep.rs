use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::raw::RawRecord;
use super::{Record, DAY_ALIASES};
use crate::metric::Metric;

/// One night of sleep, keyed by the calendar day it ended on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepRecord {
    pub date: NaiveDate,
    pub duration_seconds: u32,
    /// Overall sleep score (0-100); 0 when the device did not score the night.
    pub score: u32,
    pub deep_seconds: u32,
    pub light_seconds: u32,
    pub rem_seconds: u32,
    pub awake_seconds: u32,
}

impl SleepRecord {
    pub fn duration_hours(&self) -> f64 {
        f64::from(self.duration_seconds) / 3600.0
    }

    pub fn deep_pct(&self) -> f64 {
        self.stage_pct(self.deep_seconds)
    }

    pub fn rem_pct(&self) -> f64 {
        self.stage_pct(self.rem_seconds)
    }

    /// Whether the night has any recorded sleep.
    pub fn has_data(&self) -> bool {
        self.duration_seconds > 0
    }

    fn stage_pct(&self, stage_seconds: u32) -> f64 {
        if self.duration_seconds == 0 {
            return 0.0;
        }
        f64::from(stage_seconds) / f64::from(self.duration_seconds) * 100.0
    }
}

impl Record for SleepRecord {
    const METRIC: Metric = Metric::Sleep;

    fn from_raw(raw: &Value) -> Self {
        let raw = RawRecord::new(raw);
        Self {
            date: raw.date(DAY_ALIASES),
            duration_seconds: raw.count(&["dailySleepDTO.sleepTimeSeconds"]),
            score: raw.count(&["dailySleepDTO.sleepScores.overall.value"]),
            deep_seconds: raw.count(&["dailySleepDTO.deepSleepSeconds"]),
            light_seconds: raw.count(&["dailySleepDTO.lightSleepSeconds"]),
            rem_seconds: raw.count(&["dailySleepDTO.remSleepSeconds"]),
            awake_seconds: raw.count(&["dailySleepDTO.awakeSleepSeconds"]),
        }
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}
