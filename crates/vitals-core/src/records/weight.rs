use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::raw::RawRecord;
use super::Record;
use crate::metric::Metric;

const KG_TO_LB: f64 = 2.20462;

/// Weight summaries name their day `summaryDate`; the other keys show up in
/// body-composition payloads and hand-built files.
pub const WEIGHT_DATE_ALIASES: &[&str] = &["summaryDate", "calendarDate", "_date"];

/// `maxWeight` is the daily summary field; single weigh-ins use `weight`.
pub const WEIGHT_MASS_ALIASES: &[&str] = &["maxWeight", "weight"];

/// One day's weigh-in. Masses are stored in kilograms.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightRecord {
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub bmi: Option<f64>,
    pub body_fat_pct: Option<f64>,
    pub muscle_mass_kg: Option<f64>,
    pub bone_mass_kg: Option<f64>,
    pub body_water_pct: Option<f64>,
}

impl WeightRecord {
    pub fn weight_lb(&self) -> f64 {
        self.weight_kg * KG_TO_LB
    }

    pub fn has_data(&self) -> bool {
        self.weight_kg > 0.0
    }
}

impl Record for WeightRecord {
    const METRIC: Metric = Metric::Weight;

    fn from_raw(raw: &Value) -> Self {
        let raw = RawRecord::new(raw);
        let grams = raw.nonzero_number(WEIGHT_MASS_ALIASES).unwrap_or(0.0);
        Self {
            date: raw.date(WEIGHT_DATE_ALIASES),
            weight_kg: grams / 1000.0,
            bmi: raw.optional_number(&["bmi"]),
            body_fat_pct: raw.optional_number(&["bodyFat"]),
            muscle_mass_kg: raw.nonzero_number(&["muscleMass"]).map(|g| g / 1000.0),
            bone_mass_kg: raw.nonzero_number(&["boneMass"]).map(|g| g / 1000.0),
            body_water_pct: raw.optional_number(&["bodyWater"]),
        }
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}
