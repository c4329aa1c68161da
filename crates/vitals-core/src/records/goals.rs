use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::raw::RawRecord;

pub const DEFAULT_WEIGHT_KG: f64 = 75.0;
pub const DEFAULT_DAILY_STEPS: u32 = 10_000;
pub const DEFAULT_SLEEP_HOURS: f64 = 7.0;
pub const DEFAULT_WORKOUTS_PER_WEEK: u32 = 3;

/// The user's targets, read from `goals.json`.
///
/// Any field missing from the file (or the file itself) falls back to the
/// library defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goals {
    pub weight_kg: f64,
    pub daily_steps: u32,
    pub sleep_hours: f64,
    pub workouts_per_week: u32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            weight_kg: DEFAULT_WEIGHT_KG,
            daily_steps: DEFAULT_DAILY_STEPS,
            sleep_hours: DEFAULT_SLEEP_HOURS,
            workouts_per_week: DEFAULT_WORKOUTS_PER_WEEK,
        }
    }
}

impl Goals {
    /// Build goals from a raw JSON object, defaulting field by field.
    pub fn from_raw(raw: &Value) -> Self {
        let raw = RawRecord::new(raw);
        Self {
            weight_kg: raw
                .optional_number(&["weight_kg"])
                .unwrap_or(DEFAULT_WEIGHT_KG),
            daily_steps: raw
                .optional_u32(&["daily_steps"])
                .unwrap_or(DEFAULT_DAILY_STEPS),
            sleep_hours: raw
                .optional_number(&["sleep_hours"])
                .unwrap_or(DEFAULT_SLEEP_HOURS),
            workouts_per_week: raw
                .optional_u32(&["workouts_per_week"])
                .unwrap_or(DEFAULT_WORKOUTS_PER_WEEK),
        }
    }

    /// Percent of the step goal reached; a zero goal counts as met.
    pub fn steps_pct(&self, steps: u32) -> f64 {
        if self.daily_steps == 0 {
            return 100.0;
        }
        f64::from(steps) / f64::from(self.daily_steps) * 100.0
    }

    pub fn sleep_pct(&self, hours: f64) -> f64 {
        if self.sleep_hours <= 0.0 {
            return 100.0;
        }
        hours / self.sleep_hours * 100.0
    }

    pub fn workouts_pct(&self, workouts: u32) -> f64 {
        if self.workouts_per_week == 0 {
            return 100.0;
        }
        f64::from(workouts) / f64::from(self.workouts_per_week) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let goals = Goals::default();
        assert_eq!(goals.weight_kg, 75.0);
        assert_eq!(goals.daily_steps, 10_000);
        assert_eq!(goals.sleep_hours, 7.0);
        assert_eq!(goals.workouts_per_week, 3);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let goals = Goals::from_raw(&json!({"weight_kg": 70, "sleep_hours": null}));
        assert_eq!(goals.weight_kg, 70.0);
        assert_eq!(goals.sleep_hours, 7.0);
        assert_eq!(goals.daily_steps, 10_000);
    }

    #[test]
    fn test_mistyped_field_defaults() {
        let goals = Goals::from_raw(&json!({"daily_steps": "lots"}));
        assert_eq!(goals.daily_steps, 10_000);
    }

    #[test]
    fn test_zero_goals_count_as_met() {
        let goals = Goals {
            weight_kg: 70.0,
            daily_steps: 0,
            sleep_hours: 0.0,
            workouts_per_week: 0,
        };
        assert_eq!(goals.steps_pct(10), 100.0);
        assert_eq!(goals.sleep_pct(1.0), 100.0);
        assert_eq!(goals.workouts_pct(0), 100.0);
    }

    #[test]
    fn test_serializes_with_file_keys() {
        let value = serde_json::to_value(Goals::default()).unwrap();
        assert_eq!(value["daily_steps"], 10_000);
        assert_eq!(value["workouts_per_week"], 3);
    }
}
