//! Typed per-day records built from raw vendor JSON.
//!
//! Construction never fails: [`Record::from_raw`] applies the defaulting
//! policy in [`raw`] and always returns a fully populated value.
//!
//! Date alias precedence (first alias that parses wins):
//!
//! | Record | Aliases |
//! |---|---|
//! | sleep, activity, stress, body battery | `_date`, `calendarDate` |
//! | weight | `summaryDate`, `calendarDate`, `_date` |

use chrono::NaiveDate;
use serde_json::Value;

use crate::metric::Metric;

mod activity;
mod body_battery;
mod goals;
pub mod raw;
mod sleep;
mod stress;
mod weight;
mod workout;

pub use activity::ActivityRecord;
pub use body_battery::BodyBatteryRecord;
pub use goals::Goals;
pub use raw::{is_sentinel_date, parse_day, sentinel_date, RawRecord};
pub use sleep::SleepRecord;
pub use stress::StressRecord;
pub use weight::{WeightRecord, WEIGHT_DATE_ALIASES, WEIGHT_MASS_ALIASES};
pub use workout::WorkoutSummary;

/// Date keys for every per-day metric except weight.
pub const DAY_ALIASES: &[&str] = &["_date", "calendarDate"];

/// One day's normalized measurement for a single metric.
pub trait Record: Sized {
    /// Metric whose backing file holds this record type.
    const METRIC: Metric;

    /// Build a record from one raw JSON object. Never fails.
    fn from_raw(raw: &Value) -> Self;

    /// Calendar day the record belongs to.
    fn date(&self) -> NaiveDate;
}
