use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::raw::RawRecord;
use super::{Record, DAY_ALIASES};
use crate::metric::Metric;

/// One day of body-battery energy accounting.
///
/// The exporter stores the vendor response under `data`, which is normally a
/// one-element array; only its first element is read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyBatteryRecord {
    pub date: NaiveDate,
    pub charged: u32,
    pub drained: u32,
}

impl BodyBatteryRecord {
    pub fn net_change(&self) -> i64 {
        i64::from(self.charged) - i64::from(self.drained)
    }
}

impl Record for BodyBatteryRecord {
    const METRIC: Metric = Metric::BodyBattery;

    fn from_raw(raw: &Value) -> Self {
        let outer = RawRecord::new(raw);
        let day = match outer.get("data") {
            Some(Value::Array(items)) => items.first(),
            Some(object @ Value::Object(_)) => Some(object),
            _ => None,
        };
        let (charged, drained) = match day {
            Some(day) => {
                let day = RawRecord::new(day);
                (day.count(&["charged"]), day.count(&["drained"]))
            }
            None => (0, 0),
        };
        Self {
            date: outer.date(DAY_ALIASES),
            charged,
            drained,
        }
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}
