//! Drivers that pull from a [`crate::client::HealthClient`] and write the
//! backing files.
//!
//! [`DailySync`] keeps today's entry of `daily_stats.json` fresh with a
//! single API call. [`Exporter`] rebuilds every backing file from the full
//! account history. Both write through [`crate::fs::write_json_atomic`], so
//! a concurrently running widget never sees a half-written file.

mod daily;
mod export;

pub use daily::{DailySync, SyncOutcome};
pub use export::{
    Dataset, DatasetOutcome, DatasetResult, ExportObserver, ExportPlan, ExportReport, Exporter,
};

use chrono::NaiveDate;
use serde_json::Value;

/// Tag a per-day payload with the day it was fetched for.
///
/// Non-object payloads are returned unchanged.
pub(crate) fn tag_with_date(mut value: Value, day: NaiveDate) -> Value {
    if let Value::Object(map) = &mut value {
        map.insert(
            "_date".to_string(),
            Value::String(day.format("%Y-%m-%d").to_string()),
        );
    }
    value
}

/// Whether the service returned nothing worth storing.
pub(crate) fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
