//! One handler per subcommand.

pub mod activities;
pub mod check;
pub mod config;
pub mod connection;
pub mod credentials;
pub mod export;
pub mod goals;
pub mod misc;
pub mod reports;
pub mod sleep;
pub mod summary;
pub mod sync;
pub mod today;
pub mod weight;
pub mod widget;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

/// Print a value as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let output = serde_json::to_string_pretty(value)?;
    println!("{}", output);
    Ok(())
}

/// Stamp a live payload with the day it was requested for, so it normalizes
/// like a stored entry.
pub(crate) fn with_day(mut value: Value, day: NaiveDate) -> Value {
    if let Value::Object(map) = &mut value {
        map.entry("_date")
            .or_insert_with(|| Value::String(day.format("%Y-%m-%d").to_string()));
    }
    value
}
