//! Lenient field access over raw vendor JSON.
//!
//! Every record type is built through [`RawRecord`], which encodes the single
//! default policy: a key that is missing, `null`, of the wrong type, or below
//! a `null`/non-object parent is absent. Counters turn absent into `0`;
//! optional-meaningful fields keep it as `None`.

use chrono::NaiveDate;
use serde_json::Value;

/// Date used when no alias yields a parseable `YYYY-MM-DD` value.
///
/// This is 1970-01-01; callers can detect it with [`is_sentinel_date`].
pub fn sentinel_date() -> NaiveDate {
    NaiveDate::default()
}

/// Whether `date` is the parse-failure sentinel.
pub fn is_sentinel_date(date: NaiveDate) -> bool {
    date == sentinel_date()
}

/// Parse a calendar date from the first ten characters of `text`.
///
/// Accepts both plain dates and timestamps such as `2025-01-03 07:12:00`.
pub fn parse_day(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let head = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Borrowed view over one raw JSON object.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    value: &'a Value,
}

impl<'a> RawRecord<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value }
    }

    /// Resolve a dotted path such as `dailySleepDTO.sleepScores.overall.value`.
    pub fn get(&self, path: &str) -> Option<&'a Value> {
        let mut current = self.value;
        for key in path.split('.') {
            current = current.as_object()?.get(key)?;
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    fn first<T>(&self, aliases: &[&str], convert: impl Fn(&'a Value) -> Option<T>) -> Option<T> {
        aliases
            .iter()
            .find_map(|alias| self.get(alias).and_then(&convert))
    }

    /// Non-negative integer counter; absent resolves to `0`.
    pub fn count(&self, aliases: &[&str]) -> u32 {
        self.optional_u32(aliases).unwrap_or(0)
    }

    /// Non-negative integer kept as `None` when absent.
    ///
    /// Negative sentinels some endpoints emit (`-1`, `-2`) are absent too.
    pub fn optional_u32(&self, aliases: &[&str]) -> Option<u32> {
        self.first(aliases, as_u32)
    }

    /// Floating-point value; absent resolves to `0.0`.
    pub fn number(&self, aliases: &[&str]) -> f64 {
        self.optional_number(aliases).unwrap_or(0.0)
    }

    pub fn optional_number(&self, aliases: &[&str]) -> Option<f64> {
        self.first(aliases, as_f64)
    }

    /// First alias holding a non-zero number.
    ///
    /// Used for fields where the vendor writes `0` to mean "not measured".
    pub fn nonzero_number(&self, aliases: &[&str]) -> Option<f64> {
        self.first(aliases, |v| as_f64(v).filter(|n| *n != 0.0))
    }

    pub fn text(&self, aliases: &[&str]) -> Option<&'a str> {
        self.first(aliases, |v| v.as_str().filter(|s| !s.trim().is_empty()))
    }

    /// First alias that parses as a calendar date, else the sentinel.
    pub fn date(&self, aliases: &[&str]) -> NaiveDate {
        match self.first(aliases, |v| v.as_str().and_then(parse_day)) {
            Some(date) => date,
            None => {
                tracing::warn!(
                    aliases = ?aliases,
                    "record has no parseable date; using {}",
                    sentinel_date()
                );
                sentinel_date()
            }
        }
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

fn as_u32(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return Some(n.min(u64::from(u32::MAX)) as u32);
    }
    match value.as_f64() {
        Some(n) if n.is_finite() && n >= 0.0 => Some(n.min(f64::from(u32::MAX)) as u32),
        _ => None,
    }
}
