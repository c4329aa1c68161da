use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use super::tag_with_date;
use crate::client::{HealthClient, Request};
use crate::error::{Result, VitalsError};
use crate::fs::write_json_atomic;
use crate::metric::Metric;
use crate::records::{parse_day, RawRecord, DAY_ALIASES};
use crate::store::{read_json, records_in};

const STEPS: &[&str] = &["totalSteps"];

/// What one sync pass saw and did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    pub local_steps: u32,
    pub remote_steps: u32,
    /// The remote entry was written to disk.
    pub updated: bool,
    /// The write added a new day or changed the step count.
    pub changed: bool,
}

impl SyncOutcome {
    pub fn difference(&self) -> u32 {
        self.local_steps.abs_diff(self.remote_steps)
    }
}

/// Single-call refresh of today's activity entry.
pub struct DailySync<C> {
    client: C,
    data_dir: PathBuf,
}

impl<C: HealthClient> DailySync<C> {
    pub fn new(client: C, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            data_dir: data_dir.into(),
        }
    }

    fn stats_path(&self) -> PathBuf {
        self.data_dir.join(Metric::Activity.file_name())
    }

    /// Fetch today's stats from the service, tagged with `_date`.
    pub fn fetch_today_stats(&self, today: NaiveDate) -> Result<Value> {
        let payload = match self.client.fetch(&Request::Stats(today))? {
            Value::Null => Value::Object(Map::new()),
            value @ Value::Object(_) => value,
            other => {
                return Err(VitalsError::Client(format!(
                    "unexpected stats payload: {}",
                    other
                )))
            }
        };
        Ok(tag_with_date(payload, today))
    }

    /// Today's raw entry from `daily_stats.json`, searching from the newest.
    pub fn local_today_stats(&self, today: NaiveDate) -> Result<Option<Value>> {
        let entries = load_entries(&self.stats_path())?;
        Ok(entries.into_iter().rev().find(|e| is_for_day(e, today)))
    }

    /// Replace today's entry or append it, then write the file atomically.
    ///
    /// Returns whether the day is new or its step count changed.
    pub fn update_daily_stats(&self, entry: Value, today: NaiveDate) -> Result<bool> {
        let path = self.stats_path();
        let mut entries = load_entries(&path)?;
        let new_steps = steps_of(&entry);

        let previous_steps = match entries.iter().position(|e| is_for_day(e, today)) {
            Some(index) => {
                let old = steps_of(&entries[index]);
                entries[index] = entry;
                Some(old)
            }
            None => {
                entries.push(entry);
                None
            }
        };

        write_json_atomic(&path, &entries)?;
        tracing::debug!(
            path = %path.display(),
            entries = entries.len(),
            "wrote daily stats"
        );

        Ok(previous_steps.map_or(true, |old| old != new_steps))
    }

    /// One smart-sync pass: compare local and remote steps and write only
    /// when they differ by more than `threshold`.
    pub fn run(&self, today: NaiveDate, threshold: u32) -> Result<SyncOutcome> {
        let local_steps = self
            .local_today_stats(today)?
            .map_or(0, |entry| steps_of(&entry));
        let remote = self.fetch_today_stats(today)?;
        let remote_steps = steps_of(&remote);

        let mut outcome = SyncOutcome {
            local_steps,
            remote_steps,
            updated: false,
            changed: false,
        };

        if outcome.difference() > threshold {
            outcome.changed = self.update_daily_stats(remote, today)?;
            outcome.updated = true;
            tracing::info!(
                local = local_steps,
                remote = remote_steps,
                changed = outcome.changed,
                "steps updated"
            );
        } else {
            tracing::debug!(local = local_steps, remote = remote_steps, "no significant change");
        }

        Ok(outcome)
    }
}

fn load_entries(path: &Path) -> Result<Vec<Value>> {
    match read_json(path)? {
        Some(root) => records_in(path, root, Metric::Activity.layout()),
        None => Ok(Vec::new()),
    }
}

fn is_for_day(entry: &Value, day: NaiveDate) -> bool {
    let raw = RawRecord::new(entry);
    DAY_ALIASES
        .iter()
        .find_map(|alias| raw.text(&[*alias]).and_then(parse_day))
        == Some(day)
}

fn steps_of(entry: &Value) -> u32 {
    RawRecord::new(entry).count(STEPS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;
    use tempfile::tempdir;

    struct FixedSteps {
        steps: u32,
        calls: Cell<usize>,
    }

    impl FixedSteps {
        fn new(steps: u32) -> Self {
            Self {
                steps,
                calls: Cell::new(0),
            }
        }
    }

    impl HealthClient for FixedSteps {
        fn fetch(&self, request: &Request) -> Result<Value> {
            self.calls.set(self.calls.get() + 1);
            match request {
                Request::Stats(_) => Ok(json!({"totalSteps": self.steps})),
                _ => Ok(Value::Null),
            }
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    #[test]
    fn test_fetch_adds_date() {
        let dir = tempdir().unwrap();
        let sync = DailySync::new(FixedSteps::new(42), dir.path());
        let stats = sync.fetch_today_stats(today()).unwrap();
        assert_eq!(stats["_date"], "2025-06-01");
        assert_eq!(stats["totalSteps"], 42);
    }

    #[test]
    fn test_update_appends_then_replaces() {
        let dir = tempdir().unwrap();
        let sync = DailySync::new(FixedSteps::new(0), dir.path());
        let day = today();

        assert!(sync
            .update_daily_stats(json!({"_date": "2025-06-01", "totalSteps": 100}), day)
            .unwrap());
        assert!(!sync
            .update_daily_stats(json!({"_date": "2025-06-01", "totalSteps": 100}), day)
            .unwrap());
        assert!(sync
            .update_daily_stats(json!({"_date": "2025-06-01", "totalSteps": 250}), day)
            .unwrap());

        let written: Vec<Value> =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("daily_stats.json")).unwrap())
                .unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0]["totalSteps"], 250);
    }

    #[test]
    fn test_local_today_stats() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("daily_stats.json"),
            json!([
                {"_date": "2025-05-31", "totalSteps": 9000},
                {"calendarDate": "2025-06-01", "totalSteps": 1200}
            ])
            .to_string(),
        )
        .unwrap();
        let sync = DailySync::new(FixedSteps::new(0), dir.path());
        let entry = sync.local_today_stats(today()).unwrap().unwrap();
        assert_eq!(entry["totalSteps"], 1200);
        assert!(sync
            .local_today_stats(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_run_respects_threshold() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("daily_stats.json"),
            json!([{"_date": "2025-06-01", "totalSteps": 1000}]).to_string(),
        )
        .unwrap();

        let small = DailySync::new(FixedSteps::new(1050), dir.path());
        let outcome = small.run(today(), 100).unwrap();
        assert_eq!(outcome.difference(), 50);
        assert!(!outcome.updated);

        let large = DailySync::new(FixedSteps::new(1500), dir.path());
        let outcome = large.run(today(), 100).unwrap();
        assert!(outcome.updated);
        assert!(outcome.changed);
        assert_eq!(outcome.local_steps, 1000);
        assert_eq!(outcome.remote_steps, 1500);
    }

    #[test]
    fn test_run_on_corrupt_file_fails_without_fetching() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("daily_stats.json"), "{oops").unwrap();
        let client = FixedSteps::new(10);
        let sync = DailySync::new(&client, dir.path());
        assert!(sync.run(today(), 0).unwrap_err().is_corrupt());
        assert_eq!(client.calls.get(), 0);
    }
}
