//! Cache-backed query layer over the backing files.
//!
//! [`HealthStore`] is the single point of access to the JSON files written by
//! the sync and export drivers. Each metric is read at most once per cache
//! generation, normalized, sorted by date, and kept in memory.
//!
//! # Invalidation
//!
//! The store never watches the filesystem. Any code that rewrites a backing
//! file while a store is alive must call [`HealthStore::invalidate`] before
//! the next query, otherwise the cached pre-write data is returned.

use std::path::{Path, PathBuf};

use chrono::{Duration, Local, NaiveDate};
use serde_json::Value;

use crate::error::{Result, VitalsError};
use crate::metric::{FileLayout, Metric, ACTIVITIES_FILE, GOALS_FILE};
use crate::records::{
    ActivityRecord, BodyBatteryRecord, Goals, Record, SleepRecord, StressRecord, WeightRecord,
    WorkoutSummary,
};

mod cache;
mod check;

pub use cache::{RecordCache, Stored};
pub use check::{FileCheck, FileStatus};

/// Read-mostly access to one data directory.
#[derive(Debug)]
pub struct HealthStore {
    data_dir: PathBuf,
    today: Option<NaiveDate>,
    cache: RecordCache,
}

impl HealthStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            today: None,
            cache: RecordCache::default(),
        }
    }

    /// Pin "today" instead of reading the local clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// The reference day for relative queries.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn path_for(&self, metric: Metric) -> PathBuf {
        self.data_dir.join(metric.file_name())
    }

    /// Drop every cached collection so the next query re-reads disk.
    pub fn invalidate(&mut self) {
        tracing::debug!(
            loaded = self.cache.loaded(),
            data_dir = %self.data_dir.display(),
            "invalidating store cache"
        );
        self.cache = RecordCache::default();
    }

    // ---------------------------------------------------------------------
    // Loading
    // ---------------------------------------------------------------------

    /// All records of type `R`, sorted ascending by date.
    ///
    /// A missing backing file yields an empty slice. Repeated calls return
    /// the same cached slice until [`invalidate`](Self::invalidate).
    ///
    /// # Errors
    ///
    /// Returns [`VitalsError::Corrupt`] if the file is not valid JSON or has
    /// the wrong top-level shape, and [`VitalsError::Io`] if it cannot be read.
    pub fn load<R: Stored>(&self) -> Result<&[R]> {
        R::slot(&self.cache)
            .get_or_try_init(|| self.read_records::<R>())
            .map(Vec::as_slice)
    }

    pub fn sleep(&self) -> Result<&[SleepRecord]> {
        self.load()
    }

    pub fn stats(&self) -> Result<&[ActivityRecord]> {
        self.load()
    }

    pub fn weight(&self) -> Result<&[WeightRecord]> {
        self.load()
    }

    pub fn stress(&self) -> Result<&[StressRecord]> {
        self.load()
    }

    pub fn body_battery(&self) -> Result<&[BodyBatteryRecord]> {
        self.load()
    }

    /// Goals from `goals.json`, or the defaults when the file is absent.
    pub fn goals(&self) -> Result<&Goals> {
        self.cache.goals.get_or_try_init(|| {
            let path = self.data_dir.join(GOALS_FILE);
            match read_json(&path)? {
                None => Ok(Goals::default()),
                Some(root) => Ok(goals_in(&path, &root)?.unwrap_or_default()),
            }
        })
    }

    /// Workouts from `activities.json`, sorted by start date.
    pub fn workouts(&self) -> Result<&[WorkoutSummary]> {
        self.cache
            .workouts
            .get_or_try_init(|| {
                let path = self.data_dir.join(ACTIVITIES_FILE);
                let items = match read_json(&path)? {
                    None => return Ok(Vec::new()),
                    Some(root) => records_in(&path, root, FileLayout::Flat)?,
                };
                let mut workouts: Vec<WorkoutSummary> =
                    items.iter().map(WorkoutSummary::from_raw).collect();
                workouts.sort_by_key(|w| w.start_date);
                Ok(workouts)
            })
            .map(Vec::as_slice)
    }

    fn read_records<R: Record>(&self) -> Result<Vec<R>> {
        let path = self.path_for(R::METRIC);
        let Some(root) = read_json(&path)? else {
            tracing::debug!(metric = %R::METRIC, "no backing file; treating as empty");
            return Ok(Vec::new());
        };
        let items = records_in(&path, root, R::METRIC.layout())?;
        let mut records: Vec<R> = items.iter().map(R::from_raw).collect();
        // Producers write in arbitrary order; only this sort makes `latest` valid.
        records.sort_by_key(|r| r.date());
        tracing::debug!(metric = %R::METRIC, count = records.len(), "loaded records");
        Ok(records)
    }

    // ---------------------------------------------------------------------
    // Point and range queries
    // ---------------------------------------------------------------------

    /// Most recent record by date.
    pub fn latest<R: Stored>(&self) -> Result<Option<&R>> {
        Ok(self.load::<R>()?.last())
    }

    /// Records with `start <= date <= end`, in ascending order.
    ///
    /// A window with `start > end`, or one that holds no records, yields an
    /// empty slice.
    pub fn range<R: Stored>(&self, start: NaiveDate, end: NaiveDate) -> Result<&[R]> {
        let records = self.load::<R>()?;
        if start > end {
            return Ok(&[]);
        }
        let lo = records.partition_point(|r| r.date() < start);
        let hi = records.partition_point(|r| r.date() <= end);
        Ok(&records[lo..hi.max(lo)])
    }

    /// `range(today - n, today)`.
    pub fn last_n_days<R: Stored>(&self, n: u32) -> Result<&[R]> {
        let today = self.today();
        let start = today
            .checked_sub_signed(Duration::days(i64::from(n)))
            .unwrap_or(NaiveDate::MIN);
        self.range(start, today)
    }

    /// Most recent record matching `pred`, scanning backward.
    pub fn latest_where<R: Stored>(&self, pred: impl Fn(&R) -> bool) -> Result<Option<&R>> {
        Ok(self.load::<R>()?.iter().rev().find(|r| pred(*r)))
    }

    /// Today's activity entry, if the file has one.
    pub fn today_stats(&self) -> Result<Option<&ActivityRecord>> {
        let today = self.today();
        for entry in self.stats()?.iter().rev() {
            if entry.date == today {
                return Ok(Some(entry));
            }
            if entry.date < today {
                break;
            }
        }
        Ok(None)
    }

    /// Most recent day with a non-zero step count.
    ///
    /// Placeholder entries written before the device syncs carry zero steps
    /// and are skipped.
    pub fn latest_with_steps(&self) -> Result<Option<&ActivityRecord>> {
        self.latest_where(ActivityRecord::has_data)
    }

    /// Most recent night with recorded sleep.
    pub fn latest_with_sleep(&self) -> Result<Option<&SleepRecord>> {
        self.latest_where(SleepRecord::has_data)
    }

    /// Number of workouts that started on or after `since`.
    pub fn workouts_since(&self, since: NaiveDate) -> Result<usize> {
        Ok(self
            .workouts()?
            .iter()
            .filter(|w| w.start_date.is_some_and(|d| d >= since))
            .count())
    }

    // ---------------------------------------------------------------------
    // Aggregates
    // ---------------------------------------------------------------------

    /// Mean sleep duration in hours over the trailing window; 0.0 when empty.
    pub fn avg_sleep_hours(&self, days: u32) -> Result<f64> {
        let entries = self.last_n_days::<SleepRecord>(days)?;
        if entries.is_empty() {
            return Ok(0.0);
        }
        let total: f64 = entries.iter().map(SleepRecord::duration_hours).sum();
        Ok(total / entries.len() as f64)
    }

    /// Mean daily steps over the trailing window, truncated to an integer.
    ///
    /// `[8000, 12000, 5000]` averages to `8333`. An empty window yields 0.
    pub fn avg_steps(&self, days: u32) -> Result<u32> {
        let entries = self.last_n_days::<ActivityRecord>(days)?;
        if entries.is_empty() {
            return Ok(0);
        }
        let total: u64 = entries.iter().map(|e| u64::from(e.total_steps)).sum();
        Ok((total / entries.len() as u64) as u32)
    }

    /// Last minus first weight in the trailing window; 0.0 with fewer than two.
    pub fn weight_trend(&self, days: u32) -> Result<f64> {
        let entries = self.last_n_days::<WeightRecord>(days)?;
        match (entries.first(), entries.last()) {
            (Some(first), Some(last)) if entries.len() >= 2 => Ok(last.weight_kg - first.weight_kg),
            _ => Ok(0.0),
        }
    }

    /// Consecutive most-recent days with at least `goal` steps.
    ///
    /// `None` uses the daily step goal from `goals.json`.
    pub fn step_streak(&self, goal: Option<u32>) -> Result<u32> {
        let goal = match goal {
            Some(goal) => goal,
            None => self.goals()?.daily_steps,
        };
        Ok(streak(self.stats()?, |e| e.total_steps >= goal))
    }

    /// Consecutive most-recent nights with at least `hours` of sleep.
    pub fn sleep_streak(&self, hours: Option<f64>) -> Result<u32> {
        let hours = match hours {
            Some(hours) => hours,
            None => self.goals()?.sleep_hours,
        };
        Ok(streak(self.sleep()?, |e| e.duration_hours() >= hours))
    }

    /// Per-file diagnostics that bypass the cache.
    pub fn check(&self) -> Vec<FileCheck> {
        check::check_all(self)
    }
}

fn streak<R>(records: &[R], meets: impl Fn(&R) -> bool) -> u32 {
    records.iter().rev().take_while(|r| meets(*r)).count() as u32
}

/// Read and parse a JSON file; `Ok(None)` when it does not exist.
pub(crate) fn read_json(path: &Path) -> Result<Option<Value>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(VitalsError::io(path, err)),
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| VitalsError::corrupt(path, e.to_string()))
}

/// Goals from a parsed `goals.json`: an object, or `null` for none set.
pub(crate) fn goals_in(path: &Path, root: &Value) -> Result<Option<Goals>> {
    match root {
        Value::Null => Ok(None),
        Value::Object(_) => Ok(Some(Goals::from_raw(root))),
        _ => Err(VitalsError::corrupt(path, "expected a JSON object")),
    }
}

/// Pull the per-day array out of a parsed backing file.
pub(crate) fn records_in(path: &Path, root: Value, layout: FileLayout) -> Result<Vec<Value>> {
    match (layout, root) {
        (_, Value::Null) => Ok(Vec::new()),
        (_, Value::Array(items)) => Ok(items),
        (FileLayout::Nested(key), Value::Object(mut map)) => match map.remove(key) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(VitalsError::corrupt(
                path,
                format!("expected `{}` to be an array", key),
            )),
        },
        (FileLayout::Flat, _) => Err(VitalsError::corrupt(path, "expected a JSON array")),
        (FileLayout::Nested(key), _) => Err(VitalsError::corrupt(
            path,
            format!("expected an object with `{}`", key),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn write(dir: &Path, name: &str, value: Value) {
        std::fs::write(dir.join(name), serde_json::to_string(&value).unwrap()).unwrap();
    }

    fn stats_store(steps: &[u32]) -> (tempfile::TempDir, HealthStore) {
        let dir = tempdir().unwrap();
        let entries: Vec<Value> = steps
            .iter()
            .enumerate()
            .map(|(i, s)| json!({"_date": day(10 + i as u32).to_string(), "totalSteps": s}))
            .collect();
        write(dir.path(), "daily_stats.json", Value::Array(entries));
        let store = HealthStore::new(dir.path()).with_today(day(12));
        (dir, store)
    }

    #[test]
    fn test_missing_files_are_empty() {
        let dir = tempdir().unwrap();
        let store = HealthStore::new(dir.path());
        assert!(store.sleep().unwrap().is_empty());
        assert!(store.weight().unwrap().is_empty());
        assert!(store.latest::<StressRecord>().unwrap().is_none());
        assert_eq!(store.goals().unwrap(), &Goals::default());
        assert!(store.workouts().unwrap().is_empty());
    }

    #[test]
    fn test_weight_is_sorted_on_load() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "weight.json",
            json!({"dailyWeightSummaries": [
                {"summaryDate": "2025-01-03", "maxWeight": 84000},
                {"summaryDate": "2025-01-01", "maxWeight": 85000},
                {"summaryDate": "2025-01-02", "maxWeight": 84500}
            ]}),
        );
        let store = HealthStore::new(dir.path());
        let weights: Vec<(NaiveDate, f64)> = store
            .weight()
            .unwrap()
            .iter()
            .map(|w| (w.date, w.weight_kg))
            .collect();
        assert_eq!(
            weights,
            vec![(day(1), 85.0), (day(2), 84.5), (day(3), 84.0)]
        );
        assert_eq!(store.latest::<WeightRecord>().unwrap().unwrap().weight_kg, 84.0);
    }

    #[test]
    fn test_load_is_cached_until_invalidated() {
        let (dir, mut store) = stats_store(&[8000]);
        let first = store.stats().unwrap();
        let second = store.stats().unwrap();
        assert!(std::ptr::eq(first, second));

        write(
            dir.path(),
            "daily_stats.json",
            json!([{"_date": "2025-01-10", "totalSteps": 1}, {"_date": "2025-01-11", "totalSteps": 2}]),
        );
        assert_eq!(store.stats().unwrap().len(), 1);

        store.invalidate();
        assert_eq!(store.stats().unwrap().len(), 2);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("sleep.json"), "{not json").unwrap();
        let store = HealthStore::new(dir.path());
        let err = store.sleep().unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_wrong_shape_is_an_error() {
        let dir = tempdir().unwrap();
        write(dir.path(), "stress.json", json!({"avgStressLevel": 3}));
        write(dir.path(), "weight.json", json!({"dailyWeightSummaries": 5}));
        let store = HealthStore::new(dir.path());
        assert!(store.stress().unwrap_err().is_corrupt());
        assert!(store.weight().unwrap_err().is_corrupt());
    }

    #[test]
    fn test_null_weight_file_is_empty() {
        let dir = tempdir().unwrap();
        write(dir.path(), "weight.json", Value::Null);
        write(dir.path(), "body_battery.json", json!({"dailyWeightSummaries": null}));
        let store = HealthStore::new(dir.path());
        assert!(store.weight().unwrap().is_empty());
        assert!(store.body_battery().unwrap_err().is_corrupt());
    }

    #[test]
    fn test_range_is_inclusive_and_ordered() {
        let (_dir, store) = stats_store(&[1, 2, 3, 4]);
        let window = store.range::<ActivityRecord>(day(11), day(12)).unwrap();
        assert_eq!(
            window.iter().map(|e| e.total_steps).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn test_empty_and_reversed_ranges() {
        let (_dir, store) = stats_store(&[1, 2]);
        assert!(store
            .range::<ActivityRecord>(day(20), day(25))
            .unwrap()
            .is_empty());
        assert!(store
            .range::<ActivityRecord>(day(12), day(10))
            .unwrap()
            .is_empty());
        assert!(store
            .range::<BodyBatteryRecord>(day(1), day(31))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_avg_steps_truncates() {
        let (_dir, store) = stats_store(&[8000, 12000, 5000]);
        assert_eq!(store.avg_steps(7).unwrap(), 8333);
    }

    #[test]
    fn test_avg_steps_empty_history() {
        let dir = tempdir().unwrap();
        let store = HealthStore::new(dir.path()).with_today(day(12));
        assert_eq!(store.avg_steps(7).unwrap(), 0);
        assert_eq!(store.avg_sleep_hours(7).unwrap(), 0.0);
        assert_eq!(store.weight_trend(7).unwrap(), 0.0);
        assert_eq!(store.step_streak(Some(1)).unwrap(), 0);
    }

    #[test]
    fn test_step_streak() {
        let (_dir, store) = stats_store(&[8000, 12000, 5000]);
        assert_eq!(store.step_streak(Some(10_000)).unwrap(), 0);
        assert_eq!(store.step_streak(Some(4000)).unwrap(), 3);
        assert_eq!(store.step_streak(Some(5000)).unwrap(), 3);
        assert_eq!(store.step_streak(Some(6000)).unwrap(), 0);
    }

    #[test]
    fn test_step_streak_uses_goals_file() {
        let (dir, store) = stats_store(&[8000, 12000, 9000]);
        write(dir.path(), "goals.json", json!({"daily_steps": 8500}));
        assert_eq!(store.step_streak(None).unwrap(), 2);
    }

    #[test]
    fn test_weight_trend() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "weight.json",
            json!({"dailyWeightSummaries": [
                {"summaryDate": "2025-01-08", "maxWeight": 84000},
                {"summaryDate": "2025-01-01", "maxWeight": 85000}
            ]}),
        );
        let store = HealthStore::new(dir.path()).with_today(day(8));
        assert!((store.weight_trend(7).unwrap() - -1.0).abs() < 1e-9);
        assert_eq!(store.weight_trend(3).unwrap(), 0.0);
    }

    #[test]
    fn test_avg_sleep_hours() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "sleep.json",
            json!([
                {"_date": "2025-01-11", "dailySleepDTO": {"sleepTimeSeconds": 25200}},
                {"_date": "2025-01-12", "dailySleepDTO": {"sleepTimeSeconds": 28800}}
            ]),
        );
        let store = HealthStore::new(dir.path()).with_today(day(12));
        assert!((store.avg_sleep_hours(7).unwrap() - 7.5).abs() < 1e-9);
        assert_eq!(store.sleep_streak(Some(7.0)).unwrap(), 2);
        assert_eq!(store.sleep_streak(Some(7.5)).unwrap(), 1);
    }

    #[test]
    fn test_latest_with_data_skips_placeholders() {
        let (_dir, store) = stats_store(&[8000, 12000, 0]);
        let latest = store.latest_with_steps().unwrap().unwrap();
        assert_eq!(latest.total_steps, 12000);
        assert_eq!(latest.date, day(11));
        assert_eq!(store.latest::<ActivityRecord>().unwrap().unwrap().date, day(12));
    }

    #[test]
    fn test_latest_with_data_absent() {
        let (_dir, store) = stats_store(&[0, 0]);
        assert!(store.latest_with_steps().unwrap().is_none());
        assert!(store.latest_with_sleep().unwrap().is_none());
    }

    #[test]
    fn test_today_stats() {
        let (_dir, store) = stats_store(&[1, 2, 3]);
        assert_eq!(store.today_stats().unwrap().unwrap().total_steps, 3);
        let store = store.with_today(day(20));
        assert!(store.today_stats().unwrap().is_none());
    }

    #[test]
    fn test_workouts_since() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "activities.json",
            json!([
                {"startTimeLocal": "2025-01-12 07:00:00"},
                {"startTimeLocal": "2025-01-02 07:00:00"},
                {"startTimeLocal": "2025-01-05 07:00:00"},
                {"activityName": "no start"}
            ]),
        );
        let store = HealthStore::new(dir.path());
        assert_eq!(store.workouts_since(day(5)).unwrap(), 2);
        assert_eq!(store.workouts().unwrap().len(), 4);
    }

    #[test]
    fn test_goals_corrupt_shape() {
        let dir = tempdir().unwrap();
        write(dir.path(), "goals.json", json!([1, 2]));
        let store = HealthStore::new(dir.path());
        assert!(store.goals().unwrap_err().is_corrupt());
    }
}
