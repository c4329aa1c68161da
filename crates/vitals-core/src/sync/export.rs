//! Full-history export of every dataset the service offers.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration as Pause;

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use serde_json::{json, Value};

use super::{is_empty_payload, tag_with_date};
use crate::client::{HealthClient, Request};
use crate::error::{Result, VitalsError};
use crate::fs::write_json_atomic;
use crate::metric::{Metric, ACTIVITIES_FILE};

/// Per-day requests fetched before a progress tick and a longer pause.
const BATCH_DAYS: u32 = 100;

/// A per-day dataset is abandoned when this many leading requests fail
/// without a single success.
const MAX_LEADING_FAILURES: u32 = 10;

/// Every file the exporter writes, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Activities,
    Weight,
    DailyStats,
    Sleep,
    HeartRate,
    Profile,
    PersonalRecords,
    BodyBattery,
    Stress,
    Hrv,
    TrainingStatus,
    TrainingReadiness,
    Respiration,
    Spo2,
    Devices,
    Badges,
}

impl Dataset {
    pub const ALL: [Dataset; 16] = [
        Dataset::Activities,
        Dataset::Weight,
        Dataset::DailyStats,
        Dataset::Sleep,
        Dataset::HeartRate,
        Dataset::Profile,
        Dataset::PersonalRecords,
        Dataset::BodyBattery,
        Dataset::Stress,
        Dataset::Hrv,
        Dataset::TrainingStatus,
        Dataset::TrainingReadiness,
        Dataset::Respiration,
        Dataset::Spo2,
        Dataset::Devices,
        Dataset::Badges,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Dataset::Activities => ACTIVITIES_FILE,
            Dataset::Weight => Metric::Weight.file_name(),
            Dataset::DailyStats => Metric::Activity.file_name(),
            Dataset::Sleep => Metric::Sleep.file_name(),
            Dataset::HeartRate => "heart_rate.json",
            Dataset::Profile => "profile.json",
            Dataset::PersonalRecords => "personal_records.json",
            Dataset::BodyBattery => Metric::BodyBattery.file_name(),
            Dataset::Stress => Metric::Stress.file_name(),
            Dataset::Hrv => "hrv.json",
            Dataset::TrainingStatus => "training_status.json",
            Dataset::TrainingReadiness => "training_readiness.json",
            Dataset::Respiration => "respiration.json",
            Dataset::Spo2 => "spo2.json",
            Dataset::Devices => "devices.json",
            Dataset::Badges => "badges.json",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dataset::Activities => "activities",
            Dataset::Weight => "weight",
            Dataset::DailyStats => "daily stats",
            Dataset::Sleep => "sleep",
            Dataset::HeartRate => "heart rate",
            Dataset::Profile => "profile",
            Dataset::PersonalRecords => "personal records",
            Dataset::BodyBattery => "body battery",
            Dataset::Stress => "stress",
            Dataset::Hrv => "HRV",
            Dataset::TrainingStatus => "training status",
            Dataset::TrainingReadiness => "training readiness",
            Dataset::Respiration => "respiration",
            Dataset::Spo2 => "SpO2",
            Dataset::Devices => "devices",
            Dataset::Badges => "badges",
        }
    }
}

/// How far back to go and how hard to hit the service.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPlan {
    /// Days covered by daily stats, sleep, body battery, stress and HRV.
    pub history_days: u32,
    pub weight_years: u32,
    pub heart_rate_days: u32,
    /// Days covered by respiration and SpO2.
    pub vitals_days: u32,
    pub page_size: usize,
    /// Pause after every per-day request.
    pub request_pause: Pause,
    /// Extra pause after every batch of per-day requests.
    pub batch_pause: Pause,
    /// Pause between activity pages.
    pub page_pause: Pause,
}

impl Default for ExportPlan {
    fn default() -> Self {
        Self {
            history_days: 2200,
            weight_years: 5,
            heart_rate_days: 30,
            vitals_days: 365,
            page_size: 100,
            request_pause: Pause::from_millis(50),
            batch_pause: Pause::from_secs(1),
            page_pause: Pause::from_millis(500),
        }
    }
}

impl ExportPlan {
    /// Limit every per-day dataset to the last `days` days.
    pub fn with_history_days(mut self, days: u32) -> Self {
        self.history_days = days;
        self.heart_rate_days = self.heart_rate_days.min(days);
        self.vitals_days = self.vitals_days.min(days);
        self
    }

    /// No pauses between requests.
    pub fn without_pauses(mut self) -> Self {
        self.request_pause = Pause::ZERO;
        self.batch_pause = Pause::ZERO;
        self.page_pause = Pause::ZERO;
        self
    }

    fn days_for(&self, dataset: Dataset) -> Option<u32> {
        match dataset {
            Dataset::DailyStats
            | Dataset::Sleep
            | Dataset::BodyBattery
            | Dataset::Stress
            | Dataset::Hrv => Some(self.history_days),
            Dataset::HeartRate => Some(self.heart_rate_days),
            Dataset::Respiration | Dataset::Spo2 => Some(self.vitals_days),
            _ => None,
        }
    }
}

/// Progress hooks for a running export. Every method defaults to a no-op.
pub trait ExportObserver {
    /// `total` is the number of per-day requests, when known up front.
    fn dataset_started(&mut self, _dataset: Dataset, _total: Option<u64>) {}

    fn progress(&mut self, _dataset: Dataset, _done: u64, _found: usize) {}

    fn dataset_finished(&mut self, _outcome: &DatasetOutcome) {}
}

impl ExportObserver for () {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOutcome {
    pub dataset: Dataset,
    pub path: PathBuf,
    /// Records saved, or the error that stopped this dataset.
    #[serde(flatten)]
    pub result: DatasetResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DatasetResult {
    Saved { records: usize },
    Failed { error: String },
}

impl DatasetOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self.result, DatasetResult::Saved { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReport {
    pub data_dir: PathBuf,
    pub outcomes: Vec<DatasetOutcome>,
}

impl ExportReport {
    pub fn failed(&self) -> impl Iterator<Item = &DatasetOutcome> {
        self.outcomes.iter().filter(|o| !o.is_saved())
    }

    pub fn saved_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }
}

/// Rebuilds every backing file from the remote history.
pub struct Exporter<C> {
    client: C,
    data_dir: PathBuf,
    plan: ExportPlan,
}

impl<C: HealthClient> Exporter<C> {
    pub fn new(client: C, data_dir: impl Into<PathBuf>, plan: ExportPlan) -> Self {
        Self {
            client,
            data_dir: data_dir.into(),
            plan,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Export every dataset. A failing dataset is recorded and skipped.
    pub fn run(&self, today: NaiveDate, observer: &mut dyn ExportObserver) -> ExportReport {
        let mut outcomes = Vec::with_capacity(Dataset::ALL.len());
        for dataset in Dataset::ALL {
            outcomes.push(self.export_one(dataset, today, observer));
        }
        ExportReport {
            data_dir: self.data_dir.clone(),
            outcomes,
        }
    }

    /// Export a single dataset and write its file.
    pub fn export_one(
        &self,
        dataset: Dataset,
        today: NaiveDate,
        observer: &mut dyn ExportObserver,
    ) -> DatasetOutcome {
        let total = self.plan.days_for(dataset).map(u64::from);
        observer.dataset_started(dataset, total);

        let path = self.data_dir.join(dataset.file_name());
        let result = match self
            .collect(dataset, today, observer)
            .and_then(|(value, records)| write_json_atomic(&path, &value).map(|_| records))
        {
            Ok(records) => {
                tracing::info!(dataset = dataset.label(), records, "dataset exported");
                DatasetResult::Saved { records }
            }
            Err(err) => {
                tracing::warn!(dataset = dataset.label(), error = %err, "dataset export failed");
                DatasetResult::Failed {
                    error: err.to_string(),
                }
            }
        };

        let outcome = DatasetOutcome {
            dataset,
            path,
            result,
        };
        observer.dataset_finished(&outcome);
        outcome
    }

    fn collect(
        &self,
        dataset: Dataset,
        today: NaiveDate,
        observer: &mut dyn ExportObserver,
    ) -> Result<(Value, usize)> {
        match dataset {
            Dataset::Activities => self.activities(dataset, observer),
            Dataset::Weight => {
                let start = today - Duration::days(365 * i64::from(self.plan.weight_years));
                let value = self.client.fetch(&Request::WeighIns { start, end: today })?;
                let count = value
                    .get("dailyWeightSummaries")
                    .and_then(Value::as_array)
                    .map_or(0, Vec::len);
                Ok((value, count))
            }
            Dataset::Profile => self.single(Request::UserSummary(today)),
            Dataset::PersonalRecords => self.single(Request::PersonalRecords),
            Dataset::TrainingStatus => self.single(Request::TrainingStatus(today)),
            Dataset::TrainingReadiness => self.single(Request::TrainingReadiness(today)),
            Dataset::Devices => self.single(Request::Devices),
            Dataset::Badges => self.single(Request::EarnedBadges),
            Dataset::DailyStats => self.per_day(dataset, today, observer, Request::Stats, tagged),
            Dataset::Sleep => self.per_day(dataset, today, observer, Request::Sleep, sleep_night),
            Dataset::HeartRate => {
                self.per_day(dataset, today, observer, Request::HeartRates, tagged)
            }
            Dataset::BodyBattery => {
                self.per_day(dataset, today, observer, Request::BodyBattery, wrapped)
            }
            Dataset::Stress => self.per_day(dataset, today, observer, Request::Stress, tagged),
            Dataset::Hrv => self.per_day(dataset, today, observer, Request::Hrv, tagged),
            Dataset::Respiration => {
                self.per_day(dataset, today, observer, Request::Respiration, tagged)
            }
            Dataset::Spo2 => self.per_day(dataset, today, observer, Request::Spo2, tagged),
        }
    }

    fn single(&self, request: Request) -> Result<(Value, usize)> {
        let value = self.client.fetch(&request)?;
        let count = match &value {
            Value::Array(items) => items.len(),
            other if is_empty_payload(other) => 0,
            _ => 1,
        };
        Ok((value, count))
    }

    fn activities(
        &self,
        dataset: Dataset,
        observer: &mut dyn ExportObserver,
    ) -> Result<(Value, usize)> {
        let page_size = self.plan.page_size.max(1);
        let mut all = Vec::new();
        let mut start = 0;
        loop {
            let batch = match self.client.fetch(&Request::Activities {
                start,
                limit: page_size,
            })? {
                Value::Array(items) => items,
                Value::Null => Vec::new(),
                other => {
                    return Err(VitalsError::Client(format!(
                        "unexpected activities page: {}",
                        other
                    )))
                }
            };
            let fetched = batch.len();
            all.extend(batch);
            observer.progress(dataset, all.len() as u64, all.len());
            if fetched < page_size {
                break;
            }
            start += page_size;
            pause(self.plan.page_pause);
        }
        let count = all.len();
        Ok((Value::Array(all), count))
    }

    /// Walk back day by day from `today`, keeping whatever `keep` accepts.
    ///
    /// Failed days are skipped, but a window where every day failed is an
    /// error. Results are written oldest first.
    fn per_day(
        &self,
        dataset: Dataset,
        today: NaiveDate,
        observer: &mut dyn ExportObserver,
        request: fn(NaiveDate) -> Request,
        keep: fn(Value, NaiveDate) -> Option<Value>,
    ) -> Result<(Value, usize)> {
        let days = self.plan.days_for(dataset).unwrap_or(0);
        let mut kept = Vec::new();
        let mut succeeded = false;
        let mut last_err = None;

        for days_back in 0..days {
            let day = today - Duration::days(i64::from(days_back));
            match self.client.fetch(&request(day)) {
                Ok(value) => {
                    succeeded = true;
                    if let Some(entry) = keep(value, day) {
                        kept.push(entry);
                    }
                }
                Err(err) if !succeeded && days_back + 1 >= MAX_LEADING_FAILURES => {
                    return Err(err);
                }
                Err(err) => {
                    tracing::debug!(dataset = dataset.label(), %day, error = %err, "skipping day");
                    last_err = Some(err);
                }
            }

            let done = days_back + 1;
            if done % BATCH_DAYS == 0 {
                observer.progress(dataset, u64::from(done), kept.len());
                pause(self.plan.batch_pause);
            }
            pause(self.plan.request_pause);
        }
        observer.progress(dataset, u64::from(days), kept.len());

        // Nothing answered: keep the existing file rather than writing `[]`.
        if !succeeded {
            return Err(last_err.unwrap_or_else(|| {
                VitalsError::InvalidInput(format!("no days requested for {}", dataset.label()))
            }));
        }

        kept.reverse();
        let count = kept.len();
        Ok((Value::Array(kept), count))
    }
}

fn pause(duration: Pause) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

fn tagged(value: Value, day: NaiveDate) -> Option<Value> {
    if is_empty_payload(&value) || !value.is_object() {
        return None;
    }
    Some(tag_with_date(value, day))
}

fn sleep_night(value: Value, day: NaiveDate) -> Option<Value> {
    match value.get("dailySleepDTO") {
        Some(dto) if !is_empty_payload(dto) => tagged(value, day),
        _ => None,
    }
}

fn wrapped(value: Value, day: NaiveDate) -> Option<Value> {
    if is_empty_payload(&value) {
        return None;
    }
    Some(json!({
        "_date": day.format("%Y-%m-%d").to_string(),
        "data": value,
    }))
}
