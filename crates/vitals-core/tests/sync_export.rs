use std::cell::RefCell;
use std::fs;

use chrono::{Datelike, NaiveDate};
use serde_json::{json, Value};
use tempfile::TempDir;

use vitals_core::store::HealthStore;
use vitals_core::sync::{
    Dataset, DatasetOutcome, DatasetResult, DailySync, ExportObserver, ExportPlan, Exporter,
};
use vitals_core::{HealthClient, Request, Result, VitalsError};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 20).expect("valid date")
}

/// In-memory stand-in for the remote service.
#[derive(Default)]
struct FakeClient {
    activities: usize,
    fail_stress: bool,
    requests: RefCell<Vec<String>>,
}

impl HealthClient for FakeClient {
    fn fetch(&self, request: &Request) -> Result<Value> {
        self.requests.borrow_mut().push(request.operation().to_string());
        match request {
            Request::FullName => Ok(json!("Test User")),
            Request::Activities { start, limit } => {
                let end = (*start + *limit).min(self.activities);
                let page: Vec<Value> = (*start..end)
                    .map(|i| json!({"activityName": format!("Run {}", i)}))
                    .collect();
                Ok(Value::Array(page))
            }
            Request::WeighIns { .. } => Ok(json!({
                "dailyWeightSummaries": [{"summaryDate": "2025-05-19", "maxWeight": 80000}]
            })),
            Request::Stats(day) => Ok(json!({"totalSteps": day.day() * 100})),
            Request::Sleep(day) if day == &today() => Ok(json!({"dailySleepDTO": null})),
            Request::Sleep(_) => Ok(json!({"dailySleepDTO": {"sleepTimeSeconds": 25200}})),
            Request::BodyBattery(_) => Ok(json!([{"charged": 40, "drained": 35}])),
            Request::Stress(_) if self.fail_stress => {
                Err(VitalsError::Client("stress endpoint down".to_string()))
            }
            Request::Stress(_) => Ok(json!({"avgStressLevel": 30})),
            Request::Devices => Ok(json!([{"id": 1}, {"id": 2}])),
            _ => Ok(Value::Null),
        }
    }
}

#[derive(Default)]
struct Recorder {
    started: Vec<Dataset>,
    finished: Vec<DatasetOutcome>,
}

impl ExportObserver for Recorder {
    fn dataset_started(&mut self, dataset: Dataset, _total: Option<u64>) {
        self.started.push(dataset);
    }

    fn dataset_finished(&mut self, outcome: &DatasetOutcome) {
        self.finished.push(outcome.clone());
    }
}

fn plan(days: u32) -> ExportPlan {
    ExportPlan {
        page_size: 2,
        ..ExportPlan::default()
    }
    .with_history_days(days)
    .without_pauses()
}

#[test]
fn test_export_writes_every_dataset() {
    let dir = TempDir::new().expect("tempdir should succeed");
    let client = FakeClient {
        activities: 5,
        ..FakeClient::default()
    };
    let exporter = Exporter::new(&client, dir.path(), plan(3));
    let mut recorder = Recorder::default();

    let report = exporter.run(today(), &mut recorder);

    assert_eq!(report.outcomes.len(), Dataset::ALL.len());
    assert_eq!(report.failed().count(), 0);
    assert_eq!(recorder.started.len(), Dataset::ALL.len());
    assert_eq!(recorder.finished.len(), Dataset::ALL.len());
    for dataset in Dataset::ALL {
        assert!(dir.path().join(dataset.file_name()).exists(), "{:?}", dataset);
    }

    let activities = report
        .outcomes
        .iter()
        .find(|o| o.dataset == Dataset::Activities)
        .expect("activities outcome");
    assert_eq!(activities.result, DatasetResult::Saved { records: 5 });
    // Pages of 2, 2, 1.
    let pages = client
        .requests
        .borrow()
        .iter()
        .filter(|op| op.as_str() == "activities")
        .count();
    assert_eq!(pages, 3);
}

#[test]
fn test_exported_files_feed_the_store() {
    let dir = TempDir::new().expect("tempdir should succeed");
    let client = FakeClient::default();
    Exporter::new(&client, dir.path(), plan(3)).run(today(), &mut ());

    let store = HealthStore::new(dir.path()).with_today(today());
    let stats = store.stats().expect("stats should load");
    assert_eq!(stats.len(), 3);
    assert_eq!(stats[0].date.to_string(), "2025-05-18");
    assert_eq!(stats[2].total_steps, 2000);

    // Today's night has no sleep DTO and is dropped.
    assert_eq!(store.sleep().expect("sleep").len(), 2);

    let battery = store.body_battery().expect("body battery");
    assert_eq!(battery.len(), 3);
    assert_eq!(battery[0].net_change(), 5);

    let weight = store.weight().expect("weight");
    assert_eq!(weight.len(), 1);
    assert_eq!(weight[0].weight_kg, 80.0);
}

#[test]
fn test_failing_dataset_does_not_abort_export() {
    let dir = TempDir::new().expect("tempdir should succeed");
    let client = FakeClient {
        fail_stress: true,
        ..FakeClient::default()
    };

    let report = Exporter::new(&client, dir.path(), plan(30)).run(today(), &mut ());
    let failed: Vec<Dataset> = report.failed().map(|o| o.dataset).collect();
    assert_eq!(failed, vec![Dataset::Stress]);
    assert!(dir.path().join("hrv.json").exists());
    assert!(!dir.path().join("stress.json").exists());
}

#[test]
fn test_outage_in_short_window_keeps_existing_file() {
    let dir = TempDir::new().expect("tempdir should succeed");
    let existing = json!([
        {"_date": "2025-05-01", "avgStressLevel": 28},
        {"_date": "2025-05-02", "avgStressLevel": 35}
    ]);
    fs::write(dir.path().join("stress.json"), existing.to_string())
        .expect("write should succeed");
    let client = FakeClient {
        fail_stress: true,
        ..FakeClient::default()
    };

    let outcome =
        Exporter::new(&client, dir.path(), plan(7)).export_one(Dataset::Stress, today(), &mut ());

    match &outcome.result {
        DatasetResult::Failed { error } => assert!(error.contains("stress endpoint down")),
        other => panic!("expected a failed outcome, got {:?}", other),
    }
    let store = HealthStore::new(dir.path()).with_today(today());
    assert_eq!(store.stress().expect("stress should load").len(), 2);
}

#[test]
fn test_zero_day_window_is_not_written() {
    let dir = TempDir::new().expect("tempdir should succeed");
    let client = FakeClient::default();

    let outcome =
        Exporter::new(&client, dir.path(), plan(0)).export_one(Dataset::DailyStats, today(), &mut ());

    assert!(matches!(outcome.result, DatasetResult::Failed { .. }));
    assert!(!dir.path().join("daily_stats.json").exists());
}

#[test]
fn test_daily_sync_after_export() {
    let dir = TempDir::new().expect("tempdir should succeed");
    fs::write(
        dir.path().join("daily_stats.json"),
        json!([{"_date": "2025-05-20", "totalSteps": 100}]).to_string(),
    )
    .expect("write should succeed");

    let client = FakeClient::default();
    let sync = DailySync::new(&client, dir.path());
    let outcome = sync.run(today(), 500).expect("sync should succeed");
    assert_eq!(outcome.remote_steps, 2000);
    assert!(outcome.updated);
    assert!(outcome.changed);

    let again = sync.run(today(), 500).expect("sync should succeed");
    assert!(!again.updated);
    assert_eq!(client.full_name().expect("name"), "Test User");
}
