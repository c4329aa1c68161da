//! Backing-file diagnostics.

use serde::Serialize;

use super::{goals_in, read_json, records_in, HealthStore};
use crate::metric::{FileLayout, Metric, ACTIVITIES_FILE, GOALS_FILE};
use crate::records::{
    is_sentinel_date, ActivityRecord, BodyBatteryRecord, Record, SleepRecord, StressRecord,
    WeightRecord,
};

/// Result of inspecting one backing file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileCheck {
    pub file: &'static str,
    #[serde(flatten)]
    pub status: FileStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// File does not exist yet.
    Missing,
    /// File parsed; `undated` counts records that fell back to 1970-01-01.
    Ok { records: usize, undated: usize },
    /// File exists but cannot be read or parsed.
    Failed { error: String },
}

impl FileCheck {
    pub fn is_failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }
}

pub(super) fn check_all(store: &HealthStore) -> Vec<FileCheck> {
    vec![
        check_metric::<SleepRecord>(store),
        check_metric::<ActivityRecord>(store),
        check_metric::<WeightRecord>(store),
        check_metric::<StressRecord>(store),
        check_metric::<BodyBatteryRecord>(store),
        check_goals(store),
        check_workouts(store),
    ]
}

fn check_metric<R: Record>(store: &HealthStore) -> FileCheck {
    let metric: Metric = R::METRIC;
    let path = store.path_for(metric);
    let status = match read_json(&path) {
        Ok(None) => FileStatus::Missing,
        Ok(Some(root)) => match records_in(&path, root, metric.layout()) {
            Ok(items) => {
                let undated = items
                    .iter()
                    .map(R::from_raw)
                    .filter(|r| is_sentinel_date(r.date()))
                    .count();
                FileStatus::Ok {
                    records: items.len(),
                    undated,
                }
            }
            Err(err) => FileStatus::Failed {
                error: err.to_string(),
            },
        },
        Err(err) => FileStatus::Failed {
            error: err.to_string(),
        },
    };
    FileCheck {
        file: metric.file_name(),
        status,
    }
}

fn check_goals(store: &HealthStore) -> FileCheck {
    let path = store.data_dir().join(GOALS_FILE);
    let status = match read_json(&path).and_then(|root| match root {
        None => Ok(None),
        Some(root) => goals_in(&path, &root).map(|goals| Some(goals.map_or(0, |_| 1))),
    }) {
        Ok(None) => FileStatus::Missing,
        Ok(Some(records)) => FileStatus::Ok {
            records,
            undated: 0,
        },
        Err(err) => FileStatus::Failed {
            error: err.to_string(),
        },
    };
    FileCheck {
        file: GOALS_FILE,
        status,
    }
}

fn check_workouts(store: &HealthStore) -> FileCheck {
    let path = store.data_dir().join(ACTIVITIES_FILE);
    let status = match read_json(&path) {
        Ok(None) => FileStatus::Missing,
        Ok(Some(root)) => match records_in(&path, root, FileLayout::Flat) {
            Ok(items) => FileStatus::Ok {
                records: items.len(),
                undated: 0,
            },
            Err(err) => FileStatus::Failed {
                error: err.to_string(),
            },
        },
        Err(err) => FileStatus::Failed {
            error: err.to_string(),
        },
    };
    FileCheck {
        file: ACTIVITIES_FILE,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_check_reports_each_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("sleep.json"),
            json!([{"_date": "2025-01-01"}, {"dailySleepDTO": {}}]).to_string(),
        )
        .unwrap();
        std::fs::write(dir.path().join("stress.json"), "[{").unwrap();

        let store = HealthStore::new(dir.path());
        let checks = store.check();
        assert_eq!(checks.len(), 7);

        let sleep = checks.iter().find(|c| c.file == "sleep.json").unwrap();
        assert_eq!(
            sleep.status,
            FileStatus::Ok {
                records: 2,
                undated: 1
            }
        );

        let stress = checks.iter().find(|c| c.file == "stress.json").unwrap();
        assert!(stress.is_failed());

        let weight = checks.iter().find(|c| c.file == "weight.json").unwrap();
        assert_eq!(weight.status, FileStatus::Missing);
    }

    #[test]
    fn test_goals_check_agrees_with_goals_loader() {
        let dir = tempdir().unwrap();
        let goals_path = dir.path().join(GOALS_FILE);
        let goals_status = |store: &HealthStore| {
            store
                .check()
                .into_iter()
                .find(|c| c.file == GOALS_FILE)
                .unwrap()
                .status
        };

        std::fs::write(&goals_path, "[1, 2]").unwrap();
        let store = HealthStore::new(dir.path());
        assert!(matches!(goals_status(&store), FileStatus::Failed { .. }));
        assert!(store.goals().is_err());

        std::fs::write(&goals_path, "null").unwrap();
        let store = HealthStore::new(dir.path());
        assert_eq!(
            goals_status(&store),
            FileStatus::Ok {
                records: 0,
                undated: 0
            }
        );
        assert!(store.goals().is_ok());

        std::fs::write(&goals_path, json!({"daily_steps": 8000}).to_string()).unwrap();
        let store = HealthStore::new(dir.path());
        assert_eq!(
            goals_status(&store),
            FileStatus::Ok {
                records: 1,
                undated: 0
            }
        );
        assert_eq!(store.goals().unwrap().daily_steps, 8000);
    }
}
