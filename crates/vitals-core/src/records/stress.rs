use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::raw::RawRecord;
use super::{Record, DAY_ALIASES};
use crate::metric::Metric;

/// One day's stress levels on the vendor's 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressRecord {
    pub date: NaiveDate,
    pub avg_level: u32,
    pub max_level: u32,
}

impl Record for StressRecord {
    const METRIC: Metric = Metric::Stress;

    fn from_raw(raw: &Value) -> Self {
        let raw = RawRecord::new(raw);
        Self {
            date: raw.date(DAY_ALIASES),
            avg_level: raw.count(&["avgStressLevel", "overallStressLevel"]),
            max_level: raw.count(&["maxStressLevel"]),
        }
    }

    fn date(&self) -> NaiveDate {
        self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_levels() {
        let stress = StressRecord::from_raw(&json!({
            "_date": "2025-01-15",
            "avgStressLevel": 32,
            "maxStressLevel": 88
        }));
        assert_eq!(stress.avg_level, 32);
        assert_eq!(stress.max_level, 88);
    }

    #[test]
    fn test_overall_level_alias() {
        let stress = StressRecord::from_raw(&json!({"_date": "2025-01-15", "overallStressLevel": 41}));
        assert_eq!(stress.avg_level, 41);
    }

    #[test]
    fn test_no_data_marker_is_zero() {
        let stress = StressRecord::from_raw(&json!({"_date": "2025-01-15", "avgStressLevel": -1}));
        assert_eq!(stress.avg_level, 0);
        assert_eq!(stress.max_level, 0);
    }
}
