use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::{mean, Bucket};
use crate::records::{is_sentinel_date, ActivityRecord, SleepRecord};

const RECENT_NIGHTS: usize = 30;
const TREND_WINDOW: usize = 7;
const HIGH_ACTIVITY_STEPS: u32 = 10_000;
const LOW_ACTIVITY_STEPS: u32 = 5_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepOverview {
    pub nights: usize,
    /// Averages and extremes over nights with recorded sleep.
    pub avg_hours: Option<f64>,
    pub min_hours: Option<f64>,
    pub max_hours: Option<f64>,
    /// Average over scored nights only.
    pub avg_score: Option<f64>,
    pub avg_deep_pct: Option<f64>,
    pub avg_rem_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentSleepTrend {
    pub last_week_hours: f64,
    pub previous_week_hours: Option<f64>,
}

impl RecentSleepTrend {
    /// Change versus the previous week, in hours.
    pub fn change_hours(&self) -> Option<f64> {
        self.previous_week_hours
            .map(|previous| self.last_week_hours - previous)
    }
}

/// Sleep after active versus sedentary days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityCorrelation {
    pub high_activity_hours: f64,
    pub high_activity_nights: usize,
    pub low_activity_hours: f64,
    pub low_activity_nights: usize,
}

impl ActivityCorrelation {
    pub fn difference_minutes(&self) -> f64 {
        (self.high_activity_hours - self.low_activity_hours) * 60.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepReport {
    pub overview: Option<SleepOverview>,
    /// Average hours per weekday, Monday first.
    pub weekdays: [Option<f64>; 7],
    pub recent: Option<RecentSleepTrend>,
    pub correlation: Option<ActivityCorrelation>,
}

impl SleepReport {
    /// Build the report from chronologically sorted sleep and activity records.
    pub fn build(sleep: &[SleepRecord], stats: &[ActivityRecord]) -> Self {
        let nights: Vec<&SleepRecord> = sleep
            .iter()
            .filter(|night| !is_sentinel_date(night.date))
            .collect();

        Self {
            overview: overview(&nights),
            weekdays: weekdays(&nights),
            recent: recent(&nights),
            correlation: correlation(&nights, stats),
        }
    }
}

fn overview(nights: &[&SleepRecord]) -> Option<SleepOverview> {
    if nights.is_empty() {
        return None;
    }
    let with_sleep: Vec<&SleepRecord> = nights.iter().copied().filter(|n| n.has_data()).collect();
    let durations: Vec<f64> = with_sleep.iter().map(|n| n.duration_hours()).collect();
    let scores: Vec<f64> = nights
        .iter()
        .filter(|n| n.score > 0)
        .map(|n| f64::from(n.score))
        .collect();
    let deep: Vec<f64> = with_sleep.iter().map(|n| n.deep_pct()).collect();
    let rem: Vec<f64> = with_sleep.iter().map(|n| n.rem_pct()).collect();

    Some(SleepOverview {
        nights: nights.len(),
        avg_hours: mean(&durations),
        min_hours: durations.iter().copied().reduce(f64::min),
        max_hours: durations.iter().copied().reduce(f64::max),
        avg_score: mean(&scores),
        avg_deep_pct: mean(&deep),
        avg_rem_pct: mean(&rem),
    })
}

fn weekdays(nights: &[&SleepRecord]) -> [Option<f64>; 7] {
    let mut buckets = [Bucket::default(); 7];
    for night in nights.iter().filter(|n| n.has_data()) {
        let index = night.date.weekday().num_days_from_monday() as usize;
        buckets[index].push(night.duration_hours());
    }
    buckets.map(|bucket| bucket.average())
}

fn recent(nights: &[&SleepRecord]) -> Option<RecentSleepTrend> {
    let newest: Vec<f64> = nights
        .iter()
        .rev()
        .take(RECENT_NIGHTS)
        .map(|n| n.duration_hours())
        .collect();
    if newest.len() < TREND_WINDOW {
        return None;
    }
    let last_week_hours = mean(&newest[..TREND_WINDOW])?;
    let previous_week_hours = if newest.len() >= TREND_WINDOW * 2 {
        mean(&newest[TREND_WINDOW..TREND_WINDOW * 2])
    } else {
        None
    };
    Some(RecentSleepTrend {
        last_week_hours,
        previous_week_hours,
    })
}

fn correlation(nights: &[&SleepRecord], stats: &[ActivityRecord]) -> Option<ActivityCorrelation> {
    let steps_by_day: HashMap<NaiveDate, u32> =
        stats.iter().map(|s| (s.date, s.total_steps)).collect();

    let mut high = Vec::new();
    let mut low = Vec::new();
    for night in nights.iter().filter(|n| n.has_data()) {
        let Some(previous_day) = night.date.checked_sub_signed(Duration::days(1)) else {
            continue;
        };
        match steps_by_day.get(&previous_day) {
            Some(&steps) if steps > HIGH_ACTIVITY_STEPS => high.push(night.duration_hours()),
            Some(&steps) if steps < LOW_ACTIVITY_STEPS => low.push(night.duration_hours()),
            _ => {}
        }
    }

    Some(ActivityCorrelation {
        high_activity_hours: mean(&high)?,
        high_activity_nights: high.len(),
        low_activity_hours: mean(&low)?,
        low_activity_nights: low.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Record;
    use serde_json::json;

    fn night(date: &str, seconds: u32, score: u32) -> SleepRecord {
        SleepRecord::from_raw(&json!({
            "_date": date,
            "dailySleepDTO": {
                "sleepTimeSeconds": seconds,
                "deepSleepSeconds": seconds / 4,
                "remSleepSeconds": seconds / 5,
                "sleepScores": {"overall": {"value": score}}
            }
        }))
    }

    fn day_stats(date: &str, steps: u32) -> ActivityRecord {
        ActivityRecord::from_raw(&json!({"_date": date, "totalSteps": steps}))
    }

    #[test]
    fn test_empty_report() {
        let report = SleepReport::build(&[], &[]);
        assert!(report.overview.is_none());
        assert!(report.recent.is_none());
        assert!(report.correlation.is_none());
        assert!(report.weekdays.iter().all(Option::is_none));
    }

    #[test]
    fn test_overview_ignores_empty_nights_and_unscored() {
        let sleep = vec![
            night("2025-01-06", 7 * 3600, 80),
            night("2025-01-07", 0, 0),
            night("2025-01-08", 9 * 3600, 0),
        ];
        let overview = SleepReport::build(&sleep, &[]).overview.unwrap();
        assert_eq!(overview.nights, 3);
        assert_eq!(overview.avg_hours, Some(8.0));
        assert_eq!(overview.min_hours, Some(7.0));
        assert_eq!(overview.max_hours, Some(9.0));
        assert_eq!(overview.avg_score, Some(80.0));
        assert_eq!(overview.avg_deep_pct, Some(25.0));
        assert_eq!(overview.avg_rem_pct, Some(20.0));
    }

    #[test]
    fn test_weekday_buckets() {
        // 2025-01-06 is a Monday.
        let sleep = vec![
            night("2025-01-06", 6 * 3600, 0),
            night("2025-01-13", 8 * 3600, 0),
            night("2025-01-12", 9 * 3600, 0),
        ];
        let report = SleepReport::build(&sleep, &[]);
        assert_eq!(report.weekdays[0], Some(7.0));
        assert_eq!(report.weekdays[6], Some(9.0));
        assert_eq!(report.weekdays[2], None);
    }

    #[test]
    fn test_recent_trend_needs_a_week() {
        let sleep: Vec<SleepRecord> = (1..=6)
            .map(|d| night(&format!("2025-01-{:02}", d), 7 * 3600, 0))
            .collect();
        assert!(SleepReport::build(&sleep, &[]).recent.is_none());
    }

    #[test]
    fn test_recent_trend_compares_weeks() {
        let sleep: Vec<SleepRecord> = (1..=14)
            .map(|d| {
                let hours = if d > 7 { 8 } else { 6 };
                night(&format!("2025-01-{:02}", d), hours * 3600, 0)
            })
            .collect();
        let recent = SleepReport::build(&sleep, &[]).recent.unwrap();
        assert_eq!(recent.last_week_hours, 8.0);
        assert_eq!(recent.previous_week_hours, Some(6.0));
        assert_eq!(recent.change_hours(), Some(2.0));
    }

    #[test]
    fn test_activity_correlation_uses_previous_day() {
        let sleep = vec![
            night("2025-01-02", 8 * 3600, 0),
            night("2025-01-03", 6 * 3600, 0),
            night("2025-01-04", 5 * 3600, 0),
        ];
        let stats = vec![
            day_stats("2025-01-01", 12_000),
            day_stats("2025-01-02", 3_000),
            day_stats("2025-01-03", 7_000),
        ];
        let correlation = SleepReport::build(&sleep, &stats).correlation.unwrap();
        assert_eq!(correlation.high_activity_hours, 8.0);
        assert_eq!(correlation.high_activity_nights, 1);
        assert_eq!(correlation.low_activity_hours, 6.0);
        assert_eq!(correlation.difference_minutes(), 120.0);
    }

    #[test]
    fn test_correlation_requires_both_groups() {
        let sleep = vec![night("2025-01-02", 8 * 3600, 0)];
        let stats = vec![day_stats("2025-01-01", 12_000)];
        assert!(SleepReport::build(&sleep, &stats).correlation.is_none());
    }
}
