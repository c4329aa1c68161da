use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::Bucket;
use crate::records::{is_sentinel_date, ActivityRecord, StressRecord};

/// A single day picked out by step count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayExtreme {
    pub date: NaiveDate,
    pub steps: u32,
}

/// Day-of-week and month-of-year averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternReport {
    /// Average steps per weekday over days with steps, Monday first.
    pub weekday_steps: [Option<f64>; 7],
    /// Average stress per weekday over days with a stress reading.
    pub weekday_stress: [Option<f64>; 7],
    pub year: i32,
    /// Average steps per month of `year`, January first.
    pub monthly_steps: [Option<f64>; 12],
    pub best_day: Option<DayExtreme>,
    pub worst_day: Option<DayExtreme>,
}

impl PatternReport {
    pub fn build(stats: &[ActivityRecord], stress: &[StressRecord], year: i32) -> Self {
        let mut weekday_steps = [Bucket::default(); 7];
        let mut monthly_steps = [Bucket::default(); 12];
        let mut best: Option<&ActivityRecord> = None;
        let mut worst: Option<&ActivityRecord> = None;

        for day in stats
            .iter()
            .filter(|d| d.has_data() && !is_sentinel_date(d.date))
        {
            let steps = f64::from(day.total_steps);
            weekday_steps[weekday_index(day.date)].push(steps);
            if day.date.year() == year {
                monthly_steps[day.date.month0() as usize].push(steps);
            }
            if best.map_or(true, |b| day.total_steps > b.total_steps) {
                best = Some(day);
            }
            if worst.map_or(true, |w| day.total_steps < w.total_steps) {
                worst = Some(day);
            }
        }

        let mut weekday_stress = [Bucket::default(); 7];
        for day in stress
            .iter()
            .filter(|d| d.avg_level > 0 && !is_sentinel_date(d.date))
        {
            weekday_stress[weekday_index(day.date)].push(f64::from(day.avg_level));
        }

        Self {
            weekday_steps: weekday_steps.map(|b| b.average()),
            weekday_stress: weekday_stress.map(|b| b.average()),
            year,
            monthly_steps: monthly_steps.map(|b| b.average()),
            best_day: best.map(extreme),
            worst_day: worst.map(extreme),
        }
    }

    /// Largest weekday step average, used to scale bars.
    pub fn max_weekday_steps(&self) -> f64 {
        max_of(&self.weekday_steps)
    }

    pub fn max_monthly_steps(&self) -> f64 {
        max_of(&self.monthly_steps)
    }
}

/// Qualitative band for a 0-100 stress average.
pub fn stress_label(level: f64) -> &'static str {
    if level < 30.0 {
        "Low"
    } else if level < 50.0 {
        "Med"
    } else {
        "High"
    }
}

fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

fn extreme(day: &ActivityRecord) -> DayExtreme {
    DayExtreme {
        date: day.date,
        steps: day.total_steps,
    }
}

fn max_of(values: &[Option<f64>]) -> f64 {
    values.iter().flatten().copied().fold(0.0, f64::max)
}
