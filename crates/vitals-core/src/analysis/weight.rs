use chrono::NaiveDate;
use serde::Serialize;

use crate::records::{is_sentinel_date, WeightRecord};

/// Number of weigh-ins drawn in the recent-trend chart.
pub const RECENT_WEIGH_INS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightPoint {
    pub date: NaiveDate,
    pub kg: f64,
}

/// Long-run weight summary over every non-zero weigh-in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightTrendReport {
    pub measurements: usize,
    pub first: WeightPoint,
    pub current: WeightPoint,
    pub min_kg: f64,
    pub max_kg: f64,
    /// The newest weigh-ins, oldest first.
    pub recent: Vec<WeightPoint>,
}

impl WeightTrendReport {
    /// `None` when there is no usable weigh-in.
    pub fn build(weights: &[WeightRecord]) -> Option<Self> {
        let points: Vec<WeightPoint> = weights
            .iter()
            .filter(|w| w.has_data() && !is_sentinel_date(w.date))
            .map(|w| WeightPoint {
                date: w.date,
                kg: w.weight_kg,
            })
            .collect();

        let first = *points.first()?;
        let current = *points.last()?;
        let recent = points[points.len().saturating_sub(RECENT_WEIGH_INS)..].to_vec();

        Some(Self {
            measurements: points.len(),
            first,
            current,
            min_kg: points.iter().map(|p| p.kg).fold(f64::INFINITY, f64::min),
            max_kg: points.iter().map(|p| p.kg).fold(f64::NEG_INFINITY, f64::max),
            recent,
        })
    }

    pub fn change_kg(&self) -> f64 {
        self.current.kg - self.first.kg
    }

    pub fn recent_min(&self) -> f64 {
        self.recent.iter().map(|p| p.kg).fold(f64::INFINITY, f64::min)
    }

    pub fn recent_max(&self) -> f64 {
        self.recent
            .iter()
            .map(|p| p.kg)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Fill level of each recent weigh-in on a chart `height` rows tall.
    ///
    /// The lightest weigh-in sits at 0 and the heaviest at `height`. A flat
    /// series uses a range of 1 kg so every column sits at 0.
    pub fn levels(&self, height: usize) -> Vec<f64> {
        let min = self.recent_min();
        let spread = self.recent_max() - min;
        let range = if spread > 0.0 { spread } else { 1.0 };
        self.recent
            .iter()
            .map(|p| (p.kg - min) / range * height as f64)
            .collect()
    }
}
