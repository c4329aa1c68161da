//! Per-metric cache slots.

use once_cell::unsync::OnceCell;

use crate::records::{
    ActivityRecord, BodyBatteryRecord, Goals, Record, SleepRecord, StressRecord, WeightRecord,
    WorkoutSummary,
};

/// Lazily filled, sorted collections for one store instance.
///
/// A slot is filled on first access and stays filled until the owning store
/// is invalidated.
#[derive(Debug, Default)]
pub struct RecordCache {
    sleep: OnceCell<Vec<SleepRecord>>,
    stats: OnceCell<Vec<ActivityRecord>>,
    weight: OnceCell<Vec<WeightRecord>>,
    stress: OnceCell<Vec<StressRecord>>,
    body_battery: OnceCell<Vec<BodyBatteryRecord>>,
    pub(super) goals: OnceCell<Goals>,
    pub(super) workouts: OnceCell<Vec<WorkoutSummary>>,
}

impl RecordCache {
    /// Number of filled slots, for diagnostics.
    pub fn loaded(&self) -> usize {
        [
            self.sleep.get().is_some(),
            self.stats.get().is_some(),
            self.weight.get().is_some(),
            self.stress.get().is_some(),
            self.body_battery.get().is_some(),
            self.goals.get().is_some(),
            self.workouts.get().is_some(),
        ]
        .iter()
        .filter(|loaded| **loaded)
        .count()
    }
}

/// A record type the store can cache.
pub trait Stored: Record {
    fn slot(cache: &RecordCache) -> &OnceCell<Vec<Self>>;
}

impl Stored for SleepRecord {
    fn slot(cache: &RecordCache) -> &OnceCell<Vec<Self>> {
        &cache.sleep
    }
}

impl Stored for ActivityRecord {
    fn slot(cache: &RecordCache) -> &OnceCell<Vec<Self>> {
        &cache.stats
    }
}

impl Stored for WeightRecord {
    fn slot(cache: &RecordCache) -> &OnceCell<Vec<Self>> {
        &cache.weight
    }
}

impl Stored for StressRecord {
    fn slot(cache: &RecordCache) -> &OnceCell<Vec<Self>> {
        &cache.stress
    }
}

impl Stored for BodyBatteryRecord {
    fn slot(cache: &RecordCache) -> &OnceCell<Vec<Self>> {
        &cache.body_battery
    }
}
