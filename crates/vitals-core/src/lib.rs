//! # Vitals Core
//!
//! Core library for Vitals - a personal health-data aggregator over a local
//! directory of exported wearable data.
//!
//! This crate owns the data directory: it normalizes the vendor's JSON files
//! into typed records, answers queries over them, and refreshes them from the
//! remote service. Presentation lives in the CLI crate.
//!
//! ## Architecture
//!
//! - **records**: Typed, defaulted views over raw per-day JSON objects
//! - **store**: Cache-backed queries and aggregates over the backing files
//! - **analysis**: Multi-record reports (sleep, patterns, weight trend)
//! - **client**: Boundary to the remote health service
//! - **sync**: Daily smart sync and full-history export
//! - **fs**: Atomic file writes shared by every writer

pub mod analysis;
pub mod client;
pub mod error;
pub mod fs;
pub mod metric;
pub mod records;
pub mod store;
pub mod sync;

pub use client::{HealthClient, Request};
pub use error::{Result, VitalsError};
pub use metric::Metric;
pub use records::{
    ActivityRecord, BodyBatteryRecord, Goals, Record, SleepRecord, StressRecord, WeightRecord,
    WorkoutSummary,
};
pub use store::HealthStore;

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
