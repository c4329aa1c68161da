//! Boundary to the remote health service.
//!
//! The `HealthClient` trait is the only way the sync drivers reach the
//! vendor API. Everything that talks to the network, authenticates, or caches
//! tokens lives behind it, which lets tests drive [`crate::sync`] with an
//! in-memory fake.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::Result;

mod process;

pub use process::{ClientCredentials, ProcessClient};

/// One vendor API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    FullName,
    Stats(NaiveDate),
    Sleep(NaiveDate),
    WeighIns { start: NaiveDate, end: NaiveDate },
    BodyComposition(NaiveDate),
    Activities { start: usize, limit: usize },
    HeartRates(NaiveDate),
    UserSummary(NaiveDate),
    PersonalRecords,
    BodyBattery(NaiveDate),
    Stress(NaiveDate),
    Hrv(NaiveDate),
    TrainingStatus(NaiveDate),
    TrainingReadiness(NaiveDate),
    Respiration(NaiveDate),
    Spo2(NaiveDate),
    Devices,
    EarnedBadges,
}

impl Request {
    /// Operation name understood by the client backend.
    pub fn operation(&self) -> &'static str {
        match self {
            Request::FullName => "full-name",
            Request::Stats(_) => "stats",
            Request::Sleep(_) => "sleep",
            Request::WeighIns { .. } => "weigh-ins",
            Request::BodyComposition(_) => "body-composition",
            Request::Activities { .. } => "activities",
            Request::HeartRates(_) => "heart-rates",
            Request::UserSummary(_) => "user-summary",
            Request::PersonalRecords => "personal-records",
            Request::BodyBattery(_) => "body-battery",
            Request::Stress(_) => "stress",
            Request::Hrv(_) => "hrv",
            Request::TrainingStatus(_) => "training-status",
            Request::TrainingReadiness(_) => "training-readiness",
            Request::Respiration(_) => "respiration",
            Request::Spo2(_) => "spo2",
            Request::Devices => "devices",
            Request::EarnedBadges => "earned-badges",
        }
    }

    /// Positional arguments; dates are ISO `YYYY-MM-DD`.
    pub fn args(&self) -> Vec<String> {
        match self {
            Request::FullName
            | Request::PersonalRecords
            | Request::Devices
            | Request::EarnedBadges => Vec::new(),
            Request::WeighIns { start, end } => vec![iso(*start), iso(*end)],
            Request::Activities { start, limit } => vec![start.to_string(), limit.to_string()],
            Request::Stats(day)
            | Request::Sleep(day)
            | Request::BodyComposition(day)
            | Request::HeartRates(day)
            | Request::UserSummary(day)
            | Request::BodyBattery(day)
            | Request::Stress(day)
            | Request::Hrv(day)
            | Request::TrainingStatus(day)
            | Request::TrainingReadiness(day)
            | Request::Respiration(day)
            | Request::Spo2(day) => vec![iso(*day)],
        }
    }
}

fn iso(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Authenticated access to the remote health service.
///
/// Implementations return the raw JSON payload for a request. An empty or
/// missing payload should come back as `Value::Null`, not as an error.
pub trait HealthClient {
    fn fetch(&self, request: &Request) -> Result<Value>;

    /// Display name of the connected account.
    fn full_name(&self) -> Result<String> {
        match self.fetch(&Request::FullName)? {
            Value::String(name) => Ok(name),
            Value::Null => Ok(String::from("Unknown")),
            other => Ok(other.to_string()),
        }
    }
}

impl<C: HealthClient + ?Sized> HealthClient for &C {
    fn fetch(&self, request: &Request) -> Result<Value> {
        (**self).fetch(request)
    }
}
