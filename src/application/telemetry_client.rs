// Client traits for the backend telemetry and cooldown APIs
use crate::domain::telemetry::{InstantReading, TelemetrySeries};
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{path} responded with status {status}")]
    Status { path: String, status: u16 },

    /// The resource already exists (HTTP 409).
    #[error("{path} reported a conflict")]
    Conflict { path: String },

    #[error("malformed response from {path}: {reason}")]
    Malformed { path: String, reason: String },
}

impl ClientError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Conflict { .. })
    }
}

#[async_trait]
pub trait TelemetryClient: Send + Sync {
    /// Historical samples for one calendar day
    async fn fetch_series(&self, date: NaiveDate) -> Result<TelemetrySeries, ClientError>;

    /// Current instantaneous reading
    async fn fetch_instant(&self) -> Result<InstantReading, ClientError>;
}

#[async_trait]
pub trait CooldownClient: Send + Sync {
    async fn is_active(&self) -> Result<bool, ClientError>;

    /// Activate the manual cooldown. Fails with `ClientError::Conflict` when
    /// one is already active.
    async fn create(&self) -> Result<bool, ClientError>;

    async fn clear(&self) -> Result<(), ClientError>;
}
