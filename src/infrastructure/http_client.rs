// HTTP client for the solnax backend API
use crate::application::telemetry_client::{ClientError, CooldownClient, TelemetryClient};
use crate::domain::telemetry::{InstantReading, TelemetrySeries};
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const POWER_PATH: &str = "/api/power";
const CURRENT_POWER_PATH: &str = "/api/power/current";
const COOLDOWN_PATH: &str = "/api/cool-down/manual";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PowerLogsResponse {
    times: Vec<String>,
    solar_in: Vec<f64>,
    house: Vec<f64>,
    charger: Vec<f64>,
}

// The backend serializes missing meter values as null
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstantPowerResponse {
    solar: Option<f64>,
    heat: Option<f64>,
    ev_charger: Option<f64>,
    house: Option<f64>,
}

impl From<InstantPowerResponse> for InstantReading {
    fn from(response: InstantPowerResponse) -> Self {
        Self {
            solar: response.solar.unwrap_or_default(),
            heat: response.heat.unwrap_or_default(),
            ev_charger: response.ev_charger.unwrap_or_default(),
            house: response.house.unwrap_or_default(),
        }
    }
}

/// One long-lived client shared by every controller.
#[derive(Debug, Clone)]
pub struct SolnaxApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl SolnaxApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn series_path(date: NaiveDate) -> String {
        let on_date = date.format("%Y-%m-%d").to_string();
        format!("{}?onDate={}", POWER_PATH, urlencoding::encode(&on_date))
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Response, ClientError> {
        tracing::trace!(path, "request");
        request.send().await.map_err(|e| ClientError::Transport {
            path: path.to_string(),
            source: Box::new(e),
        })
    }

    fn check(path: &str, response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ClientError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Malformed {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl TelemetryClient for SolnaxApiClient {
    async fn fetch_series(&self, date: NaiveDate) -> Result<TelemetrySeries, ClientError> {
        let path = Self::series_path(date);
        let response = self.send(&path, self.http.get(self.url(&path))).await?;
        let body: PowerLogsResponse = Self::decode(&path, Self::check(&path, response)?).await?;

        TelemetrySeries::new(body.times, body.solar_in, body.house, body.charger).map_err(|e| {
            ClientError::Malformed {
                path: path.clone(),
                reason: e.to_string(),
            }
        })
    }

    async fn fetch_instant(&self) -> Result<InstantReading, ClientError> {
        let path = CURRENT_POWER_PATH;
        let response = self.send(path, self.http.get(self.url(path))).await?;
        let body: InstantPowerResponse = Self::decode(path, Self::check(path, response)?).await?;
        Ok(body.into())
    }
}

#[async_trait]
impl CooldownClient for SolnaxApiClient {
    async fn is_active(&self) -> Result<bool, ClientError> {
        let path = COOLDOWN_PATH;
        let response = self.send(path, self.http.get(self.url(path))).await?;
        Self::decode(path, Self::check(path, response)?).await
    }

    async fn create(&self) -> Result<bool, ClientError> {
        let path = COOLDOWN_PATH;
        let request = self.http.post(self.url(path)).json(&serde_json::json!({}));
        let response = self.send(path, request).await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(ClientError::Conflict {
                path: path.to_string(),
            });
        }
        Self::decode(path, Self::check(path, response)?).await
    }

    async fn clear(&self) -> Result<(), ClientError> {
        let path = COOLDOWN_PATH;
        let response = self.send(path, self.http.delete(self.url(path))).await?;
        Self::check(path, response)?;
        Ok(())
    }
}
