// Scripted client doubles: each request is handed to the test, which decides
// when and how it completes.
use crate::application::telemetry_client::{ClientError, CooldownClient, TelemetryClient};
use crate::domain::telemetry::{InstantReading, TelemetrySeries};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

pub struct Call<Req, T> {
    pub request: Req,
    responder: oneshot::Sender<Result<T, ClientError>>,
}

impl<Req, T> Call<Req, T> {
    /// Complete the request. Ignored if the caller has gone away.
    pub fn respond(self, result: Result<T, ClientError>) {
        let _ = self.responder.send(result);
    }
}

pub struct Script<Req, T> {
    tx: mpsc::UnboundedSender<Call<Req, T>>,
    calls: AtomicUsize,
}

impl<Req, T> Script<Req, T> {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Call<Req, T>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                calls: AtomicUsize::new(0),
            },
            rx,
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn call(&self, request: Req) -> Result<T, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let (responder, rx) = oneshot::channel();
        if self.tx.send(Call { request, responder }).is_err() {
            return Err(unavailable());
        }
        rx.await.unwrap_or_else(|_| Err(unavailable()))
    }
}

pub fn unavailable() -> ClientError {
    ClientError::Status {
        path: "/test".to_string(),
        status: 503,
    }
}

pub fn conflict() -> ClientError {
    ClientError::Conflict {
        path: "/api/cool-down/manual".to_string(),
    }
}

pub fn series(times: &[&str], solar_in: &[f64], house: &[f64], charger: &[f64]) -> TelemetrySeries {
    TelemetrySeries::new(
        times.iter().map(|t| t.to_string()).collect(),
        solar_in.to_vec(),
        house.to_vec(),
        charger.to_vec(),
    )
    .unwrap()
}

pub async fn next<Req, T>(rx: &mut mpsc::UnboundedReceiver<Call<Req, T>>) -> Call<Req, T> {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for a request")
        .expect("script dropped")
}

/// Poll `condition` until it holds or a generous deadline passes.
pub async fn eventually(condition: impl Fn() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("condition never held");
}

/// Let every ready task run for a while without asserting anything.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(30)).await;
}

pub async fn with_timeout<F: Future>(future: F) -> F::Output {
    tokio::time::timeout(Duration::from_secs(5), future)
        .await
        .expect("future did not complete")
}

pub struct ScriptedTelemetry {
    pub series: Script<NaiveDate, TelemetrySeries>,
    pub instant: Script<(), InstantReading>,
}

pub struct TelemetryCalls {
    pub series: mpsc::UnboundedReceiver<Call<NaiveDate, TelemetrySeries>>,
    pub instant: mpsc::UnboundedReceiver<Call<(), InstantReading>>,
}

impl ScriptedTelemetry {
    pub fn new() -> (Self, TelemetryCalls) {
        let (series, series_rx) = Script::new();
        let (instant, instant_rx) = Script::new();
        (
            Self { series, instant },
            TelemetryCalls {
                series: series_rx,
                instant: instant_rx,
            },
        )
    }
}

#[async_trait]
impl TelemetryClient for ScriptedTelemetry {
    async fn fetch_series(&self, date: NaiveDate) -> Result<TelemetrySeries, ClientError> {
        self.series.call(date).await
    }

    async fn fetch_instant(&self) -> Result<InstantReading, ClientError> {
        self.instant.call(()).await
    }
}

pub struct ScriptedCooldown {
    pub status: Script<(), bool>,
    pub create: Script<(), bool>,
    pub clear: Script<(), ()>,
}

pub struct CooldownCalls {
    pub status: mpsc::UnboundedReceiver<Call<(), bool>>,
    pub create: mpsc::UnboundedReceiver<Call<(), bool>>,
    pub clear: mpsc::UnboundedReceiver<Call<(), ()>>,
}

impl ScriptedCooldown {
    pub fn new() -> (Self, CooldownCalls) {
        let (status, status_rx) = Script::new();
        let (create, create_rx) = Script::new();
        let (clear, clear_rx) = Script::new();
        (
            Self {
                status,
                create,
                clear,
            },
            CooldownCalls {
                status: status_rx,
                create: create_rx,
                clear: clear_rx,
            },
        )
    }
}

#[async_trait]
impl CooldownClient for ScriptedCooldown {
    async fn is_active(&self) -> Result<bool, ClientError> {
        self.status.call(()).await
    }

    async fn create(&self) -> Result<bool, ClientError> {
        self.create.call(()).await
    }

    async fn clear(&self) -> Result<(), ClientError> {
        self.clear.call(()).await
    }
}
