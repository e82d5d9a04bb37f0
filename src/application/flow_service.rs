// Instant flow reconciler - maps live readings onto the fixed flow markers
use crate::application::observable::Observable;
use crate::application::scheduler::{PollTarget, PollingScheduler};
use crate::application::telemetry_client::{ClientError, TelemetryClient};
use crate::domain::flow::{FlowLayout, FlowPoint};
use crate::domain::telemetry::InstantReading;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

struct FlowPoll {
    client: Arc<dyn TelemetryClient>,
    layout: FlowLayout,
    points: Observable<Vec<FlowPoint>>,
}

#[async_trait]
impl PollTarget for FlowPoll {
    type Key = ();
    type Output = InstantReading;

    fn key(&self) {}

    async fn fetch(&self, _key: &()) -> Result<InstantReading, ClientError> {
        self.client.fetch_instant().await
    }

    fn apply(&self, _key: &(), result: Result<InstantReading, ClientError>) {
        match result {
            Ok(reading) => self.points.set(self.layout.points(&reading)),
            Err(e) => tracing::warn!("keeping previous flow, reading failed: {}", e),
        }
    }
}

#[derive(Clone)]
pub struct FlowReconciler {
    poll: Arc<FlowPoll>,
    dead_band: f64,
    scheduler: Arc<PollingScheduler>,
}

impl FlowReconciler {
    pub fn start(
        client: Arc<dyn TelemetryClient>,
        layout: FlowLayout,
        dead_band: f64,
        period: Duration,
    ) -> Self {
        let poll = Arc::new(FlowPoll {
            client,
            points: Observable::new(layout.idle()),
            layout,
        });
        let scheduler = Arc::new(PollingScheduler::start("flow", period, poll.clone()));

        Self {
            poll,
            dead_band,
            scheduler,
        }
    }

    pub fn points(&self) -> Arc<Vec<FlowPoint>> {
        self.poll.points.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<FlowPoint>>> {
        self.poll.points.subscribe()
    }

    /// Magnitude under which a marker is drawn as idle.
    pub fn dead_band(&self) -> f64 {
        self.dead_band
    }

    pub fn stop(&self) {
        self.scheduler.stop();
    }
}
