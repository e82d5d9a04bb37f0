// Polling scheduler - periodic and on-demand fetches with latest-wins ordering
use crate::application::request_gate::{LatestGate, Ticket};
use crate::application::telemetry_client::ClientError;
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Something the scheduler can poll.
#[async_trait]
pub trait PollTarget: Send + Sync + 'static {
    /// Identity captured when a tick is issued and handed back with its result.
    type Key: Clone + Debug + Send + Sync + 'static;
    type Output: Send + 'static;

    fn key(&self) -> Self::Key;

    async fn fetch(&self, key: &Self::Key) -> Result<Self::Output, ClientError>;

    /// Called only for the most recently issued tick, never after `stop`.
    fn apply(&self, key: &Self::Key, result: Result<Self::Output, ClientError>);
}

#[derive(Default)]
struct Tasks {
    ticker: Option<JoinHandle<()>>,
    in_flight: Option<JoinHandle<()>>,
}

fn lock(tasks: &Mutex<Tasks>) -> MutexGuard<'_, Tasks> {
    tasks.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drives one fetch per tick: immediately on start, then every `period`, and
/// whenever `refresh` is called. Stops on `stop` or when dropped.
pub struct PollingScheduler {
    name: &'static str,
    gate: Arc<LatestGate>,
    wake: Arc<Notify>,
    tasks: Arc<Mutex<Tasks>>,
}

impl PollingScheduler {
    pub fn start<P: PollTarget>(name: &'static str, period: Duration, target: Arc<P>) -> Self {
        let gate = Arc::new(LatestGate::new());
        let wake = Arc::new(Notify::new());
        let tasks = Arc::new(Mutex::new(Tasks::default()));

        let ticker = tokio::spawn(run_ticks(
            name,
            period,
            target,
            gate.clone(),
            wake.clone(),
            tasks.clone(),
        ));
        lock(&tasks).ticker = Some(ticker);

        tracing::debug!(scheduler = name, ?period, "polling started");

        Self {
            name,
            gate,
            wake,
            tasks,
        }
    }

    /// Tick now. Whatever is still in flight is superseded immediately.
    pub fn refresh(&self) {
        if self.gate.is_closed() {
            return;
        }
        self.gate.invalidate();
        self.wake.notify_one();
    }

    pub fn stop(&self) {
        if self.gate.is_closed() {
            return;
        }
        self.gate.close();

        let mut tasks = lock(&self.tasks);
        if let Some(ticker) = tasks.ticker.take() {
            ticker.abort();
        }
        if let Some(in_flight) = tasks.in_flight.take() {
            in_flight.abort();
        }
        tracing::debug!(scheduler = self.name, "polling stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.gate.is_closed()
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_ticks<P: PollTarget>(
    name: &'static str,
    period: Duration,
    target: Arc<P>,
    gate: Arc<LatestGate>,
    wake: Arc<Notify>,
    tasks: Arc<Mutex<Tasks>>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = wake.notified() => {
                tracing::debug!(scheduler = name, "manual refresh");
            }
        }

        let Some(ticket) = gate.issue() else {
            break;
        };
        let key = target.key();
        tracing::debug!(scheduler = name, ?key, "tick");

        let fetch = tokio::spawn(fetch_and_apply(
            name,
            target.clone(),
            gate.clone(),
            ticket,
            key,
        ));

        let superseded = {
            let mut tasks = lock(&tasks);
            if gate.is_closed() {
                fetch.abort();
                None
            } else {
                tasks.in_flight.replace(fetch)
            }
        };
        if let Some(superseded) = superseded {
            superseded.abort();
        }
    }
}

async fn fetch_and_apply<P: PollTarget>(
    name: &'static str,
    target: Arc<P>,
    gate: Arc<LatestGate>,
    ticket: Ticket,
    key: P::Key,
) {
    let result = target.fetch(&key).await;
    if gate.apply(ticket, || target.apply(&key, result)).is_none() {
        tracing::debug!(scheduler = name, ?key, "discarding superseded response");
    }
}
