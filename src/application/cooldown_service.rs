// Cooldown control - optimistic create/clear reconciled with the server
use crate::application::notification_service::Notifier;
use crate::application::observable::Observable;
use crate::application::request_gate::{LatestGate, Ticket};
use crate::application::telemetry_client::{ClientError, CooldownClient};
use crate::domain::cooldown::{CooldownAction, CooldownState, CooldownView};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinHandle};

pub const ACTIVATED: &str = "Cooldown activated until tomorrow";
pub const ALREADY_ACTIVE: &str = "Cooldown already active";
pub const ACTIVATE_FAILED: &str = "Failed to activate cooldown";
pub const CLEARED: &str = "Cooldown cleared";
pub const CLEAR_FAILED: &str = "Failed to clear cooldown";
pub const STATUS_FAILED: &str = "Failed to fetch cooldown status";

struct CooldownInner {
    client: Arc<dyn CooldownClient>,
    notifier: Notifier,
    view: Observable<CooldownView>,
    gate: LatestGate,
    round_trip: Mutex<Option<AbortHandle>>,
}

impl CooldownInner {
    fn settle_status(&self, result: Result<bool, ClientError>) {
        match result {
            Ok(active) => {
                tracing::info!(active, "cooldown status resolved");
                self.view.set(CooldownView {
                    state: CooldownState::from_active(active),
                    loading: false,
                });
            }
            Err(e) => {
                tracing::warn!("cooldown status query failed: {}", e);
                self.view.update(|current| {
                    Some(CooldownView {
                        loading: false,
                        ..*current
                    })
                });
                self.notifier.error(STATUS_FAILED);
            }
        }
    }

    fn settle_create(&self, prior: CooldownState, result: Result<bool, ClientError>) {
        match result {
            Ok(_) => {
                tracing::info!("cooldown activated");
                self.finish(CooldownState::Active);
                self.notifier.success(ACTIVATED);
            }
            // Someone else got there first; the cooldown is on either way
            Err(e) if e.is_conflict() => {
                tracing::info!("cooldown was already active");
                self.finish(CooldownState::Active);
                self.notifier.info(ALREADY_ACTIVE);
            }
            Err(e) => {
                tracing::warn!(prior = prior.as_str(), "cooldown activation failed: {}", e);
                self.finish(prior);
                self.notifier.error(ACTIVATE_FAILED);
            }
        }
    }

    fn settle_clear(&self, prior: CooldownState, result: Result<(), ClientError>) {
        match result {
            Ok(()) => {
                tracing::info!("cooldown cleared");
                self.finish(CooldownState::Inactive);
                self.notifier.success(CLEARED);
            }
            Err(e) => {
                tracing::warn!(prior = prior.as_str(), "cooldown clear failed: {}", e);
                self.finish(prior);
                self.notifier.error(CLEAR_FAILED);
            }
        }
    }

    fn finish(&self, state: CooldownState) {
        self.view.set(CooldownView {
            state,
            loading: false,
        });
    }
}

/// Owns the cooldown state. Create and clear run one at a time; while a
/// round-trip is outstanding the view is `loading` and further actions are
/// ignored.
#[derive(Clone)]
pub struct CooldownController {
    inner: Arc<CooldownInner>,
}

impl CooldownController {
    /// Build the controller and issue the initial status query.
    pub fn start(client: Arc<dyn CooldownClient>, notifier: Notifier) -> Self {
        let controller = Self {
            inner: Arc::new(CooldownInner {
                client,
                notifier,
                view: Observable::new(CooldownView::unknown()),
                gate: LatestGate::new(),
                round_trip: Mutex::new(None),
            }),
        };
        controller.spawn_status_query();
        controller
    }

    pub fn view(&self) -> Arc<CooldownView> {
        self.inner.view.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<CooldownView>> {
        self.inner.view.subscribe()
    }

    /// Re-query the server. Ignored while another round-trip is running.
    pub async fn refresh_status(&self) -> Arc<CooldownView> {
        if let Some(task) = self.spawn_status_query() {
            self.join(task).await;
        }
        self.view()
    }

    pub async fn create(&self) -> Arc<CooldownView> {
        let Some((ticket, prior)) = self.begin(CooldownAction::Create) else {
            tracing::debug!(state = self.view().state.as_str(), "create ignored");
            return self.view();
        };

        let inner = self.inner.clone();
        let task = tokio::spawn(async move {
            let result = inner.client.create().await;
            inner.gate.apply(ticket, || inner.settle_create(prior, result));
        });
        self.join(task).await;
        self.view()
    }

    pub async fn clear(&self) -> Arc<CooldownView> {
        let Some((ticket, prior)) = self.begin(CooldownAction::Clear) else {
            tracing::debug!(state = self.view().state.as_str(), "clear ignored");
            return self.view();
        };

        let inner = self.inner.clone();
        let task = tokio::spawn(async move {
            let result = inner.client.clear().await;
            inner.gate.apply(ticket, || inner.settle_clear(prior, result));
        });
        self.join(task).await;
        self.view()
    }

    /// Cancel any outstanding round-trip; late results are dropped.
    pub fn stop(&self) {
        if self.inner.gate.is_closed() {
            return;
        }
        self.inner.gate.close();
        if let Some(round_trip) = self.lock_round_trip().take() {
            round_trip.abort();
        }
        tracing::debug!("cooldown control stopped");
    }

    fn begin(&self, action: CooldownAction) -> Option<(Ticket, CooldownState)> {
        if self.inner.gate.is_closed() {
            return None;
        }

        let mut prior = None;
        self.inner.view.update(|current| {
            if !current.permits(action) {
                return None;
            }
            prior = Some(current.state);
            Some(CooldownView {
                state: CooldownState::Pending(action),
                loading: true,
            })
        });

        let prior = prior?;
        let ticket = self.inner.gate.issue()?;
        Some((ticket, prior))
    }

    fn spawn_status_query(&self) -> Option<JoinHandle<()>> {
        if self.inner.gate.is_closed() {
            return None;
        }

        let started = self.inner.view.update(|current| {
            if current.loading || current.state.is_pending() {
                return None;
            }
            Some(CooldownView {
                loading: true,
                ..*current
            })
        });
        if !started {
            return None;
        }
        let ticket = self.inner.gate.issue()?;

        let inner = self.inner.clone();
        let task = tokio::spawn(async move {
            let result = inner.client.is_active().await;
            inner.gate.apply(ticket, || inner.settle_status(result));
        });
        self.lock_round_trip().replace(task.abort_handle());
        Some(task)
    }

    async fn join(&self, task: JoinHandle<()>) {
        self.lock_round_trip().replace(task.abort_handle());
        if let Err(e) = task.await {
            if !e.is_cancelled() {
                tracing::error!("cooldown round-trip failed: {}", e);
            }
        }
    }

    fn lock_round_trip(&self) -> std::sync::MutexGuard<'_, Option<AbortHandle>> {
        self.inner
            .round_trip
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
