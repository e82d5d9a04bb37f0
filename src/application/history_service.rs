// Historical chart controller - owns the selected day and its chart
use crate::application::calendar::Calendar;
use crate::application::observable::Observable;
use crate::application::scheduler::{PollTarget, PollingScheduler};
use crate::application::telemetry_client::{ClientError, TelemetryClient};
use crate::domain::telemetry::{ChartData, ChartState, TelemetrySeries};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

struct HistoryPoll {
    client: Arc<dyn TelemetryClient>,
    state: Observable<ChartState>,
}

#[async_trait]
impl PollTarget for HistoryPoll {
    type Key = NaiveDate;
    type Output = TelemetrySeries;

    fn key(&self) -> NaiveDate {
        self.state.get().selected_date
    }

    async fn fetch(&self, date: &NaiveDate) -> Result<TelemetrySeries, ClientError> {
        self.state.update(|current| {
            (current.selected_date == *date && !current.loading).then(|| ChartState {
                loading: true,
                ..current.clone()
            })
        });
        self.client.fetch_series(*date).await
    }

    fn apply(&self, date: &NaiveDate, result: Result<TelemetrySeries, ClientError>) {
        self.state.update(|current| {
            // The day changed after this request went out
            if current.selected_date != *date {
                tracing::debug!(%date, selected = %current.selected_date, "dropping series for deselected day");
                return None;
            }

            match result {
                Ok(series) => {
                    if series.is_empty() {
                        tracing::info!(%date, "no samples recorded for day");
                    }
                    tracing::debug!(%date, samples = series.len(), "chart updated");
                    Some(ChartState {
                        selected_date: *date,
                        loading: false,
                        chart: Arc::new(ChartData::from_series(series)),
                    })
                }
                Err(e) => {
                    tracing::warn!(%date, "keeping previous chart, fetch failed: {}", e);
                    current.loading.then(|| ChartState {
                        loading: false,
                        ..current.clone()
                    })
                }
            }
        });
    }
}

/// Chart view controller. The selected day is re-fetched on every poll tick
/// and on every navigation; only the latest request may update the chart.
#[derive(Clone)]
pub struct HistoryController {
    poll: Arc<HistoryPoll>,
    calendar: Arc<dyn Calendar>,
    scheduler: Arc<PollingScheduler>,
}

impl HistoryController {
    pub fn start(
        client: Arc<dyn TelemetryClient>,
        calendar: Arc<dyn Calendar>,
        period: Duration,
    ) -> Self {
        let poll = Arc::new(HistoryPoll {
            client,
            state: Observable::new(ChartState::new(calendar.today())),
        });
        let scheduler = Arc::new(PollingScheduler::start("history", period, poll.clone()));

        Self {
            poll,
            calendar,
            scheduler,
        }
    }

    pub fn state(&self) -> Arc<ChartState> {
        self.poll.state.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ChartState>> {
        self.poll.state.subscribe()
    }

    pub fn is_today(&self) -> bool {
        self.state().selected_date == self.calendar.today()
    }

    /// Step back one day and fetch it.
    pub fn previous_day(&self) -> bool {
        self.navigate(|date| date.pred_opt())
    }

    /// Step forward one day, but never past today.
    pub fn next_day(&self) -> bool {
        let today = self.calendar.today();
        self.navigate(|date| if date < today { date.succ_opt() } else { None })
    }

    pub fn refresh(&self) {
        self.scheduler.refresh();
    }

    pub fn stop(&self) {
        self.scheduler.stop();
    }

    fn navigate(&self, step: impl FnOnce(NaiveDate) -> Option<NaiveDate>) -> bool {
        if self.scheduler.is_stopped() {
            return false;
        }

        let moved = self.poll.state.update(|current| {
            step(current.selected_date).map(|date| ChartState {
                selected_date: date,
                loading: true,
                chart: current.chart.clone(),
            })
        });

        if moved {
            tracing::debug!(date = %self.state().selected_date, "navigated");
            self.scheduler.refresh();
        }
        moved
    }
}
