// Application state for HTTP handlers
use crate::application::cooldown_service::CooldownController;
use crate::application::flow_service::FlowReconciler;
use crate::application::history_service::HistoryController;
use crate::application::notification_service::Notifier;

#[derive(Clone)]
pub struct AppState {
    pub history: HistoryController,
    pub flow: FlowReconciler,
    pub cooldown: CooldownController,
    pub notifier: Notifier,
}

impl AppState {
    /// Stop every controller; further ticks and late responses are dropped.
    pub fn stop(&self) {
        self.history.stop();
        self.flow.stop();
        self.cooldown.stop();
        self.notifier.stop();
    }
}
