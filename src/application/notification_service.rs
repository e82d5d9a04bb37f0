// Single-slot, self-expiring notifications
use crate::application::observable::Observable;
use crate::domain::toast::{Severity, ToastMessage};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const DEFAULT_DISPLAY: Duration = Duration::from_millis(3000);

#[derive(Default)]
struct Expiry {
    shown: u64,
    timer: Option<JoinHandle<()>>,
    closed: bool,
}

struct NotifierInner {
    slot: Observable<Option<ToastMessage>>,
    display_for: Duration,
    expiry: Mutex<Expiry>,
}

impl NotifierInner {
    fn lock(&self) -> MutexGuard<'_, Expiry> {
        self.expiry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Holds at most one message. A new message replaces the current one and
/// restarts the expiry timer; without a replacement the slot empties after
/// `display_for`.
#[derive(Clone)]
pub struct Notifier {
    inner: Arc<NotifierInner>,
}

impl Notifier {
    pub fn new(display_for: Duration) -> Self {
        Self {
            inner: Arc::new(NotifierInner {
                slot: Observable::new(None),
                display_for,
                expiry: Mutex::new(Expiry::default()),
            }),
        }
    }

    pub fn show(&self, text: impl Into<String>, severity: Severity) {
        let message = ToastMessage::new(text, severity);
        let mut expiry = self.inner.lock();
        if expiry.closed {
            return;
        }

        expiry.shown += 1;
        let shown = expiry.shown;
        tracing::debug!(severity = severity.as_str(), text = %message.text, "notify");
        self.inner.slot.set(Some(message));

        let inner = self.inner.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(inner.display_for).await;
            let expiry = inner.lock();
            if !expiry.closed && expiry.shown == shown {
                inner.slot.set(None);
            }
        });
        if let Some(previous) = expiry.timer.replace(timer) {
            previous.abort();
        }
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text, Severity::Success);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.show(text, Severity::Info);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(text, Severity::Error);
    }

    pub fn current(&self) -> Option<ToastMessage> {
        (*self.inner.slot.get()).clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Option<ToastMessage>>> {
        self.inner.slot.subscribe()
    }

    /// Clear the slot and cancel the pending expiry; later `show` calls are ignored.
    pub fn stop(&self) {
        let mut expiry = self.inner.lock();
        if expiry.closed {
            return;
        }
        expiry.closed = true;
        if let Some(timer) = expiry.timer.take() {
            timer.abort();
        }
        self.inner.slot.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{Instant, timeout};

    #[tokio::test(start_paused = true)]
    async fn test_message_expires_after_display_time() {
        let notifier = Notifier::new(DEFAULT_DISPLAY);
        let mut rx = notifier.subscribe();
        let started = Instant::now();

        notifier.success("Cooldown cleared");
        rx.borrow_and_update();
        assert_eq!(
            notifier.current(),
            Some(ToastMessage::new("Cooldown cleared", Severity::Success))
        );

        assert!(timeout(Duration::from_millis(2999), rx.changed()).await.is_err());
        assert!(notifier.current().is_some());

        rx.changed().await.unwrap();
        assert!(notifier.current().is_none());
        assert!(started.elapsed() >= DEFAULT_DISPLAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_message_replaces_and_restarts_timer() {
        let notifier = Notifier::new(DEFAULT_DISPLAY);
        notifier.error("Failed to clear cooldown");

        tokio::time::sleep(Duration::from_millis(2000)).await;
        notifier.info("Cooldown already active");
        assert_eq!(
            notifier.current(),
            Some(ToastMessage::new("Cooldown already active", Severity::Info))
        );

        // The first message's deadline passes without clearing the replacement
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(notifier.current().map(|m| m.severity), Some(Severity::Info));

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert!(notifier.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_clears_and_silences() {
        let notifier = Notifier::new(DEFAULT_DISPLAY);
        notifier.info("hello");

        notifier.stop();
        notifier.stop();
        notifier.error("after stop");

        assert!(notifier.current().is_none());
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(notifier.current().is_none());
    }
}
