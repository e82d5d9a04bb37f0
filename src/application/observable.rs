// Observable state cell shared between a controller and its readers
use std::sync::Arc;
use tokio::sync::watch;

/// Holds the latest published value. Every change publishes a new `Arc`,
/// so subscribers never observe a value being mutated in place.
pub struct Observable<T> {
    tx: watch::Sender<Arc<T>>,
}

impl<T> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { tx }
    }

    pub fn get(&self) -> Arc<T> {
        self.tx.borrow().clone()
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(Arc::new(value));
    }

    /// Atomically derive the next value from the current one. Returning
    /// `None` leaves the cell untouched and wakes nobody.
    pub fn update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&T) -> Option<T>,
    {
        self.tx.send_if_modified(|current| match f(&**current) {
            Some(next) => {
                *current = Arc::new(next);
                true
            }
            None => false,
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<T>> {
        self.tx.subscribe()
    }
}
