// Latest-wins gate: only the most recently issued request may apply its result
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct GateState {
    current: u64,
    closed: bool,
}

#[derive(Debug, Default)]
pub struct LatestGate {
    state: Mutex<GateState>,
}

impl LatestGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Issue a ticket for a new request, superseding every earlier one.
    /// Returns `None` once the gate is closed.
    pub fn issue(&self) -> Option<Ticket> {
        let mut state = self.lock();
        if state.closed {
            return None;
        }
        state.current += 1;
        Some(Ticket(state.current))
    }

    /// Make every outstanding ticket stale without issuing a new one.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.current += 1;
    }

    /// Run `f` only if `ticket` is still the latest and the gate is open.
    /// `f` runs under the gate lock, so it cannot interleave with `close`.
    pub fn apply<R>(&self, ticket: Ticket, f: impl FnOnce() -> R) -> Option<R> {
        let state = self.lock();
        if state.closed || state.current != ticket.0 {
            return None;
        }
        let result = f();
        drop(state);
        Some(result)
    }

    pub fn close(&self) {
        self.lock().closed = true;
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}
