//! Input debouncing
//!
//! Holds the most recent value and releases it only after it has been left
//! alone for the whole window. Every push restarts the window.

use std::time::Duration;
use tokio::time::{sleep_until, Instant};
use tracing::trace;

struct Pending<T> {
    value: T,
    deadline: Instant,
    /// How many earlier values this one replaced
    superseded: usize,
}

/// Single-slot debouncer driven from a `select!` loop
pub struct Debouncer<T> {
    window: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    /// Create a new debouncer
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replace the pending value and restart the window
    pub fn push(&mut self, value: T) {
        let superseded = self.pending.as_ref().map_or(0, |p| p.superseded + 1);
        if superseded > 0 {
            trace!("Debounce window restarted ({superseded} superseded)");
        }
        self.pending = Some(Pending {
            value,
            deadline: Instant::now() + self.window,
            superseded,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Wait for the pending value to settle and take it
    ///
    /// Never resolves while nothing is pending. Cancel safe: dropping the
    /// future keeps the pending value.
    pub async fn settled(&mut self) -> T {
        loop {
            match self.deadline() {
                Some(deadline) => {
                    sleep_until(deadline).await;
                    if let Some(pending) = self.pending.take() {
                        return pending.value;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        }
    }
}
