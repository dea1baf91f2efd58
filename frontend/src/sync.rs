//! Latest-request guard.
//!
//! A view that can issue overlapping requests for the same slot (a changed
//! email, a new search keystroke) takes a [`Ticket`] per request and applies the
//! result only while that ticket is still current.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, Default)]
pub struct RequestGuard {
    generation: Arc<AtomicU64>,
}

/// Proof of which request generation a response belongs to.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    guard: Arc<AtomicU64>,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation; every earlier ticket becomes stale.
    pub fn begin(&self) -> Ticket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Ticket {
            generation,
            guard: self.generation.clone(),
        }
    }

    /// Invalidates outstanding tickets without starting a request (unmount).
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.guard.load(Ordering::SeqCst) == self.generation
    }

    /// Runs `apply` only for the current generation.
    pub fn apply<T>(&self, value: T, apply: impl FnOnce(T)) -> bool {
        if self.is_current() {
            apply(value);
            true
        } else {
            log::debug!("Dropping stale response (generation {})", self.generation);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let guard = RequestGuard::new();
        let first = guard.begin();
        assert!(first.is_current());

        let second = guard.begin();
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn test_cancel_invalidates_everything() {
        let guard = RequestGuard::new();
        let ticket = guard.begin();
        guard.cancel();
        assert!(!ticket.is_current());
    }

    #[test]
    fn test_apply_skips_stale_results() {
        let guard = RequestGuard::new();
        let stale = guard.begin();
        let fresh = guard.begin();

        let mut seen = Vec::new();
        assert!(!stale.apply("old", |v| seen.push(v)));
        assert!(fresh.apply("new", |v| seen.push(v)));
        assert_eq!(seen, vec!["new"]);
    }

    #[tokio::test]
    async fn test_out_of_order_completion() {
        let guard = RequestGuard::new();
        let slow = guard.begin();
        let fast = guard.begin();

        // fast resolves first, then the superseded slow request lands
        let mut shown = None;
        fast.apply(2, |v| shown = Some(v));
        slow.apply(1, |v| shown = Some(v));
        assert_eq!(shown, Some(2));
    }
}
