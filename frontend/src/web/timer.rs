//! Timers.
//!
//! Browser timers as futures, via `gloo-timers`. Code that waits takes a
//! [`SleepFn`] so tests can substitute tokio's paused clock.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::time::Duration;

/// Factory for a delay future.
pub type SleepFn = fn(Duration) -> LocalBoxFuture<'static, ()>;

/// `setTimeout`-backed delay.
pub fn sleep(duration: Duration) -> LocalBoxFuture<'static, ()> {
    gloo_timers::future::sleep(duration).boxed_local()
}
