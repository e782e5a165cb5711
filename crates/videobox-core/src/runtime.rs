//! Cooperative scheduling on a single UI thread.
//!
//! Every continuation the widgets defer (fire-and-forget hides, debounce
//! timers, headless animation clocks) goes through a [`Scheduler`], so the
//! same engine runs on a tokio `LocalSet` natively and on the browser event
//! loop in wasm.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Boxed future pinned to the current thread
pub type LocalFuture<T> = Pin<Box<dyn Future<Output = T>>>;

/// Deferred execution on the UI thread
pub trait Scheduler {
    /// Run a future to completion in the background
    fn spawn(&self, future: LocalFuture<()>);

    /// Resolve after `duration`
    fn sleep(&self, duration: Duration) -> LocalFuture<()>;
}

/// Scheduler for a tokio current-thread runtime.
///
/// Must be driven from inside a [`tokio::task::LocalSet`].
#[cfg(feature = "tokio-runtime")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[cfg(feature = "tokio-runtime")]
impl Scheduler for TokioScheduler {
    fn spawn(&self, future: LocalFuture<()>) {
        tokio::task::spawn_local(future);
    }

    fn sleep(&self, duration: Duration) -> LocalFuture<()> {
        Box::pin(tokio::time::sleep(duration))
    }
}
