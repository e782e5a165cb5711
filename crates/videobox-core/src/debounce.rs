//! Request batching.
//!
//! A [`Debouncer`] counts requests and keeps one live timer. Each request
//! restarts the window; when the window elapses without a new request the
//! latest run function executes once and every coalesced request resolves
//! with its outcome.

use crate::runtime::Scheduler;
use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::oneshot;

struct DebounceState<T> {
    generation: u64,
    pending: usize,
    waiters: Vec<oneshot::Sender<T>>,
}

/// Coalesces requests arriving within a time window
pub struct Debouncer<T> {
    window: Duration,
    scheduler: Rc<dyn Scheduler>,
    state: Rc<RefCell<DebounceState<T>>>,
}

impl<T: Clone + 'static> Debouncer<T> {
    pub fn new(window: Duration, scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            window,
            scheduler,
            state: Rc::new(RefCell::new(DebounceState {
                generation: 0,
                pending: 0,
                waiters: Vec::new(),
            })),
        }
    }

    /// Request a run. Resolves with the outcome of the run this request was
    /// coalesced into.
    pub fn request<F, Fut>(&self, run: F) -> Settled<T>
    where
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = T> + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let generation = {
            let mut state = self.state.borrow_mut();
            state.generation += 1;
            state.pending += 1;
            state.waiters.push(tx);
            state.generation
        };

        let state = self.state.clone();
        let sleep = self.scheduler.sleep(self.window);
        self.scheduler.spawn(Box::pin(async move {
            sleep.await;
            let waiters = {
                let mut state = state.borrow_mut();
                if state.generation != generation {
                    return;
                }
                state.pending = 0;
                std::mem::take(&mut state.waiters)
            };

            let outcome = run().await;
            for waiter in waiters {
                let _ = waiter.send(outcome.clone());
            }
        }));

        Settled { rx }
    }

    /// Requests waiting for the window to elapse
    pub fn pending(&self) -> usize {
        self.state.borrow().pending
    }

    /// Drop queued requests; their [`Settled`] futures resolve to `None`
    pub fn cancel(&self) {
        let mut state = self.state.borrow_mut();
        state.generation += 1;
        state.pending = 0;
        state.waiters.clear();
    }
}

/// Outcome of a debounced request; `None` when the request was cancelled
#[derive(Debug)]
pub struct Settled<T> {
    rx: oneshot::Receiver<T>,
}

impl<T> Future for Settled<T> {
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map(|r| r.ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::TokioScheduler;
    use std::cell::Cell;
    use tokio::task::LocalSet;

    #[tokio::test(start_paused = true)]
    async fn test_requests_coalesce() {
        LocalSet::new()
            .run_until(async {
                let debouncer = Debouncer::new(Duration::from_millis(200), Rc::new(TokioScheduler));
                let runs = Rc::new(Cell::new(0));

                let mut settled = Vec::new();
                for i in 0..3 {
                    let runs = runs.clone();
                    settled.push(debouncer.request(move || async move {
                        runs.set(runs.get() + 1);
                        i
                    }));
                    tokio::time::sleep(Duration::from_millis(50)).await;
                }
                assert_eq!(debouncer.pending(), 3);

                for s in settled {
                    assert_eq!(s.await, Some(2));
                }
                assert_eq!(runs.get(), 1);
                assert_eq!(debouncer.pending(), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_run_separately() {
        LocalSet::new()
            .run_until(async {
                let debouncer = Debouncer::new(Duration::from_millis(200), Rc::new(TokioScheduler));
                let first = debouncer.request(|| async { 1 });
                assert_eq!(first.await, Some(1));
                let second = debouncer.request(|| async { 2 });
                assert_eq!(second.await, Some(2));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_waiters() {
        LocalSet::new()
            .run_until(async {
                let debouncer: Debouncer<u32> =
                    Debouncer::new(Duration::from_millis(200), Rc::new(TokioScheduler));
                let settled = debouncer.request(|| async { 7 });
                debouncer.cancel();
                assert_eq!(settled.await, None);
            })
            .await;
    }
}
