//! Countdown timer
//!
//! One tokio task per pending draft. Ticks once per second with the time
//! left and fires the expiry callback once when the deadline passes.
//! Cancellation is cooperative through a [`CancellationToken`]; dropping the
//! timer cancels it.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Tick period
pub const TICK: Duration = Duration::from_secs(1);

pub struct CountdownTimer {
    generation: u64,
    deadline: Instant,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl std::fmt::Debug for CountdownTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountdownTimer")
            .field("generation", &self.generation)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

impl CountdownTimer {
    /// Start counting down `duration`.
    ///
    /// `on_tick` gets the time left after every tick; `on_expire` runs once
    /// at the deadline unless the timer was cancelled first.
    pub fn start<T, E, Fut>(generation: u64, duration: Duration, mut on_tick: T, on_expire: E) -> Self
    where
        T: FnMut(Duration) + Send + 'static,
        E: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let deadline = Instant::now() + duration;

        let handle = tokio::spawn(async move {
            let expiry = tokio::time::sleep_until(deadline);
            tokio::pin!(expiry);

            let mut ticker = tokio::time::interval_at(Instant::now() + TICK, TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => {
                        tracing::debug!(generation, "Countdown cancelled");
                        return;
                    }
                    _ = &mut expiry => break,
                    _ = ticker.tick() => {
                        let remaining = deadline.saturating_duration_since(Instant::now());
                        if remaining.is_zero() {
                            break;
                        }
                        on_tick(remaining);
                    }
                }
            }

            if cancelled.is_cancelled() {
                return;
            }
            tracing::debug!(generation, "Countdown reached zero");
            on_expire().await;
        });

        Self {
            generation,
            deadline,
            token,
            handle,
        }
    }

    /// Time left before the deadline
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the task has stopped (expired or cancelled)
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    fn counters() -> (Arc<Mutex<Vec<u64>>>, Arc<AtomicU32>) {
        (Arc::new(Mutex::new(Vec::new())), Arc::new(AtomicU32::new(0)))
    }

    fn start(
        duration: Duration,
        ticks: &Arc<Mutex<Vec<u64>>>,
        fired: &Arc<AtomicU32>,
    ) -> CountdownTimer {
        let ticks = ticks.clone();
        let fired = fired.clone();
        CountdownTimer::start(
            1,
            duration,
            move |left| ticks.lock().unwrap().push(left.as_secs()),
            move || async move {
                fired.fetch_add(1, Ordering::SeqCst);
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_then_fires_once() {
        let (ticks, fired) = counters();
        let timer = start(Duration::from_secs(5), &ticks, &fired);

        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(*ticks.lock().unwrap(), vec![4, 3, 2, 1]);
        assert!(timer.is_finished());
        assert_eq!(timer.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_expiry() {
        let (ticks, fired) = counters();
        let timer = start(Duration::from_secs(5), &ticks, &fired);

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(ticks.lock().unwrap().len(), 2);
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let (ticks, fired) = counters();
        drop(start(Duration::from_secs(3), &ticks, &fired));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
