//! Resend cooldown. Locking stores an unlock deadline and starts a single
//! one-second ticker that reports the remaining seconds to the view until it
//! reaches zero. Starting a new lock aborts the previous ticker.

use super::view::View;
use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::debug;

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct ResendCooldown {
    period: Duration,
    unlock_at: Mutex<Option<Instant>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl ResendCooldown {
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            unlock_at: Mutex::new(None),
            ticker: Mutex::new(None),
        }
    }

    /// Whole seconds left, rounded up; `0` once a resend is allowed.
    #[must_use]
    pub fn remaining(&self) -> u32 {
        let unlock_at = *self.unlock_at.lock().unwrap_or_else(PoisonError::into_inner);
        unlock_at.map_or(0, seconds_until)
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.remaining() > 0
    }

    /// Locks resends for the configured period and starts the countdown.
    /// Must be called from within a Tokio runtime.
    pub fn lock(&self, view: Arc<dyn View>) -> u32 {
        let unlock_at = Instant::now() + self.period;
        *self.unlock_at.lock().unwrap_or_else(PoisonError::into_inner) = Some(unlock_at);

        let total = seconds_until(unlock_at);
        view.resend_countdown(total);

        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + TICK, TICK);
            loop {
                ticks.tick().await;
                let left = seconds_until(unlock_at);
                view.resend_countdown(left);
                if left == 0 {
                    break;
                }
            }
        });

        let previous = self
            .ticker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }

        debug!(seconds = total, "resend locked");
        total
    }

    /// Stops the countdown and allows a resend immediately.
    pub fn cancel(&self) {
        *self.unlock_at.lock().unwrap_or_else(PoisonError::into_inner) = None;
        if let Some(ticker) = self.ticker.lock().unwrap_or_else(PoisonError::into_inner).take() {
            ticker.abort();
        }
    }

    /// Waits for the active countdown, if any, to report zero.
    pub async fn finished(&self) {
        let ticker = self.ticker.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(ticker) = ticker {
            let _ = ticker.await;
        }
    }
}

impl Drop for ResendCooldown {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.get_mut().unwrap_or_else(PoisonError::into_inner).take() {
            ticker.abort();
        }
    }
}

fn seconds_until(deadline: Instant) -> u32 {
    let left = deadline.saturating_duration_since(Instant::now());
    let millis = left.as_millis();
    u32::try_from(millis.div_ceil(1_000)).unwrap_or(u32::MAX)
}
