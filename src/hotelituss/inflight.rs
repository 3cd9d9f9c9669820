//! Per-workflow admission control. A workflow (registration, login,
//! verification) holds at most one outstanding request; a second submission
//! while the token is held is rejected instead of racing the first one.

use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use ulid::Ulid;

#[derive(Debug)]
pub struct InFlight {
    name: &'static str,
    busy: AtomicBool,
}

impl InFlight {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            busy: AtomicBool::new(false),
        }
    }

    /// Takes the token, or returns `None` while another request is outstanding.
    pub fn try_acquire(&self) -> Option<InFlightGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;

        let token = Ulid::new();
        debug!(workflow = self.name, %token, "request token acquired");

        Some(InFlightGuard { owner: self, token })
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the token on drop, whichever way the request ended.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
    token: Ulid,
}

impl InFlightGuard<'_> {
    #[must_use]
    pub const fn token(&self) -> Ulid {
        self.token
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.busy.store(false, Ordering::Release);
        debug!(workflow = self.owner.name, token = %self.token, "request token released");
    }
}
