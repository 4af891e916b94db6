//! Single-flight guard for actions that must not be double-submitted.
//!
//! `try_acquire()` either hands out the one guard or returns `None` while
//! an earlier submission is still running. Dropping the guard re-enables
//! the action. `is_busy()` drives the button's disabled state.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct InFlight {
    busy: AtomicBool,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self) -> Option<InFlightGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { owner: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// RAII token; releases the action on drop, including on early `?` returns.
pub struct InFlightGuard<'a> {
    owner: &'a InFlight,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.owner.busy.store(false, Ordering::Release);
    }
}
