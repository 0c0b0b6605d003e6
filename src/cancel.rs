//! Cooperative cancellation shared between the loop and its host.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};

/// Outcome of a stop request.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopRequest {
    /// The loop will exit after its current iteration.
    First,
    /// A stop was already pending; the host should terminate immediately.
    Repeated,
}

/// Stop flag checked by the control loop at each iteration boundary.
///
/// Clones share state: hand one to the interrupt handler and one to the
/// loop.
#[derive(Clone, Debug, Default)]
pub struct StopFlag {
    requests: Arc<AtomicUsize>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) -> StopRequest {
        match self.requests.fetch_add(1, Ordering::SeqCst) {
            0 => StopRequest::First,
            _ => StopRequest::Repeated,
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.requests.load(Ordering::SeqCst) > 0
    }
}
