//! Frame scheduling seam.
//!
//! The engine never sleeps or spawns. It asks the host for one more frame
//! after each tick and withdraws the request on stop; the host owns the
//! actual display-refresh loop.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Host primitive that delivers one `tick` per display refresh.
pub trait FrameScheduler: Send {
    /// Ask for a callback on the next frame. Repeated requests before the
    /// frame fires collapse into one.
    fn request_frame(&mut self);

    /// Withdraw any pending request.
    fn cancel_frame(&mut self);
}

/// Scheduler for hosts that poll.
///
/// Cloning shares the flag, so a driver loop keeps one handle and the engine
/// owns the other.
#[derive(Debug, Clone, Default)]
pub struct FrameGate {
    armed: Arc<AtomicBool>,
    requests: Arc<AtomicU64>,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Consume the pending request. Returns whether one was pending.
    pub fn take(&self) -> bool {
        self.armed.swap(false, Ordering::AcqRel)
    }

    /// Total requests seen, including collapsed ones.
    pub fn request_count(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}

impl FrameScheduler for FrameGate {
    fn request_frame(&mut self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        self.armed.store(true, Ordering::Release);
    }

    fn cancel_frame(&mut self) {
        self.armed.store(false, Ordering::Release);
    }
}

/// Scheduler that ignores requests, for callers that tick on their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unscheduled;

impl FrameScheduler for Unscheduled {
    fn request_frame(&mut self) {}

    fn cancel_frame(&mut self) {}
}
