//! Resize coordination: throttled, deferred relayout on container size changes.
//!
//! A container publishes its size on a [`watch`] channel. Each chart owns one receiver, so
//! dropping the chart is all it takes to unsubscribe. Notifications are throttled on the
//! leading edge and the pass itself runs at the next paint, reading whatever size is current
//! at that moment. A change refused by the throttle is not lost: it is seen again once the
//! window has closed.

use crate::axis::Viewport;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::debug;

/// Leading-edge throttle: the first request of an idle window schedules work and opens a
/// window of `limit`; requests inside the window are dropped.
#[derive(Debug, Clone)]
pub struct Throttle {
    limit: Duration,
    window_end: Option<Instant>,
    scheduled: bool,
}

impl Throttle {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            window_end: None,
            scheduled: false,
        }
    }

    /// Returns true when this request scheduled a pass.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.window_end.is_some_and(|end| now < end) {
            return false;
        }
        self.window_end = Some(now + self.limit);
        self.scheduled = true;
        true
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    /// Consume the scheduled pass, if any.
    pub fn take_scheduled(&mut self) -> bool {
        std::mem::take(&mut self.scheduled)
    }
}

/// Per-chart resize subscription.
#[derive(Debug)]
pub struct ResizeCoordinator {
    sizes: watch::Receiver<Viewport>,
    throttle: Throttle,
    passes: u64,
}

impl ResizeCoordinator {
    pub fn new(sizes: watch::Receiver<Viewport>, limit: Duration) -> Self {
        Self {
            sizes,
            throttle: Throttle::new(limit),
            passes: 0,
        }
    }

    /// Ask the throttle for a pass if the container size changed. Returns true when a pass was
    /// scheduled. A change refused by the throttle stays pending for a later call.
    pub fn observe(&mut self, now: Instant) -> bool {
        match self.sizes.has_changed() {
            Ok(true) if self.throttle.request(now) => {
                self.sizes.mark_unchanged();
                true
            }
            // Throttled, unchanged, or the container dropped its sender
            Ok(_) | Err(_) => false,
        }
    }

    /// Run the scheduled pass, returning the size current at this moment.
    pub fn run_pending(&mut self) -> Option<Viewport> {
        if !self.throttle.take_scheduled() {
            return None;
        }
        self.passes += 1;
        let viewport = *self.sizes.borrow();
        debug!(
            width = viewport.width,
            height = viewport.height,
            passes = self.passes,
            "resize pass"
        );
        Some(viewport)
    }

    /// Latest published size.
    pub fn current(&self) -> Viewport {
        *self.sizes.borrow()
    }

    /// Number of executed passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }
}
