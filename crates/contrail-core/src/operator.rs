//! Run controls shared between the tick loop and whoever drives it.
//!
//! Pause, resume, and stop are atomics so the loop reads them without
//! locking; a [`Notify`] wakes a paused loop on resume.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

/// Why a run loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// A stop was requested.
    OperatorStop,
    /// The world's status became ended.
    WorldEnded,
}

/// Shared pause/stop state.
#[derive(Debug, Default)]
pub struct RunControls {
    paused: AtomicBool,
    resume_notify: Notify,
    stop_requested: AtomicBool,
}

impl RunControls {
    /// Controls in the running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the loop is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the loop before its next tick.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume a paused loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until not paused. Returns immediately when running.
    pub async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire) {
            if self.is_stop_requested() {
                return;
            }
            self.resume_notify.notified().await;
        }
    }

    /// Ask the loop to stop cleanly.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_is_running() {
        let controls = RunControls::new();
        assert!(!controls.is_paused());
        assert!(!controls.is_stop_requested());
    }

    #[test]
    fn pause_and_resume() {
        let controls = RunControls::new();
        controls.pause();
        assert!(controls.is_paused());
        controls.resume();
        assert!(!controls.is_paused());
    }

    #[tokio::test]
    async fn stop_releases_a_paused_waiter() {
        let controls = RunControls::new();
        controls.pause();
        controls.request_stop();
        controls.wait_if_paused().await;
        assert!(controls.is_stop_requested());
    }
}
