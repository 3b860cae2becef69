//! Shared session flags.

use std::sync::atomic::{AtomicBool, Ordering};

/// The three flags every background task gates on.
///
/// Constructed once, shared via `Arc`, and polled at the top of each task
/// iteration. `running` mirrors the surface lifecycle: it is set right after
/// the surface task confirms creation and cleared before the task is joined.
#[derive(Debug, Default)]
pub struct SessionFlags {
    running: AtomicBool,
    rgb_cycle: AtomicBool,
    fade: AtomicBool,
}

impl SessionFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
    }

    pub fn rgb_cycle_enabled(&self) -> bool {
        self.rgb_cycle.load(Ordering::SeqCst)
    }

    pub fn set_rgb_cycle(&self, enabled: bool) {
        self.rgb_cycle.store(enabled, Ordering::SeqCst);
    }

    pub fn fade_enabled(&self) -> bool {
        self.fade.load(Ordering::SeqCst)
    }

    pub fn set_fade(&self, enabled: bool) {
        self.fade.store(enabled, Ordering::SeqCst);
    }
}
