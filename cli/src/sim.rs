//! In-process input backends.
//!
//! The binary runs against these instead of OS-level input hooks: key
//! presses arrive through the REPL's `press` command and clicks are logged
//! rather than injected. Tests drive them directly.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use reticle_core::{ClickInjector, InputError, KeyPoller, MouseButton};

#[derive(Default)]
struct SimState {
    /// Key name (uppercased) to the instant the press expires.
    held: HashMap<String, Instant>,
    failing: bool,
}

/// Keyboard state that `press` writes and the hotkey dispatcher polls.
///
/// A press registers the key as held for a fixed duration; polling after the
/// deadline reads as released. Clones share the same state.
#[derive(Clone, Default)]
pub struct SimulatedKeys {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedKeys {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `key` down for `duration` starting now.
    pub fn press(&self, key: &str, duration: Duration) {
        if let Ok(mut state) = self.state.lock() {
            state
                .held
                .insert(key.to_ascii_uppercase(), Instant::now() + duration);
        }
    }

    /// Release `key` immediately.
    pub fn release(&self, key: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.held.remove(&key.to_ascii_uppercase());
        }
    }

    /// Make every poll fail until called again with `false`.
    pub fn set_failing(&self, failing: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.failing = failing;
        }
    }
}

impl KeyPoller for SimulatedKeys {
    fn is_pressed(&self, key: &str) -> Result<bool, InputError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| InputError::Unavailable("key state lock poisoned".into()))?;
        if state.failing {
            return Err(InputError::KeyState {
                key: key.to_string(),
                reason: "simulated poll failure".into(),
            });
        }
        let name = key.to_ascii_uppercase();
        match state.held.get(&name) {
            Some(deadline) if Instant::now() < *deadline => Ok(true),
            Some(_) => {
                state.held.remove(&name);
                Ok(false)
            }
            None => Ok(false),
        }
    }
}

/// Click backend that records the click in the log and does nothing else.
pub struct LoggingClicker;

impl ClickInjector for LoggingClicker {
    fn click(&self, button: MouseButton) -> Result<(), InputError> {
        debug!(button = button.name(), "click injected");
        Ok(())
    }
}
