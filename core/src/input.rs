//! Input primitive contracts: click injection and global key polling.
//!
//! The process embedding the state machine supplies real implementations
//! (OS-level injection, global key hooks). Everything in this workspace talks
//! to these traits only.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Key that toggles the crosshair session.
pub const CROSSHAIR_HOTKEY: &str = "F8";
/// Key that toggles the auto-clicker.
pub const AUTO_CLICKER_HOTKEY: &str = "F9";

/// Mouse button a synthetic click presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn name(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
        }
    }

    /// Parse a button name as typed at the console.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "left" => Some(MouseButton::Left),
            "right" => Some(MouseButton::Right),
            "middle" => Some(MouseButton::Middle),
            _ => None,
        }
    }
}

/// Failure of an input primitive.
///
/// These are transient by contract: callers log them and carry on (a failed
/// poll reads as "not pressed", a failed click is skipped).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("input backend unavailable: {0}")]
    Unavailable(String),
    #[error("key state query failed for {key}: {reason}")]
    KeyState { key: String, reason: String },
    #[error("click injection failed: {0}")]
    Inject(String),
}

/// Injects a mouse click at the current cursor position.
pub trait ClickInjector: Send + Sync {
    fn click(&self, button: MouseButton) -> Result<(), InputError>;
}

/// Samples whether a named key is currently held down.
pub trait KeyPoller: Send + Sync {
    /// Level-triggered sample. Errors must be treated as "not pressed" by
    /// callers; they never mean the poller is permanently broken.
    fn is_pressed(&self, key: &str) -> Result<bool, InputError>;
}
