//! Crosshair and auto-clicker configuration.
//!
//! All range enforcement happens here, at the input boundary. Code that reads
//! these values (redraw, the click loop) can assume they are already valid.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::input::MouseButton;

// ─────────────────────────────────────────────────────────────────────────────
// Value ranges
// ─────────────────────────────────────────────────────────────────────────────

/// Smallest crosshair arm half-length, in pixels.
pub const MIN_SIZE: u32 = 5;
/// Largest crosshair arm half-length, in pixels.
pub const MAX_SIZE: u32 = 100;
/// Thinnest stroke width, in pixels.
pub const MIN_THICKNESS: u32 = 1;
/// Widest stroke width, in pixels.
pub const MAX_THICKNESS: u32 = 10;
/// Shortest pause between automated clicks, in seconds.
pub const MIN_CLICK_DELAY_SECS: f64 = 0.01;
/// Longest pause between automated clicks, in seconds.
pub const MAX_CLICK_DELAY_SECS: f64 = 1.0;

// ─────────────────────────────────────────────────────────────────────────────
// Crosshair
// ─────────────────────────────────────────────────────────────────────────────

/// Visual parameters of the crosshair.
///
/// Read on every redraw; mutated by console edits and the color-cycle task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrosshairConfig {
    /// Arm half-length in pixels, measured from the screen midpoint.
    pub size: u32,
    /// Stroke width in pixels.
    pub thickness: u32,
    /// Stroke color.
    pub color: Rgb,
}

impl Default for CrosshairConfig {
    fn default() -> Self {
        Self {
            size: 20,
            thickness: 2,
            color: Rgb::new(255, 0, 0),
        }
    }
}

impl CrosshairConfig {
    /// Set the arm half-length, clamped to `[MIN_SIZE, MAX_SIZE]`.
    pub fn set_size(&mut self, size: u32) {
        self.size = size.clamp(MIN_SIZE, MAX_SIZE);
    }

    /// Set the stroke width, clamped to `[MIN_THICKNESS, MAX_THICKNESS]`.
    pub fn set_thickness(&mut self, thickness: u32) {
        self.thickness = thickness.clamp(MIN_THICKNESS, MAX_THICKNESS);
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Auto-clicker
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters of the automated click loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoClickConfig {
    /// Pause between clicks, in seconds.
    pub delay_seconds: f64,
    /// Which button each click presses.
    pub button: MouseButton,
}

impl Default for AutoClickConfig {
    fn default() -> Self {
        Self {
            delay_seconds: 0.1,
            button: MouseButton::Left,
        }
    }
}

impl AutoClickConfig {
    /// Set the click delay, clamped to `[MIN_CLICK_DELAY_SECS,
    /// MAX_CLICK_DELAY_SECS]`. Non-finite input is ignored and the previous
    /// value kept; a NaN delay has no usable `Duration`.
    pub fn set_delay_seconds(&mut self, seconds: f64) {
        if seconds.is_finite() {
            self.delay_seconds = seconds.clamp(MIN_CLICK_DELAY_SECS, MAX_CLICK_DELAY_SECS);
        }
    }

    pub fn set_button(&mut self, button: MouseButton) {
        self.button = button;
    }

    /// The configured delay as a [`std::time::Duration`].
    pub fn delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(self.delay_seconds)
    }
}
