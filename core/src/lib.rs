//! Shared types for the reticle overlay tool
//!
//! This crate holds everything that is pure logic: configuration with range
//! clamping, the RGB sweep and fade waveform math, shared session flags, and
//! the trait contracts for the input primitives. The async machinery that
//! drives these lives in `reticle-cli`; the render surface contract lives in
//! `reticle-overlay`.

pub mod color;
pub mod config;
pub mod fade;
pub mod input;
pub mod state;

// Re-exports for convenience
pub use color::{ColorParseError, Rgb, RgbSweep, SWEEP_CYCLE_LEN, SWEEP_STEP};
pub use config::{
    AutoClickConfig, CrosshairConfig, MAX_CLICK_DELAY_SECS, MAX_SIZE, MAX_THICKNESS,
    MIN_CLICK_DELAY_SECS, MIN_SIZE, MIN_THICKNESS,
};
pub use fade::{FADE_CEILING, FADE_FLOOR, FADE_PERIOD_TICKS, FadeWave};
pub use input::{
    AUTO_CLICKER_HOTKEY, CROSSHAIR_HOTKEY, ClickInjector, InputError, KeyPoller, MouseButton,
};
pub use state::SessionFlags;
