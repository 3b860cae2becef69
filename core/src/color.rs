//! RGB color type and the quantized color sweep.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Channel step of the color sweep. Channels only ever take values in
/// `{0, 5, 10, ..., 255}`.
pub const SWEEP_STEP: u16 = 5;

/// Number of distinct values a single channel takes during a sweep.
const CHANNEL_STEPS: usize = 52;

/// Total steps in one full sweep cycle (52 × 52 × 52).
pub const SWEEP_CYCLE_LEN: usize = CHANNEL_STEPS * CHANNEL_STEPS * CHANNEL_STEPS;

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Failure to parse a `#rrggbb` string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color {input:?}: expected #rrggbb")]
pub struct ColorParseError {
    pub input: String,
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Parses `#rrggbb` or `rrggbb` (case-insensitive hex).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ColorParseError {
            input: s.to_string(),
        };
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(error());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| error())
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Color sweep
// ─────────────────────────────────────────────────────────────────────────────

/// Endless generator of the color-cycle sequence.
///
/// Sweeps red, green, and blue through `{0, 5, ..., 255}` in nested
/// lexicographic order with red outermost and blue innermost, then wraps
/// around to black. The position is local to the generator; a fresh sweep
/// always restarts at `(0, 0, 0)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbSweep {
    // u16 so the advance past 255 cannot overflow before wrapping.
    r: u16,
    g: u16,
    b: u16,
}

impl RgbSweep {
    pub fn new() -> Self {
        Self { r: 0, g: 0, b: 0 }
    }

    /// Current color, then advance one step (blue innermost).
    pub fn advance(&mut self) -> Rgb {
        let color = Rgb::new(self.r as u8, self.g as u8, self.b as u8);
        self.b += SWEEP_STEP;
        if self.b > 255 {
            self.b = 0;
            self.g += SWEEP_STEP;
            if self.g > 255 {
                self.g = 0;
                self.r += SWEEP_STEP;
                if self.r > 255 {
                    self.r = 0;
                }
            }
        }
        color
    }
}

impl Default for RgbSweep {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for RgbSweep {
    type Item = Rgb;

    fn next(&mut self) -> Option<Rgb> {
        Some(self.advance())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_as_hex() {
        assert_eq!(Rgb::new(255, 0, 0).to_string(), "#ff0000");
        assert_eq!(Rgb::new(0, 15, 255).to_string(), "#000fff");
    }

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!("#ff8000".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert_eq!("00FF00".parse::<Rgb>().unwrap(), Rgb::new(0, 255, 0));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!("#ff00".parse::<Rgb>().is_err());
        assert!("zzzzzz".parse::<Rgb>().is_err());
        assert!("#ff00000".parse::<Rgb>().is_err());
    }

    #[test]
    fn sweep_starts_at_black_and_advances_blue_first() {
        let mut sweep = RgbSweep::new();
        assert_eq!(sweep.advance(), Rgb::new(0, 0, 0));
        assert_eq!(sweep.advance(), Rgb::new(0, 0, 5));
    }

    #[test]
    fn sweep_carries_into_green_then_red() {
        let mut sweep = RgbSweep::new();
        let cycle: Vec<Rgb> = sweep.by_ref().take(SWEEP_CYCLE_LEN).collect();
        assert_eq!(cycle[CHANNEL_STEPS], Rgb::new(0, 5, 0));
        assert_eq!(cycle[CHANNEL_STEPS * CHANNEL_STEPS], Rgb::new(5, 0, 0));
    }

    #[test]
    fn full_cycle_visits_black_and_white_and_only_step_values() {
        let mut sweep = RgbSweep::new();
        let mut saw_black = false;
        let mut saw_white = false;
        for _ in 0..SWEEP_CYCLE_LEN {
            let c = sweep.advance();
            saw_black |= c == Rgb::new(0, 0, 0);
            saw_white |= c == Rgb::new(255, 255, 255);
            for channel in [c.r, c.g, c.b] {
                assert_eq!(u16::from(channel) % SWEEP_STEP, 0);
            }
        }
        assert!(saw_black);
        assert!(saw_white);
        // And the cycle wraps back around to black.
        assert_eq!(sweep.advance(), Rgb::new(0, 0, 0));
    }
}
