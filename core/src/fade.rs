//! The opacity fade waveform.

/// Lowest opacity the fade reaches.
pub const FADE_FLOOR: f64 = 0.3;
/// Highest opacity the fade returns to.
pub const FADE_CEILING: f64 = 1.0;
/// Ticks in one full down-and-up traversal.
pub const FADE_PERIOD_TICKS: u32 = 70;

// The wave is computed in integer hundredths. Accumulating f64 0.02 steps
// drifts enough that the ceiling is missed by one ulp and the period becomes
// 71 ticks instead of 70.
const FLOOR: i16 = 30;
const CEILING: i16 = 100;
const STEP: i16 = 2;

/// Triangular opacity wave: starts fully visible, dims by 0.02 per tick to
/// 0.3, then brightens back to 1.0, repeating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeWave {
    level: i16,
    falling: bool,
}

impl FadeWave {
    pub fn new() -> Self {
        Self {
            level: CEILING,
            falling: true,
        }
    }

    /// Advance one tick and return the opacity to apply, in `[0.3, 1.0]`.
    pub fn tick(&mut self) -> f64 {
        if self.falling {
            self.level -= STEP;
            if self.level <= FLOOR {
                self.level = FLOOR;
                self.falling = false;
            }
        } else {
            self.level += STEP;
            if self.level >= CEILING {
                self.level = CEILING;
                self.falling = true;
            }
        }
        self.alpha()
    }

    /// Current opacity without advancing.
    pub fn alpha(&self) -> f64 {
        f64::from(self.level) / 100.0
    }
}

impl Default for FadeWave {
    fn default() -> Self {
        Self::new()
    }
}
