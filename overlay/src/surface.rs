//! Render surface contract.
//!
//! A surface is a full-screen, always-on-top, click-through drawing target.
//! Platform backends implement [`Surface`] and hand instances out through a
//! [`SurfaceProvider`]. Destruction is ownership: dropping the boxed surface
//! tears the platform window down, and the session task that owns the box is
//! the only place that ever happens.

use thiserror::Error;

use reticle_core::Rgb;

/// A point in surface coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Errors surfaced by a backend.
///
/// Only `Create` ever reaches a user; draw and attribute failures are
/// transient and logged by the caller, which then carries on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("failed to create overlay surface: {0}")]
    Create(String),
    #[error("drawing failed: {0}")]
    Draw(String),
    #[error("surface attribute update failed: {0}")]
    Attribute(String),
}

/// An open overlay surface.
pub trait Surface: Send {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Draw a straight line segment.
    fn draw_line(
        &mut self,
        from: Point,
        to: Point,
        color: Rgb,
        thickness: u32,
    ) -> Result<(), SurfaceError>;

    /// Remove all drawn primitives.
    fn clear(&mut self) -> Result<(), SurfaceError>;

    /// Set whole-surface opacity. Implementations clamp to `[0.0, 1.0]`.
    fn set_opacity(&mut self, alpha: f64) -> Result<(), SurfaceError>;
}

/// Creates surfaces and reports screen geometry.
pub trait SurfaceProvider: Send + Sync {
    /// Full-screen dimensions new surfaces will have.
    fn screen_dimensions(&self) -> (u32, u32);

    /// Open a new full-screen surface.
    fn create(&self) -> Result<Box<dyn Surface>, SurfaceError>;
}
