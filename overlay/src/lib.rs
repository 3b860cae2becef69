//! Render surface layer for the reticle overlay tool
//!
//! Defines the surface contract the session machinery draws through, the
//! crosshair geometry itself, and a headless journaling backend. Platform
//! backends (a real click-through window) live with the embedding
//! application and implement the same two traits:
//!
//! ```text
//!   session task ──► Surface / SurfaceProvider ──► platform backend
//!                           │
//!                           └──► HeadlessSurface (console + tests)
//! ```

pub mod crosshair;
pub mod headless;
pub mod surface;

pub use crosshair::{Segment, crosshair_segments, draw_crosshair};
pub use headless::{HeadlessSurface, HeadlessSurfaceProvider, Journal, SurfaceEvent};
pub use surface::{Point, Surface, SurfaceError, SurfaceProvider};
