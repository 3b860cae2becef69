//! Headless surface backend.
//!
//! Draws nothing; instead records every operation into a shared journal.
//! The console binary uses it so the tool runs without a compositor, and the
//! concurrency tests use it as their observation point: the journal is the
//! ground truth for "what happened to the surface, in what order."

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, trace};

use reticle_core::Rgb;

use crate::surface::{Point, Surface, SurfaceError, SurfaceProvider};

/// One recorded surface operation. `id` distinguishes surfaces across
/// create/destroy cycles.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Created {
        id: u64,
    },
    Line {
        id: u64,
        from: Point,
        to: Point,
        color: Rgb,
        thickness: u32,
    },
    Cleared {
        id: u64,
    },
    Opacity {
        id: u64,
        alpha: f64,
    },
    Destroyed {
        id: u64,
    },
}

impl SurfaceEvent {
    /// The surface this event belongs to.
    pub fn surface_id(&self) -> u64 {
        match self {
            SurfaceEvent::Created { id }
            | SurfaceEvent::Line { id, .. }
            | SurfaceEvent::Cleared { id }
            | SurfaceEvent::Opacity { id, .. }
            | SurfaceEvent::Destroyed { id } => *id,
        }
    }
}

#[derive(Debug, Default)]
struct JournalInner {
    events: Vec<SurfaceEvent>,
    live: u32,
    max_live: u32,
    next_id: u64,
}

/// Shared, append-only record of surface activity.
#[derive(Debug, Default)]
pub struct Journal {
    inner: Mutex<JournalInner>,
}

impl Journal {
    /// Snapshot of all events so far, in order.
    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.inner.lock().map(|i| i.events.clone()).unwrap_or_default()
    }

    /// Surfaces currently open.
    pub fn live_surfaces(&self) -> u32 {
        self.inner.lock().map(|i| i.live).unwrap_or(0)
    }

    /// Most surfaces ever open at once.
    pub fn max_live_surfaces(&self) -> u32 {
        self.inner.lock().map(|i| i.max_live).unwrap_or(0)
    }

    /// Opacity events for one surface, in order.
    pub fn opacities(&self, surface_id: u64) -> Vec<f64> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Opacity { id, alpha } if *id == surface_id => Some(*alpha),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: SurfaceEvent) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.events.push(event);
        }
    }

    fn open_surface(&self) -> u64 {
        let Ok(mut inner) = self.inner.lock() else {
            return 0;
        };
        let id = inner.next_id;
        inner.next_id += 1;
        inner.live += 1;
        inner.max_live = inner.max_live.max(inner.live);
        inner.events.push(SurfaceEvent::Created { id });
        id
    }

    fn close_surface(&self, id: u64) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.live = inner.live.saturating_sub(1);
            inner.events.push(SurfaceEvent::Destroyed { id });
        }
    }
}

/// Provider handing out [`HeadlessSurface`]s that all feed one [`Journal`].
#[derive(Debug)]
pub struct HeadlessSurfaceProvider {
    width: u32,
    height: u32,
    journal: Arc<Journal>,
    fail_creates: AtomicBool,
}

impl HeadlessSurfaceProvider {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            journal: Arc::new(Journal::default()),
            fail_creates: AtomicBool::new(false),
        }
    }

    /// The journal every surface from this provider records into.
    pub fn journal(&self) -> Arc<Journal> {
        Arc::clone(&self.journal)
    }

    /// While set, `create` fails. Exercises the creation-failure path.
    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    /// Typed variant of [`SurfaceProvider::create`].
    pub fn create_surface(&self) -> Result<HeadlessSurface, SurfaceError> {
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(SurfaceError::Create("creation disabled".into()));
        }
        let id = self.journal.open_surface();
        debug!(id, width = self.width, height = self.height, "headless surface opened");
        Ok(HeadlessSurface {
            id,
            width: self.width,
            height: self.height,
            journal: Arc::clone(&self.journal),
        })
    }
}

impl SurfaceProvider for HeadlessSurfaceProvider {
    fn screen_dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn create(&self) -> Result<Box<dyn Surface>, SurfaceError> {
        Ok(Box::new(self.create_surface()?))
    }
}

/// A journaling surface. Dropping it records destruction.
#[derive(Debug)]
pub struct HeadlessSurface {
    id: u64,
    width: u32,
    height: u32,
    journal: Arc<Journal>,
}

impl HeadlessSurface {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Surface for HeadlessSurface {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_line(
        &mut self,
        from: Point,
        to: Point,
        color: Rgb,
        thickness: u32,
    ) -> Result<(), SurfaceError> {
        trace!(id = self.id, ?from, ?to, %color, thickness, "line");
        self.journal.record(SurfaceEvent::Line {
            id: self.id,
            from,
            to,
            color,
            thickness,
        });
        Ok(())
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        trace!(id = self.id, "clear");
        self.journal.record(SurfaceEvent::Cleared { id: self.id });
        Ok(())
    }

    fn set_opacity(&mut self, alpha: f64) -> Result<(), SurfaceError> {
        let alpha = alpha.clamp(0.0, 1.0);
        trace!(id = self.id, alpha, "opacity");
        self.journal.record(SurfaceEvent::Opacity { id: self.id, alpha });
        Ok(())
    }
}

impl Drop for HeadlessSurface {
    fn drop(&mut self) {
        debug!(id = self.id, "headless surface closed");
        self.journal.close_surface(self.id);
    }
}
