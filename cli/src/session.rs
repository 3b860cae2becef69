//! Crosshair session lifecycle.
//!
//! The session owns the overlay surface through a dedicated task: the surface
//! is created inside that task, lives on its stack, and is dropped when the
//! task exits. Nothing else touches it directly; edits and the animation
//! tasks reach it through a command channel, so a send after teardown fails
//! instead of dereferencing a dead surface. Creation success is confirmed
//! back to `toggle` over a oneshot before the session is reported running.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Mutex as AsyncMutex;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use reticle_core::{CrosshairConfig, SessionFlags};
use reticle_overlay::{Surface, SurfaceError, SurfaceProvider, draw_crosshair};

use crate::animation::{spawn_color_cycle, spawn_fade};

/// How often the surface task re-checks the running flag between commands.
const LIFECYCLE_POLL: Duration = Duration::from_millis(100);

/// Command buffer depth. Senders drop redraws on a full buffer rather than
/// wait; the next tick repaints anyway.
const COMMAND_BUFFER: usize = 16;

/// What the surface task can be asked to do with its surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum SurfaceCommand {
    Redraw,
    SetOpacity(f64),
}

/// A running session: the surface task plus its animation tasks, all
/// cancelled through one token family.
struct SessionTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
    commands: mpsc::Sender<SurfaceCommand>,
    color: Option<JoinHandle<()>>,
    fade: Option<JoinHandle<()>>,
}

#[derive(Default)]
struct SessionInner {
    task: Option<SessionTask>,
}

/// Owner of the crosshair's visibility lifecycle and visual parameters.
pub struct CrosshairSession {
    config: Arc<Mutex<CrosshairConfig>>,
    flags: Arc<SessionFlags>,
    provider: Arc<dyn SurfaceProvider>,
    // All start/stop transitions serialize through this lock, so rapid
    // toggles cannot overlap two surfaces.
    inner: AsyncMutex<SessionInner>,
}

impl CrosshairSession {
    pub fn new(
        config: Arc<Mutex<CrosshairConfig>>,
        flags: Arc<SessionFlags>,
        provider: Arc<dyn SurfaceProvider>,
    ) -> Self {
        Self {
            config,
            flags,
            provider,
            inner: AsyncMutex::new(SessionInner::default()),
        }
    }

    pub fn is_running(&self) -> bool {
        self.flags.running()
    }

    /// Flip the session. Returns the new running state.
    ///
    /// Starting acquires a surface, paints it once, and launches whichever
    /// animation tasks are enabled. Stopping exits the animation tasks, then
    /// the surface task (which drops the surface), and joins them all.
    pub async fn toggle(&self) -> Result<bool, SurfaceError> {
        let mut inner = self.inner.lock().await;
        if inner.task.is_some() {
            self.stop_locked(&mut inner).await;
            Ok(false)
        } else {
            self.start_locked(&mut inner).await?;
            Ok(true)
        }
    }

    /// Stop if running; no-op otherwise. Used by shutdown.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        self.stop_locked(&mut inner).await;
    }

    /// Enable or disable the color cycle. Enabling while running starts the
    /// task immediately; enabling while stopped only arms the flag.
    pub async fn set_rgb_cycle(&self, enabled: bool) {
        self.flags.set_rgb_cycle(enabled);
        debug!(enabled, "rgb cycle updated");
        let mut inner = self.inner.lock().await;
        let Some(task) = inner.task.as_mut() else {
            return;
        };
        if enabled {
            if stale(&task.color) {
                task.color = Some(spawn_color_cycle(
                    Arc::clone(&self.flags),
                    Arc::clone(&self.config),
                    task.commands.clone(),
                    task.token.child_token(),
                ));
            }
        } else {
            join_driver(&mut task.color).await;
        }
    }

    /// Enable or disable the fade. Same start/arm semantics as
    /// [`set_rgb_cycle`]; on disable the task restores full opacity on its
    /// way out.
    pub async fn set_fade(&self, enabled: bool) {
        self.flags.set_fade(enabled);
        debug!(enabled, "fade updated");
        let mut inner = self.inner.lock().await;
        let Some(task) = inner.task.as_mut() else {
            return;
        };
        if enabled {
            if stale(&task.fade) {
                task.fade = Some(spawn_fade(
                    Arc::clone(&self.flags),
                    task.commands.clone(),
                    task.token.child_token(),
                ));
            }
        } else {
            join_driver(&mut task.fade).await;
        }
    }

    /// Ask the surface task to repaint. Silently does nothing when the
    /// session is stopped.
    pub async fn request_redraw(&self) {
        let inner = self.inner.lock().await;
        if let Some(task) = inner.task.as_ref() {
            let _ = task.commands.try_send(SurfaceCommand::Redraw);
        }
    }

    async fn start_locked(&self, inner: &mut SessionInner) -> Result<(), SurfaceError> {
        let token = CancellationToken::new();
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (ready_tx, ready_rx) = oneshot::channel();

        let provider = Arc::clone(&self.provider);
        let config = Arc::clone(&self.config);
        let flags = Arc::clone(&self.flags);
        let task_token = token.clone();
        let handle = tokio::spawn(async move {
            // Created in here so this task's scope is the surface's lifetime.
            let mut surface = match provider.create() {
                Ok(surface) => surface,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            redraw(surface.as_mut(), &config);
            let _ = ready_tx.send(Ok(()));
            run_surface(surface, config, flags, command_rx, task_token).await;
        });

        match ready_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                warn!(error = %e, "failed to create overlay surface");
                let _ = handle.await;
                return Err(e);
            }
            Err(_) => {
                let _ = handle.await;
                return Err(SurfaceError::Create(
                    "surface task exited before confirming".into(),
                ));
            }
        }

        self.flags.set_running(true);
        let mut task = SessionTask {
            token,
            handle,
            commands,
            color: None,
            fade: None,
        };
        if self.flags.rgb_cycle_enabled() {
            task.color = Some(spawn_color_cycle(
                Arc::clone(&self.flags),
                Arc::clone(&self.config),
                task.commands.clone(),
                task.token.child_token(),
            ));
        }
        if self.flags.fade_enabled() {
            task.fade = Some(spawn_fade(
                Arc::clone(&self.flags),
                task.commands.clone(),
                task.token.child_token(),
            ));
        }
        inner.task = Some(task);
        info!("crosshair session started");
        Ok(())
    }

    async fn stop_locked(&self, inner: &mut SessionInner) {
        let Some(mut task) = inner.task.take() else {
            return;
        };
        // Flag first so every loop sees not-running, then cancel to cut the
        // sleeps short. Animation tasks are joined before the surface task so
        // the surface outlives its last writer.
        self.flags.set_running(false);
        task.token.cancel();
        join_driver(&mut task.color).await;
        join_driver(&mut task.fade).await;
        let _ = task.handle.await;
        info!("crosshair session stopped");
    }
}

/// A driver slot that can be (re)started: empty, or its task already exited.
fn stale(slot: &Option<JoinHandle<()>>) -> bool {
    slot.as_ref().map_or(true, |handle| handle.is_finished())
}

async fn join_driver(slot: &mut Option<JoinHandle<()>>) {
    if let Some(handle) = slot.take() {
        let _ = handle.await;
    }
}

/// Body of the surface task. Applies commands until cancelled, the channel
/// closes, or the running flag drops; the surface dies with this scope.
async fn run_surface(
    mut surface: Box<dyn Surface>,
    config: Arc<Mutex<CrosshairConfig>>,
    flags: Arc<SessionFlags>,
    mut commands: mpsc::Receiver<SurfaceCommand>,
    token: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            command = commands.recv() => match command {
                Some(SurfaceCommand::Redraw) => redraw(surface.as_mut(), &config),
                Some(SurfaceCommand::SetOpacity(alpha)) => {
                    if let Err(e) = surface.set_opacity(alpha) {
                        debug!(error = %e, "opacity update failed");
                    }
                }
                None => break,
            },
            _ = tokio::time::sleep(LIFECYCLE_POLL) => {
                if !flags.running() {
                    break;
                }
            }
        }
    }
}

fn redraw(surface: &mut dyn Surface, config: &Mutex<CrosshairConfig>) {
    let Ok(snapshot) = config.lock().map(|c| *c) else {
        return;
    };
    if let Err(e) = draw_crosshair(surface, &snapshot) {
        debug!(error = %e, "redraw failed");
    }
}
