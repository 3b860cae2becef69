//! Application facade.
//!
//! `Controller` owns the crosshair session, the auto-clicker, and the hotkey
//! dispatcher, and is the only surface the REPL (and the dispatcher itself)
//! talks to. It is cheap to clone; all clones share the same state.

use std::fmt;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use reticle_core::{
    AutoClickConfig, ClickInjector, CrosshairConfig, KeyPoller, MouseButton, Rgb, SessionFlags,
};
use reticle_overlay::{SurfaceError, SurfaceProvider};

use crate::clicker::AutoClicker;
use crate::hotkeys::{HotkeyOptions, spawn_dispatcher};
use crate::session::CrosshairSession;

/// Point-in-time snapshot of everything the UI can show.
#[derive(Debug, Clone, Copy)]
pub struct Status {
    pub crosshair_running: bool,
    pub rgb_cycle_enabled: bool,
    pub fade_enabled: bool,
    pub crosshair: CrosshairConfig,
    pub clicker_enabled: bool,
    pub clicker: AutoClickConfig,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "crosshair: {} (size {}, thickness {}, color {})",
            on_off(self.crosshair_running),
            self.crosshair.size,
            self.crosshair.thickness,
            self.crosshair.color,
        )?;
        writeln!(
            f,
            "rgb cycle: {}, fade: {}",
            on_off(self.rgb_cycle_enabled),
            on_off(self.fade_enabled),
        )?;
        write!(
            f,
            "auto-clicker: {} ({} button every {}s)",
            on_off(self.clicker_enabled),
            self.clicker.button.name(),
            self.clicker.delay_seconds,
        )
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

struct DispatcherTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

#[derive(Clone)]
pub struct Controller {
    config: Arc<Mutex<CrosshairConfig>>,
    flags: Arc<SessionFlags>,
    session: Arc<CrosshairSession>,
    clicker: Arc<AutoClicker>,
    hotkeys: Arc<AsyncMutex<Option<DispatcherTask>>>,
}

impl Controller {
    pub fn new(provider: Arc<dyn SurfaceProvider>, injector: Arc<dyn ClickInjector>) -> Self {
        let config = Arc::new(Mutex::new(CrosshairConfig::default()));
        let flags = Arc::new(SessionFlags::new());
        let session = Arc::new(CrosshairSession::new(
            Arc::clone(&config),
            Arc::clone(&flags),
            provider,
        ));
        Self {
            config,
            flags,
            session,
            clicker: Arc::new(AutoClicker::new(injector)),
            hotkeys: Arc::new(AsyncMutex::new(None)),
        }
    }

    // ────────────────────────────────────────────────────────────────
    // Crosshair
    // ────────────────────────────────────────────────────────────────

    /// Show the crosshair if hidden, hide it if shown. Returns the new state.
    pub async fn toggle_crosshair(&self) -> Result<bool, SurfaceError> {
        self.session.toggle().await
    }

    pub async fn set_size(&self, size: u32) {
        if let Ok(mut config) = self.config.lock() {
            config.set_size(size);
            debug!(size = config.size, "crosshair size updated");
        }
        self.session.request_redraw().await;
    }

    pub async fn set_thickness(&self, thickness: u32) {
        if let Ok(mut config) = self.config.lock() {
            config.set_thickness(thickness);
            debug!(thickness = config.thickness, "crosshair thickness updated");
        }
        self.session.request_redraw().await;
    }

    pub async fn set_color(&self, color: Rgb) {
        if let Ok(mut config) = self.config.lock() {
            config.set_color(color);
            debug!(color = %color, "crosshair color updated");
        }
        self.session.request_redraw().await;
    }

    pub async fn set_rgb_cycle(&self, enabled: bool) {
        self.session.set_rgb_cycle(enabled).await;
    }

    pub async fn set_fade(&self, enabled: bool) {
        self.session.set_fade(enabled).await;
    }

    // ────────────────────────────────────────────────────────────────
    // Auto-clicker
    // ────────────────────────────────────────────────────────────────

    /// Start the clicker if stopped, stop it if running. Returns the new state.
    pub async fn toggle_auto_clicker(&self) -> bool {
        self.clicker.toggle().await
    }

    pub fn set_delay(&self, seconds: f64) {
        self.clicker.set_delay_seconds(seconds);
    }

    pub fn set_button(&self, button: MouseButton) {
        self.clicker.set_button(button);
    }

    // ────────────────────────────────────────────────────────────────
    // Hotkeys and lifecycle
    // ────────────────────────────────────────────────────────────────

    /// Start polling for the global hotkeys. No-op if already polling.
    pub async fn start_hotkeys(&self, poller: Arc<dyn KeyPoller>, options: HotkeyOptions) {
        let mut slot = self.hotkeys.lock().await;
        if slot.is_some() {
            warn!("hotkey dispatcher already running");
            return;
        }
        let token = CancellationToken::new();
        let handle = spawn_dispatcher(poller, self.clone(), options, token.clone());
        *slot = Some(DispatcherTask { token, handle });
    }

    pub fn status(&self) -> Status {
        let crosshair = self
            .config
            .lock()
            .map(|c| *c)
            .unwrap_or_else(|poisoned| *poisoned.into_inner());
        Status {
            crosshair_running: self.flags.running(),
            rgb_cycle_enabled: self.flags.rgb_cycle_enabled(),
            fade_enabled: self.flags.fade_enabled(),
            crosshair,
            clicker_enabled: self.clicker.is_enabled(),
            clicker: self.clicker.config(),
        }
    }

    /// Tear everything down: hotkey dispatcher first so nothing re-toggles,
    /// then the crosshair session and the clicker. Idempotent.
    pub async fn shutdown(&self) {
        if let Some(task) = self.hotkeys.lock().await.take() {
            task.token.cancel();
            if let Err(e) = task.handle.await {
                warn!(error = %e, "hotkey dispatcher panicked");
            }
        }
        self.session.stop().await;
        self.clicker.stop().await;
        info!("controller shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{LoggingClicker, SimulatedKeys};
    use reticle_overlay::{HeadlessSurfaceProvider, Journal};
    use std::time::Duration;

    fn fixture() -> (Controller, Arc<Journal>) {
        let provider = Arc::new(HeadlessSurfaceProvider::new(1920, 1080));
        let journal = provider.journal();
        let controller = Controller::new(provider, Arc::new(LoggingClicker));
        (controller, journal)
    }

    #[tokio::test(start_paused = true)]
    async fn status_tracks_configuration_edits() {
        let (controller, _journal) = fixture();

        controller.set_size(40).await;
        controller.set_thickness(7).await;
        controller.set_color("#00ff88".parse().unwrap()).await;
        controller.set_delay(0.25);
        controller.set_button(MouseButton::Right);

        let status = controller.status();
        assert!(!status.crosshair_running);
        assert_eq!(status.crosshair.size, 40);
        assert_eq!(status.crosshair.thickness, 7);
        assert_eq!(status.crosshair.color.to_string(), "#00ff88");
        assert_eq!(status.clicker.delay_seconds, 0.25);
        assert_eq!(status.clicker.button, MouseButton::Right);
        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_twice_leaves_no_surface_behind() {
        let (controller, journal) = fixture();

        assert!(controller.toggle_crosshair().await.unwrap());
        assert_eq!(journal.live_surfaces(), 1);
        assert!(!controller.toggle_crosshair().await.unwrap());
        assert_eq!(journal.live_surfaces(), 0);
        controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_every_component() {
        let (controller, journal) = fixture();
        let keys = SimulatedKeys::new();
        controller
            .start_hotkeys(Arc::new(keys.clone()), HotkeyOptions::default())
            .await;
        controller.toggle_crosshair().await.unwrap();
        controller.set_rgb_cycle(true).await;
        controller.toggle_auto_clicker().await;
        tokio::time::sleep(Duration::from_millis(100)).await;

        controller.shutdown().await;

        let status = controller.status();
        assert!(!status.crosshair_running);
        assert!(!status.clicker_enabled);
        assert_eq!(journal.live_surfaces(), 0);

        // Hotkeys are gone too: a press after shutdown changes nothing.
        keys.press(reticle_core::CROSSHAIR_HOTKEY, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!controller.status().crosshair_running);
    }

    #[tokio::test(start_paused = true)]
    async fn status_renders_on_one_screen() {
        let (controller, _journal) = fixture();
        let rendered = controller.status().to_string();
        assert!(rendered.contains("crosshair: off"));
        assert!(rendered.contains("size 20"));
        assert!(rendered.contains("#ff0000"));
        assert!(rendered.contains("left button every 0.1s"));
        controller.shutdown().await;
    }
}
