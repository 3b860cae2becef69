//! Global hotkey dispatcher.
//!
//! Polls the two fixed keys (F8 crosshair, F9 auto-clicker) and converts the
//! level-triggered "currently pressed" samples into edge-triggered toggles
//! with a per-key cooldown window. Poll failures read as "not pressed" and
//! only slow the loop down to the retry backoff; the dispatcher itself stops
//! only through its cancellation token.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use reticle_core::{AUTO_CLICKER_HOTKEY, CROSSHAIR_HOTKEY, KeyPoller};

use crate::controller::Controller;

/// Timing knobs for the dispatcher. The key bindings themselves are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyOptions {
    /// How often key state is sampled.
    pub poll_interval: Duration,
    /// Per-key window during which a held key will not re-fire its toggle.
    pub cooldown: Duration,
    /// Pause after a failed poll before sampling again.
    pub retry_backoff: Duration,
}

impl Default for HotkeyOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            cooldown: Duration::from_millis(500),
            retry_backoff: Duration::from_millis(100),
        }
    }
}

/// Per-key debounce: fires on a pressed sample unless the key fired within
/// the cooldown window. Releasing early does not shorten the window, so one
/// human press lands exactly one toggle while a long hold re-fires.
#[derive(Debug)]
struct KeyCooldown {
    cooldown: Duration,
    last_fired: Option<Instant>,
}

impl KeyCooldown {
    fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_fired: None,
        }
    }

    fn should_fire(&mut self, pressed: bool, now: Instant) -> bool {
        if !pressed {
            return false;
        }
        let ready = self
            .last_fired
            .map_or(true, |last| now.duration_since(last) >= self.cooldown);
        if ready {
            self.last_fired = Some(now);
        }
        ready
    }
}

/// Start the dispatcher task.
pub(crate) fn spawn_dispatcher(
    poller: Arc<dyn KeyPoller>,
    controller: Controller,
    options: HotkeyOptions,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            crosshair = CROSSHAIR_HOTKEY,
            clicker = AUTO_CLICKER_HOTKEY,
            "hotkey dispatcher running"
        );
        let mut crosshair_key = KeyCooldown::new(options.cooldown);
        let mut clicker_key = KeyCooldown::new(options.cooldown);
        loop {
            let mut poll_failed = false;
            let now = Instant::now();

            if crosshair_key.should_fire(sample(&*poller, CROSSHAIR_HOTKEY, &mut poll_failed), now)
            {
                info!(key = CROSSHAIR_HOTKEY, "hotkey fired");
                if let Err(e) = controller.toggle_crosshair().await {
                    warn!(error = %e, "crosshair toggle failed");
                }
            }
            if clicker_key.should_fire(sample(&*poller, AUTO_CLICKER_HOTKEY, &mut poll_failed), now)
            {
                info!(key = AUTO_CLICKER_HOTKEY, "hotkey fired");
                controller.toggle_auto_clicker().await;
            }

            let pause = if poll_failed {
                options.retry_backoff
            } else {
                options.poll_interval
            };
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }
        debug!("hotkey dispatcher stopped");
    })
}

/// One poll, with failure read as "not pressed".
fn sample(poller: &dyn KeyPoller, key: &str, poll_failed: &mut bool) -> bool {
    match poller.is_pressed(key) {
        Ok(pressed) => pressed,
        Err(e) => {
            *poll_failed = true;
            debug!(key, error = %e, "key poll failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{LoggingClicker, SimulatedKeys};
    use reticle_overlay::{HeadlessSurfaceProvider, Journal, SurfaceEvent, SurfaceProvider};

    #[test]
    fn cooldown_fires_once_per_window() {
        let mut key = KeyCooldown::new(Duration::from_millis(500));
        let start = Instant::now();
        assert!(key.should_fire(true, start));
        assert!(!key.should_fire(true, start + Duration::from_millis(100)));
        // Releasing does not reset the window.
        assert!(!key.should_fire(false, start + Duration::from_millis(200)));
        assert!(!key.should_fire(true, start + Duration::from_millis(300)));
        assert!(key.should_fire(true, start + Duration::from_millis(500)));
    }

    #[test]
    fn cooldown_ignores_released_keys() {
        let mut key = KeyCooldown::new(Duration::from_millis(500));
        assert!(!key.should_fire(false, Instant::now()));
        assert!(key.last_fired.is_none());
    }

    struct Rig {
        controller: Controller,
        keys: SimulatedKeys,
        journal: Arc<Journal>,
    }

    async fn rig() -> Rig {
        let provider = Arc::new(HeadlessSurfaceProvider::new(800, 600));
        let journal = provider.journal();
        let controller = Controller::new(
            provider as Arc<dyn SurfaceProvider>,
            Arc::new(LoggingClicker),
        );
        let keys = SimulatedKeys::new();
        controller
            .start_hotkeys(Arc::new(keys.clone()), HotkeyOptions::default())
            .await;
        Rig {
            controller,
            keys,
            journal,
        }
    }

    fn created(journal: &Journal) -> usize {
        journal
            .events()
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Created { .. }))
            .count()
    }

    fn destroyed(journal: &Journal) -> usize {
        journal
            .events()
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Destroyed { .. }))
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn short_press_toggles_exactly_once() {
        let rig = rig().await;
        rig.keys.press(CROSSHAIR_HOTKEY, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(created(&rig.journal), 1);
        assert_eq!(destroyed(&rig.journal), 0);
        assert!(rig.controller.status().crosshair_running);
        rig.controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn long_hold_refires_after_cooldown() {
        let rig = rig().await;
        rig.keys.press(CROSSHAIR_HOTKEY, Duration::from_millis(700));
        tokio::time::sleep(Duration::from_secs(1)).await;

        // Fired at t=0 (on) and t=0.5s (off), then released before the next
        // window opened.
        assert_eq!(created(&rig.journal), 1);
        assert_eq!(destroyed(&rig.journal), 1);
        assert!(!rig.controller.status().crosshair_running);
        rig.controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn poll_failures_are_swallowed_until_recovery() {
        let rig = rig().await;
        rig.keys.set_failing(true);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(created(&rig.journal), 0);

        rig.keys.set_failing(false);
        rig.keys.press(CROSSHAIR_HOTKEY, Duration::from_millis(150));
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(created(&rig.journal), 1);
        assert!(rig.controller.status().crosshair_running);
        rig.controller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn keys_cool_down_independently() {
        let rig = rig().await;
        rig.keys.press(CROSSHAIR_HOTKEY, Duration::from_millis(10));
        rig.keys.press(AUTO_CLICKER_HOTKEY, Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(200)).await;

        let status = rig.controller.status();
        assert!(status.crosshair_running);
        assert!(status.clicker_enabled);
        assert_eq!(created(&rig.journal), 1);
        rig.controller.shutdown().await;
    }
}
