//! Automated click loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use reticle_core::{AutoClickConfig, ClickInjector, MouseButton};

struct ClickTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Periodic synthetic clicks: click, sleep the configured delay, repeat.
///
/// Lifecycle is independent of the crosshair session. The loop snapshots the
/// config at the top of each iteration, so delay and button edits apply on
/// the next click, never mid-sleep.
pub struct AutoClicker {
    config: Arc<Mutex<AutoClickConfig>>,
    enabled: Arc<AtomicBool>,
    injector: Arc<dyn ClickInjector>,
    task: AsyncMutex<Option<ClickTask>>,
}

impl AutoClicker {
    pub fn new(injector: Arc<dyn ClickInjector>) -> Self {
        Self {
            config: Arc::new(Mutex::new(AutoClickConfig::default())),
            enabled: Arc::new(AtomicBool::new(false)),
            injector,
            task: AsyncMutex::new(None),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Current config snapshot (for status display).
    pub fn config(&self) -> AutoClickConfig {
        self.config.lock().map(|c| *c).unwrap_or_default()
    }

    pub fn set_delay_seconds(&self, seconds: f64) {
        if let Ok(mut config) = self.config.lock() {
            config.set_delay_seconds(seconds);
            debug!(delay_seconds = config.delay_seconds, "click delay updated");
        }
    }

    pub fn set_button(&self, button: MouseButton) {
        if let Ok(mut config) = self.config.lock() {
            config.set_button(button);
            debug!(button = button.name(), "click button updated");
        }
    }

    /// Flip the clicker. Returns the new enabled state.
    pub async fn toggle(&self) -> bool {
        let mut task = self.task.lock().await;
        if let Some(task) = task.take() {
            self.enabled.store(false, Ordering::SeqCst);
            task.token.cancel();
            let _ = task.handle.await;
            info!("auto clicker stopped");
            false
        } else {
            self.enabled.store(true, Ordering::SeqCst);
            let token = CancellationToken::new();
            let handle = spawn_click_loop(
                Arc::clone(&self.enabled),
                Arc::clone(&self.config),
                Arc::clone(&self.injector),
                token.clone(),
            );
            *task = Some(ClickTask { token, handle });
            info!("auto clicker started");
            true
        }
    }

    /// Stop if enabled; no-op otherwise. Used by shutdown.
    pub async fn stop(&self) {
        let mut task = self.task.lock().await;
        if let Some(task) = task.take() {
            self.enabled.store(false, Ordering::SeqCst);
            task.token.cancel();
            let _ = task.handle.await;
            info!("auto clicker stopped");
        }
    }
}

fn spawn_click_loop(
    enabled: Arc<AtomicBool>,
    config: Arc<Mutex<AutoClickConfig>>,
    injector: Arc<dyn ClickInjector>,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("click loop running");
        loop {
            if !enabled.load(Ordering::SeqCst) {
                break;
            }
            let Ok(snapshot) = config.lock().map(|c| *c) else {
                break;
            };
            if let Err(e) = injector.click(snapshot.button) {
                debug!(error = %e, "click failed");
            }
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(snapshot.delay()) => {}
            }
        }
        debug!("click loop stopped");
    })
}
