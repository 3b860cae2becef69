//! Animation tasks: color cycle and fade.
//!
//! Each is a run loop that re-reads its governing flags at the top of every
//! iteration and races its sleep against a cancellation token, so it exits
//! within one tick of being disabled, of the session stopping, or of an
//! explicit cancel. The surface is reached only through the session's
//! command channel; a closed channel means the surface is gone and the task
//! winds down quietly.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use reticle_core::{CrosshairConfig, FadeWave, RgbSweep, SessionFlags};

use crate::session::SurfaceCommand;

/// Sleep between color-cycle steps.
const COLOR_CYCLE_TICK: Duration = Duration::from_millis(20);
/// Sleep between fade ticks.
const FADE_TICK: Duration = Duration::from_millis(50);
/// Opacity restored when the fade is switched off mid-session.
const FULL_OPACITY: f64 = 1.0;

/// Push a command toward the surface task. `false` means the channel is
/// closed (surface gone); a full buffer just drops the command.
fn forward(commands: &mpsc::Sender<SurfaceCommand>, command: SurfaceCommand) -> bool {
    match commands.try_send(command) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => true,
        Err(TrySendError::Closed(_)) => false,
    }
}

/// Start the color cycle task: step the sweep, write the color into the
/// shared config, request a repaint, sleep 20ms, repeat.
pub(crate) fn spawn_color_cycle(
    flags: Arc<SessionFlags>,
    config: Arc<Mutex<CrosshairConfig>>,
    commands: mpsc::Sender<SurfaceCommand>,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("color cycle running");
        let mut sweep = RgbSweep::new();
        loop {
            if !flags.running() || !flags.rgb_cycle_enabled() {
                break;
            }
            let color = sweep.advance();
            if let Ok(mut config) = config.lock() {
                config.set_color(color);
            }
            if !forward(&commands, SurfaceCommand::Redraw) {
                break;
            }
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(COLOR_CYCLE_TICK) => {}
            }
        }
        debug!("color cycle stopped");
    })
}

/// Start the fade task: advance the triangular wave and apply its opacity
/// every 50ms. When the fade flag drops while the session is still up, the
/// exit path restores full opacity so the crosshair is not left dimmed.
pub(crate) fn spawn_fade(
    flags: Arc<SessionFlags>,
    commands: mpsc::Sender<SurfaceCommand>,
    token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("fade running");
        let mut wave = FadeWave::new();
        loop {
            if !flags.running() {
                break;
            }
            if !flags.fade_enabled() {
                let _ = commands.try_send(SurfaceCommand::SetOpacity(FULL_OPACITY));
                break;
            }
            let alpha = wave.tick();
            if !forward(&commands, SurfaceCommand::SetOpacity(alpha)) {
                break;
            }
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(FADE_TICK) => {}
            }
        }
        debug!("fade stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CrosshairSession;
    use reticle_core::Rgb;
    use reticle_overlay::{HeadlessSurfaceProvider, Journal, SurfaceEvent, SurfaceProvider};

    struct Rig {
        session: CrosshairSession,
        config: Arc<Mutex<CrosshairConfig>>,
        journal: Arc<Journal>,
    }

    fn rig() -> Rig {
        let provider = Arc::new(HeadlessSurfaceProvider::new(800, 600));
        let journal = provider.journal();
        let config = Arc::new(Mutex::new(CrosshairConfig::default()));
        let session = CrosshairSession::new(
            Arc::clone(&config),
            Arc::new(SessionFlags::new()),
            provider as Arc<dyn SurfaceProvider>,
        );
        Rig {
            session,
            config,
            journal,
        }
    }

    fn line_count(journal: &Journal) -> usize {
        journal
            .events()
            .iter()
            .filter(|e| matches!(e, SurfaceEvent::Line { .. }))
            .count()
    }

    fn first_surface_id(journal: &Journal) -> u64 {
        journal
            .events()
            .iter()
            .find_map(|e| match e {
                SurfaceEvent::Created { id } => Some(*id),
                _ => None,
            })
            .expect("no surface created")
    }

    #[tokio::test(start_paused = true)]
    async fn color_cycle_repaints_with_quantized_colors() {
        let rig = rig();
        rig.session.set_rgb_cycle(true).await;
        rig.session.toggle().await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(line_count(&rig.journal) > 2);
        let color = rig.config.lock().unwrap().color;
        assert_ne!(color, Rgb::new(255, 0, 0));
        for channel in [color.r, color.g, color.b] {
            assert_eq!(channel % 5, 0);
        }
        rig.session.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn color_cycle_halts_once_disabled() {
        let rig = rig();
        rig.session.set_rgb_cycle(true).await;
        rig.session.toggle().await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        // Disabling joins the task, so the paint count is final afterwards.
        rig.session.set_rgb_cycle(false).await;
        let painted = line_count(&rig.journal);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(line_count(&rig.journal), painted);

        // Color keeps whatever the sweep last wrote.
        assert_ne!(rig.config.lock().unwrap().color, Rgb::new(255, 0, 0));
        rig.session.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn session_stop_ends_cycle_and_surface_together() {
        let rig = rig();
        rig.session.set_rgb_cycle(true).await;
        rig.session.toggle().await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;

        rig.session.toggle().await.unwrap();
        let events = rig.journal.events();
        assert!(matches!(events.last(), Some(SurfaceEvent::Destroyed { .. })));
        assert_eq!(rig.journal.live_surfaces(), 0);

        // Nothing painted after teardown.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(rig.journal.events().len(), events.len());
    }

    #[tokio::test(start_paused = true)]
    async fn fade_walks_opacity_downward() {
        let rig = rig();
        rig.session.set_fade(true).await;
        rig.session.toggle().await.unwrap();

        tokio::time::sleep(Duration::from_millis(160)).await;

        let id = first_surface_id(&rig.journal);
        let opacities = rig.journal.opacities(id);
        assert!(opacities.len() >= 3);
        assert_eq!(&opacities[..3], &[0.98, 0.96, 0.94]);
        rig.session.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn fade_disable_restores_full_opacity() {
        let rig = rig();
        rig.session.set_fade(true).await;
        rig.session.toggle().await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        rig.session.set_fade(false).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let id = first_surface_id(&rig.journal);
        let opacities = rig.journal.opacities(id);
        assert_eq!(opacities.last(), Some(&1.0));
        rig.session.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn enabled_flag_survives_session_restart() {
        let rig = rig();
        rig.session.set_fade(true).await;
        rig.session.toggle().await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        rig.session.toggle().await.unwrap();

        // Fade stayed armed: a fresh session starts a fresh wave.
        rig.session.toggle().await.unwrap();
        tokio::time::sleep(Duration::from_millis(60)).await;
        let events = rig.journal.events();
        let second_id = events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Created { id } => Some(*id),
                _ => None,
            })
            .nth(1)
            .expect("no second surface");
        let opacities = rig.journal.opacities(second_id);
        assert!(!opacities.is_empty());
        assert_eq!(opacities[0], 0.98);
        rig.session.stop().await;
    }
}
