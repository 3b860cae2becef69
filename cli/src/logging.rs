//! Tracing setup: stdout plus a size-capped rolling log file.

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE: &str = "reticle.log";
const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Initialize logging to stdout and to a rolling file under the user's
/// config directory. Returns the appender guard, which must stay alive for
/// the lifetime of the process; dropping it stops the background writer.
///
/// Set `RETICLE_DEBUG=1` for debug-level output from the reticle crates.
pub fn init() -> Option<WorkerGuard> {
    let Some(log_dir) = dirs::config_dir().map(|dir| dir.join("reticle")) else {
        init_stdout_only();
        return None;
    };
    if std::fs::create_dir_all(&log_dir).is_err() {
        init_stdout_only();
        return None;
    }

    let condition = RollingConditionBasic::new().max_size(MAX_LOG_BYTES);
    let Ok(file_appender) = BasicRollingFileAppender::new(log_dir.join(LOG_FILE), condition, 1)
    else {
        init_stdout_only();
        return None;
    };
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);
    let stdout_layer = fmt::layer()
        .with_target(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stdout_layer)
        .with(env_filter())
        .init();
    Some(guard)
}

fn init_stdout_only() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(env_filter())
        .init();
}

/// `RUST_LOG` wins when set; otherwise info, raised to debug for the
/// reticle crates by `RETICLE_DEBUG=1`.
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if std::env::var("RETICLE_DEBUG").is_ok_and(|v| v == "1") {
            EnvFilter::new("info,reticle_cli=debug,reticle_core=debug,reticle_overlay=debug")
        } else {
            EnvFilter::new("info")
        }
    })
}
