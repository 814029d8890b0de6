//! Logging setup for the command line.
//!
//! Log lines go to `<config dir>/relink-act/relink-act.log` (rotated at 10 MB)
//! and to stderr, so stdout stays clean for tables and JSON. Set
//! `DEBUG_LOGGING=1` for debug output from the relink-act crates.

use std::path::PathBuf;

use rolling_file::{BasicRollingFileAppender, RollingConditionBasic};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const LOG_FILE_NAME: &str = "relink-act.log";
const MAX_LOG_BYTES: u64 = 10 * 1024 * 1024;

/// Install the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process. `None` means file logging could not be set up
/// and only stderr is used.
pub fn init() -> Option<WorkerGuard> {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let log_path = match prepare_log_path() {
        Ok(path) => path,
        Err(reason) => {
            eprintln!("{reason}, logging to stderr only");
            init_stderr_only(debug_logging);
            return None;
        }
    };

    let file_appender = match BasicRollingFileAppender::new(
        &log_path,
        RollingConditionBasic::new().max_size(MAX_LOG_BYTES),
        1,
    ) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("failed to open log file {}: {e}, logging to stderr only", log_path.display());
            init_stderr_only(debug_logging);
            return None;
        }
    };
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer())
        .with(filter(debug_logging))
        .init();

    tracing::debug!(log_file = %log_path.display(), debug_logging, "logging initialized");
    Some(guard)
}

fn prepare_log_path() -> Result<PathBuf, String> {
    let log_dir = dirs::config_dir()
        .map(|config| config.join("relink-act"))
        .ok_or_else(|| "no config directory on this platform".to_string())?;
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| format!("failed to create log directory {}: {e}", log_dir.display()))?;
    Ok(log_dir.join(LOG_FILE_NAME))
}

fn init_stderr_only(debug_logging: bool) {
    tracing_subscriber::registry()
        .with(stderr_layer())
        .with(filter(debug_logging))
        .init();
}

fn stderr_layer<S>() -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
}

fn filter(debug_logging: bool) -> EnvFilter {
    if debug_logging {
        EnvFilter::new("info,relink_act=debug,relink_act_core=debug")
    } else {
        EnvFilter::new("info")
    }
}
