//! Cache Viewer Logging & Crash Reporting
//!
//! Structured logging to a rolling JSON file, with a pretty console layer in
//! debug builds, plus a panic hook that writes crash dumps.

mod panic_hook;
mod logging;

pub use panic_hook::{crash_report, init_panic_hook, panic_message};
pub use logging::{cleanup_old_logs, init_logging, LogGuard, LOG_FILE_PREFIX};

use directories::ProjectDirs;
use std::path::PathBuf;

/// Get the application log directory
pub fn log_dir() -> PathBuf {
    ProjectDirs::from("com", "CacheViewer", "CacheViewer")
        .map(|dirs| dirs.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialize logging and the panic hook.
///
/// `default_filter` is used when `RUST_LOG` is unset. The returned guard must
/// live as long as the application or buffered log lines are lost.
pub fn init(default_filter: &str) -> anyhow::Result<LogGuard> {
    let guard = init_logging(&log_dir(), default_filter)?;
    init_panic_hook();
    Ok(guard)
}
