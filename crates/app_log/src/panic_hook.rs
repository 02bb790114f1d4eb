//! Panic hook for crash reporting

use backtrace::Backtrace;
use chrono::Local;
use std::any::Any;
use std::panic::PanicHookInfo;

/// Initialize the panic hook for crash reporting
pub fn init_panic_hook() {
    std::panic::set_hook(Box::new(panic_handler));
    tracing::debug!("Panic hook initialized");
}

/// Text carried by a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<unknown>"
    }
}

/// Build the crash dump text
pub fn crash_report(timestamp: &str, thread: &str, location: &str, message: &str, trace: &str) -> String {
    format!(
        "=== CACHE VIEWER CRASH ===\n\
         Timestamp: {}\n\
         Thread: {}\n\
         Location: {}\n\
         Message: {}\n\n\
         Stack Trace:\n{}",
        timestamp, thread, location, message, trace
    )
}

fn panic_handler(info: &PanicHookInfo) {
    let thread = std::thread::current();
    let location = info
        .location()
        .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
        .unwrap_or_else(|| "<unknown>".to_string());
    let message = panic_message(info.payload());

    let report = crash_report(
        &Local::now().to_rfc3339(),
        thread.name().unwrap_or("<unnamed>"),
        &location,
        message,
        &format!("{:?}", Backtrace::new()),
    );

    eprintln!("{}", report);
    tracing::error!("{}", report);

    let dump_filename = format!(
        "cache_viewer_crash_{}.txt",
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let dump_path = std::env::temp_dir().join(&dump_filename);

    if let Err(e) = std::fs::write(&dump_path, &report) {
        eprintln!("Failed to write crash dump: {}", e);
    }

    #[cfg(windows)]
    show_error_dialog(&dump_path, message);
}

#[cfg(windows)]
fn show_error_dialog(dump_path: &std::path::Path, message: &str) {
    use windows::core::HSTRING;
    use windows::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK};

    let msg = format!(
        "Cache Viewer stopped unexpectedly.\n\n\
         Crash report: {}\n\n\
         Error: {}",
        dump_path.display(),
        message
    );

    unsafe {
        MessageBoxW(
            None,
            &HSTRING::from(msg),
            &HSTRING::from("Cache Viewer - Fatal Error"),
            MB_ICONERROR | MB_OK,
        );
    }
}
