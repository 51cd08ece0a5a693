//! FILENAME: core/widget-engine/src/logging.rs
// PURPOSE: Unified logging for the widget pipeline.
// CONTEXT: Every line is `seq|level|category|message`. The sequence number is
// taken under the same lock that writes the file, so the file is always in
// sequence order. Lines are also forwarded to the `log` facade.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use once_cell::sync::Lazy;

pub use log::Level;

// ============================================================================
// UNIFIED LOGGING SYSTEM
// ============================================================================

struct LogSink {
    file: File,
    path: PathBuf,
}

#[derive(Default)]
struct LogState {
    /// Last sequence number handed out, shared by every session in the process
    seq: u64,
    /// Optional log file. Without one, lines only go to the `log` facade.
    sink: Option<LogSink>,
}

static LOG_STATE: Lazy<Mutex<LogState>> = Lazy::new(|| Mutex::new(LogState::default()));

fn level_code(level: Level) -> &'static str {
    match level {
        Level::Error => "E",
        Level::Warn => "W",
        Level::Info => "I",
        Level::Debug => "D",
        Level::Trace => "T",
    }
}

/// Path of the current log file, if one was initialized
pub fn get_log_path() -> Option<PathBuf> {
    LOG_STATE
        .lock()
        .ok()
        .and_then(|state| state.sink.as_ref().map(|sink| sink.path.clone()))
}

/// Create (or truncate) the log file at `path`
pub fn init_log_file(path: &Path) -> Result<PathBuf, String> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|e| format!("Failed to create log dir at {:?}: {}", dir, e))?;
        }
    }

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| format!("Failed to create log file {:?}: {}", path, e))?;

    let mut state = LOG_STATE.lock().map_err(|e| format!("Lock error: {}", e))?;
    state.sink = Some(LogSink {
        file,
        path: path.to_path_buf(),
    });
    Ok(path.to_path_buf())
}

/// Detach the log file; later lines only reach the `log` facade
pub fn close_log_file() {
    if let Ok(mut state) = LOG_STATE.lock() {
        if let Some(mut sink) = state.sink.take() {
            let _ = sink.file.flush();
        }
    }
}

/// Write one line and return its sequence number (0 if the lock is poisoned).
pub fn write_log(level: Level, category: &str, message: &str) -> u64 {
    let (seq, line) = match LOG_STATE.lock() {
        Ok(mut state) => {
            state.seq += 1;
            let seq = state.seq;
            let line = format!("{}|{}|{}|{}", seq, level_code(level), category, message);
            if let Some(sink) = state.sink.as_mut() {
                if let Err(e) = writeln!(sink.file, "{}", line) {
                    eprintln!("[LOG_ERROR] Failed to write: {}", e);
                }
                let _ = sink.file.flush();
            }
            (seq, line)
        }
        Err(_) => (0, format!("0|{}|{}|{}", level_code(level), category, message)),
    };

    log::log!(target: category, level, "{}", line);
    seq
}

/// ENTER line for function entry
pub fn write_log_enter(category: &str, func_name: &str, params: &str) -> u64 {
    let message = if params.is_empty() {
        format!("ENTER {}", func_name)
    } else {
        format!("ENTER {} {}", func_name, params)
    };
    write_log(Level::Debug, category, &message)
}

/// EXIT line for function exit
pub fn write_log_exit(category: &str, func_name: &str, result: &str) -> u64 {
    let message = if result.is_empty() {
        format!("EXIT {}", func_name)
    } else {
        format!("EXIT {} {}", func_name, result)
    };
    write_log(Level::Debug, category, &message)
}

// ============================================================================
// MACRO DEFINITIONS & EXPORTS
// ============================================================================

#[macro_export]
macro_rules! log_debug {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Debug, $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Info, $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Warn, $cat, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($cat:expr, $($arg:tt)*) => {
        $crate::logging::write_log($crate::logging::Level::Error, $cat, &format!($($arg)*))
    };
}

// ENTER/EXIT macros for function tracing

#[macro_export]
macro_rules! log_enter {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_enter($cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_enter($cat, $func, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_exit {
    ($cat:expr, $func:expr) => {
        $crate::logging::write_log_exit($cat, $func, "")
    };
    ($cat:expr, $func:expr, $($arg:tt)*) => {
        $crate::logging::write_log_exit($cat, $func, &format!($($arg)*))
    };
}

pub use log_debug;
pub use log_enter;
pub use log_error;
pub use log_exit;
pub use log_info;
pub use log_warn;
