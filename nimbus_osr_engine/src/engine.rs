//! Engine singleton - global logging entry point
//!
//! The swap-chain components report through free-standing macros
//! (`osr_trace!` .. `osr_error!`) that route into this module. The engine
//! holds the installed `Logger` and a minimum severity filter behind
//! thread-safe static storage so callbacks firing from any context can log
//! without carrying a logger reference around.

use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};

// ===== INTERNAL STATE =====

/// Global logger (initialized with DefaultLogger on first use)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Minimum severity that gets forwarded to the logger
static MIN_SEVERITY: RwLock<LogSeverity> = RwLock::new(LogSeverity::Trace);

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

// ===== PUBLIC API =====

/// Global logging facade for the engine
///
/// # Example
///
/// ```no_run
/// use nimbus_osr_engine::nimbus::Engine;
/// use nimbus_osr_engine::nimbus::log::LogSeverity;
///
/// Engine::set_min_severity(LogSeverity::Info);
/// Engine::log(LogSeverity::Info, "app", "starting up".to_string());
/// ```
pub struct Engine;

impl Engine {
    /// Replace the global logger
    ///
    /// The previous logger is dropped. Installing a custom logger is how
    /// hosts capture engine diagnostics (and how tests assert on them).
    pub fn set_logger(new_logger: Box<dyn Logger>) {
        if let Ok(mut guard) = logger().write() {
            *guard = new_logger;
        }
    }

    /// Restore the default colored console logger
    pub fn reset_logger() {
        Self::set_logger(Box::new(DefaultLogger));
    }

    /// Set the minimum severity forwarded to the logger
    ///
    /// Entries below this severity are dropped before formatting.
    pub fn set_min_severity(severity: LogSeverity) {
        if let Ok(mut guard) = MIN_SEVERITY.write() {
            *guard = severity;
        }
    }

    /// Current minimum severity
    pub fn min_severity() -> LogSeverity {
        MIN_SEVERITY.read().map(|s| *s).unwrap_or(LogSeverity::Trace)
    }

    /// Log a message (used by the osr_trace!/debug!/info!/warn! macros)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        });
    }

    /// Log a message with file:line details (used by osr_error!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(LogEntry {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: Some(file),
            line: Some(line),
        });
    }

    fn dispatch(entry: LogEntry) {
        if entry.severity < Self::min_severity() {
            return;
        }
        if let Ok(guard) = logger().read() {
            guard.log(&entry);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
