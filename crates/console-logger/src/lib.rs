//! Console Logger
//!
//! `log` backend for the browser: every record goes to the devtools console
//! at the matching level, and the most recent records are kept in a circular
//! buffer so they can be shown or attached to a bug report.

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use log::{Level, LevelFilter, Log, Metadata, Record};

/// One captured log line
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: Level,
    pub target: String,
    pub message: String,
    /// Milliseconds since epoch (0 outside the browser)
    pub timestamp_ms: f64,
}

impl LogEntry {
    /// `LEVEL [target] message`
    pub fn format_line(&self) -> String {
        format!("{:<5} [{}] {}", self.level, self.target, self.message)
    }
}

/// Newline-joined lines, oldest first
pub fn format_entries(entries: &[LogEntry]) -> String {
    entries
        .iter()
        .map(LogEntry::format_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fixed-capacity buffer that drops the oldest entry when full
#[derive(Debug)]
pub struct RingBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl RingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct ConsoleLogger {
    level: LevelFilter,
    buffer: Mutex<RingBuffer>,
    /// Write to `web_sys::console` (off in native tests)
    echo: bool,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter, capacity: usize) -> Self {
        Self {
            level,
            buffer: Mutex::new(RingBuffer::new(capacity)),
            echo: cfg!(target_arch = "wasm32"),
        }
    }

    /// Recent records, oldest first
    pub fn recent(&self) -> Vec<LogEntry> {
        self.buffer.lock().map(|b| b.snapshot()).unwrap_or_default()
    }
}

fn now_ms() -> f64 {
    if cfg!(target_arch = "wasm32") {
        js_sys::Date::now()
    } else {
        0.0
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();

        if self.echo {
            let line = format!("{} {}", record.level(), message).into();
            match record.level() {
                Level::Error => web_sys::console::error_1(&line),
                Level::Warn => web_sys::console::warn_1(&line),
                Level::Info => web_sys::console::info_1(&line),
                Level::Debug | Level::Trace => web_sys::console::log_1(&line),
            }
        }

        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(LogEntry {
                level: record.level(),
                target: record.target().to_string(),
                message,
                timestamp_ms: now_ms(),
            });
        }
    }

    fn flush(&self) {}
}

static INSTALLED: OnceLock<&'static ConsoleLogger> = OnceLock::new();

/// Install the logger as the global `log` backend.
///
/// Returns the leaked logger so callers can read recent records later.
pub fn init(level: LevelFilter, capacity: usize) -> Result<&'static ConsoleLogger, log::SetLoggerError> {
    let logger: &'static ConsoleLogger = Box::leak(Box::new(ConsoleLogger::new(level, capacity)));
    log::set_logger(logger)?;
    log::set_max_level(level);
    let _ = INSTALLED.set(logger);
    Ok(logger)
}

/// The logger installed by [`init`], if any
pub fn installed() -> Option<&'static ConsoleLogger> {
    INSTALLED.get().copied()
}

/// Recent records from the installed logger, empty before [`init`]
pub fn recent_records() -> Vec<LogEntry> {
    installed().map(ConsoleLogger::recent).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            level: Level::Info,
            target: "test".to_string(),
            message: message.to_string(),
            timestamp_ms: 0.0,
        }
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let mut buffer = RingBuffer::new(2);
        buffer.push(entry("a"));
        buffer.push(entry("b"));
        buffer.push(entry("c"));

        let messages: Vec<_> = buffer.snapshot().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["b", "c"]);
    }

    #[test]
    fn test_logger_filters_by_level() {
        let logger = ConsoleLogger::new(LevelFilter::Warn, 8);
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("ignored"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Error)
                .target("api")
                .args(format_args!("boom"))
                .build(),
        );

        let recent = logger.recent();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].message, "boom");
        assert_eq!(recent[0].target, "api");
    }

    #[test]
    fn test_installed_logger_exposes_recent_records() {
        let logger = init(LevelFilter::Info, 4).expect("first init in this test binary");
        assert!(std::ptr::eq(installed().expect("installed"), logger));

        log::info!(target: "app", "hello");
        log::debug!(target: "app", "hidden");

        let records = recent_records();
        assert_eq!(records.len(), 1);
        assert_eq!(format_entries(&records), "INFO  [app] hello");
    }

    #[test]
    fn test_format_entries_joins_lines() {
        let mut warn = entry("slow");
        warn.level = Level::Warn;
        assert_eq!(
            format_entries(&[entry("a"), warn]),
            "INFO  [test] a\nWARN  [test] slow"
        );
        assert_eq!(format_entries(&[]), "");
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut buffer = RingBuffer::new(0);
        buffer.push(entry("x"));
        buffer.push(entry("y"));
        assert_eq!(buffer.len(), 1);
    }
}
