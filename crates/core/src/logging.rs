//! Centralized logging configuration for the asset tools.
//!
//! Batch runs over a sprite table skip bad entries instead of aborting, so
//! the per-entry diagnostics are the only record of what was dropped. This
//! module routes those messages through one filter.
//!
//! # Architecture
//!
//! - **LogConfig**: Thread-safe global configuration using atomic operations
//! - **LogLevel**: Hierarchical log levels (Off < Error < Warn < Info < Debug < Trace)
//! - **LogCategory**: Pipeline stages (Table, Tile, Palette, Index, Atlas, Export)
//! - **log()**: Common logging function for all output
//!
//! # Usage
//!
//! ```rust
//! use romgfx_core::logging::{log, LogCategory, LogLevel};
//!
//! // Log with lazy evaluation (zero cost when disabled)
//! log(LogCategory::Table, LogLevel::Warn, || {
//!     format!("Skipping entry at code offset 0x{:X}", 0x1234)
//! });
//! ```

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;

/// Log level for controlling verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    /// Parse log level from string (case-insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" | "0" => Some(LogLevel::Off),
            "error" | "err" | "1" => Some(LogLevel::Error),
            "warn" | "warning" | "2" => Some(LogLevel::Warn),
            "info" | "3" => Some(LogLevel::Info),
            "debug" | "4" => Some(LogLevel::Debug),
            "trace" | "5" => Some(LogLevel::Trace),
            _ => None,
        }
    }

    fn from_u8(val: u8) -> Self {
        match val {
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            _ => LogLevel::Off,
        }
    }
}

/// Log category for the decoding pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogCategory {
    /// Sprite descriptor and pointer table reads
    Table,
    /// Packed 4bpp pixel decoding
    Tile,
    /// Palette RAM and palette bank handling
    Palette,
    /// CSV sprite index parsing
    Index,
    /// Atlas layout and overlay drawing
    Atlas,
    /// PNG and manifest output
    Export,
}

impl LogCategory {
    const COUNT: usize = 6;

    fn index(self) -> usize {
        match self {
            LogCategory::Table => 0,
            LogCategory::Tile => 1,
            LogCategory::Palette => 2,
            LogCategory::Index => 3,
            LogCategory::Atlas => 4,
            LogCategory::Export => 5,
        }
    }
}

/// Global logging configuration
pub struct LogConfig {
    /// Global log level (applies to all categories unless overridden)
    global_level: AtomicU8,
    /// Per-category overrides; Off means "use the global level"
    category_levels: [AtomicU8; LogCategory::COUNT],
    /// Optional file sink; stderr when unset
    log_file: Mutex<Option<File>>,
}

impl LogConfig {
    fn new() -> Self {
        Self {
            global_level: AtomicU8::new(LogLevel::Off as u8),
            category_levels: Default::default(),
            log_file: Mutex::new(None),
        }
    }

    /// Get the global singleton instance
    pub fn global() -> &'static Self {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<LogConfig> = OnceLock::new();
        INSTANCE.get_or_init(LogConfig::new)
    }

    pub fn set_global_level(&self, level: LogLevel) {
        self.global_level.store(level as u8, Ordering::Relaxed);
    }

    pub fn get_global_level(&self) -> LogLevel {
        LogLevel::from_u8(self.global_level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, category: LogCategory, level: LogLevel) {
        self.category_levels[category.index()].store(level as u8, Ordering::Relaxed);
    }

    pub fn get_level(&self, category: LogCategory) -> LogLevel {
        LogLevel::from_u8(self.category_levels[category.index()].load(Ordering::Relaxed))
    }

    /// Check if a message should be logged for the given category and level
    ///
    /// A category with its own level uses it; otherwise the global level applies.
    pub fn should_log(&self, category: LogCategory, level: LogLevel) -> bool {
        if level == LogLevel::Off {
            return false;
        }
        let category_level = self.get_level(category);
        if category_level != LogLevel::Off {
            level <= category_level
        } else {
            level <= self.get_global_level()
        }
    }

    /// Reset all logging to Off and drop the file sink
    pub fn reset(&self) {
        self.set_global_level(LogLevel::Off);
        for level in &self.category_levels {
            level.store(LogLevel::Off as u8, Ordering::Relaxed);
        }
        self.clear_log_file();
    }

    /// Append all further messages to `path` instead of stderr.
    pub fn set_log_file(&self, path: PathBuf) -> std::io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        if let Ok(mut sink) = self.log_file.lock() {
            *sink = Some(file);
        }
        Ok(())
    }

    pub fn clear_log_file(&self) {
        if let Ok(mut sink) = self.log_file.lock() {
            *sink = None;
        }
    }

    fn write_message(&self, message: &str) {
        let mut sink = match self.log_file.lock() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        };
        match sink.as_mut() {
            // File write failed: stderr still gets the message
            Some(file) => {
                if writeln!(file, "{}", message).is_err() {
                    eprintln!("{}", message);
                }
            }
            None => eprintln!("{}", message),
        }
    }
}

/// Log a message with the specified category and level
///
/// The message is lazily evaluated via a closure, so formatting only occurs
/// when logging is enabled for the given category and level.
pub fn log<F>(category: LogCategory, level: LogLevel, message_fn: F)
where
    F: FnOnce() -> String,
{
    let config = LogConfig::global();
    if config.should_log(category, level) {
        let message = format!("[{:?}] {}", category, message_fn());
        config.write_message(&message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("off"), Some(LogLevel::Off));
        assert_eq!(LogLevel::from_str("OFF"), Some(LogLevel::Off));
        assert_eq!(LogLevel::from_str("ERR"), Some(LogLevel::Error));
        assert_eq!(LogLevel::from_str("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("3"), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_str("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_str("trace"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_str("loud"), None);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Off < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_should_log_with_global_level() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Warn);

        assert!(config.should_log(LogCategory::Table, LogLevel::Error));
        assert!(config.should_log(LogCategory::Table, LogLevel::Warn));
        assert!(!config.should_log(LogCategory::Table, LogLevel::Info));
    }

    #[test]
    fn test_category_level_overrides_global() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Error);
        config.set_level(LogCategory::Atlas, LogLevel::Debug);

        assert!(config.should_log(LogCategory::Atlas, LogLevel::Debug));
        assert!(!config.should_log(LogCategory::Index, LogLevel::Warn));
        assert!(config.should_log(LogCategory::Index, LogLevel::Error));
    }

    #[test]
    fn test_off_messages_never_pass() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Trace);
        assert!(!config.should_log(LogCategory::Tile, LogLevel::Off));
    }

    #[test]
    fn test_reset() {
        let config = LogConfig::new();
        config.set_global_level(LogLevel::Trace);
        config.set_level(LogCategory::Palette, LogLevel::Debug);

        config.reset();

        assert_eq!(config.get_global_level(), LogLevel::Off);
        assert_eq!(config.get_level(LogCategory::Palette), LogLevel::Off);
    }

    #[test]
    fn test_file_sink_receives_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        let config = LogConfig::new();
        config.set_global_level(LogLevel::Info);
        config.set_log_file(path.clone()).unwrap();
        config.write_message("[Table] hello");
        config.clear_log_file();

        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, "[Table] hello\n");
    }
}
