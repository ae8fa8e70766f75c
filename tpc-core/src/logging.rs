//! In-process structured logging for the probe pipeline (C7 diagnostics)
//!
//! A probe run logs to an in-memory buffer rather than streaming: a run is
//! one bounded batch, not a long-lived service, so there's nothing to tail.
//! The CLI's `ProbeReport` is the stable stdout contract; this buffer is
//! just the stage-by-stage trail an operator can inspect behind it.

use std::fmt;

/// Log level for filtering entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Which pipeline stage emitted an entry, matching `ProbeStep::name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Orchestrator,
    Sweep,
    Packet,
    Decision,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Stage::Orchestrator => "ORCHESTRATOR",
            Stage::Sweep => "SWEEP",
            Stage::Packet => "PACKET",
            Stage::Decision => "DECISION",
        };
        write!(f, "{tag}")
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum level to record.
    pub level: LogLevel,
    /// Cap on buffered entries; oldest entries are evicted past this.
    pub max_entries: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            max_entries: 1000,
        }
    }
}

impl LogConfig {
    /// Verbose logging for debugging a probe run.
    pub fn verbose() -> Self {
        Self {
            level: LogLevel::Debug,
            max_entries: 5000,
        }
    }
}

/// A single log entry.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub stage: Stage,
    pub message: String,
}

/// Collects structured log entries for a single probe run.
#[derive(Debug, Clone)]
pub struct ProbeLogger {
    config: LogConfig,
    entries: Vec<LogEntry>,
}

impl ProbeLogger {
    pub fn new(config: LogConfig) -> Self {
        let capacity = config.max_entries.min(1000);
        Self {
            config,
            entries: Vec::with_capacity(capacity),
        }
    }

    fn log(&mut self, level: LogLevel, stage: Stage, message: impl fmt::Display) {
        if level < self.config.level || self.config.max_entries == 0 {
            return;
        }

        if self.entries.len() >= self.config.max_entries {
            self.entries.remove(0);
        }
        self.entries.push(LogEntry {
            level,
            stage,
            message: message.to_string(),
        });
    }

    pub fn info(&mut self, stage: Stage, message: impl fmt::Display) {
        self.log(LogLevel::Info, stage, message);
    }

    pub fn warn(&mut self, stage: Stage, message: impl fmt::Display) {
        self.log(LogLevel::Warn, stage, message);
    }

    pub fn error(&mut self, stage: Stage, message: impl fmt::Display) {
        self.log(LogLevel::Error, stage, message);
    }

    /// All entries buffered so far, oldest first.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }
}

impl Default for ProbeLogger {
    fn default() -> Self {
        Self::new(LogConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_below_configured_level() {
        let config = LogConfig {
            level: LogLevel::Info,
            ..LogConfig::default()
        };
        let mut logger = ProbeLogger::new(config);

        logger.log(LogLevel::Debug, Stage::Sweep, "debug message");
        logger.info(Stage::Sweep, "info message");
        logger.warn(Stage::Sweep, "warn message");

        assert_eq!(logger.entries().len(), 2);
    }

    #[test]
    fn max_entries_evicts_oldest_first() {
        let config = LogConfig {
            level: LogLevel::Debug,
            max_entries: 3,
        };
        let mut logger = ProbeLogger::new(config);

        logger.info(Stage::Orchestrator, "message 1");
        logger.info(Stage::Orchestrator, "message 2");
        logger.info(Stage::Orchestrator, "message 3");
        logger.info(Stage::Orchestrator, "message 4");

        assert_eq!(logger.entries().len(), 3);
        assert!(logger.entries()[0].message.contains("message 2"));
    }

    #[test]
    fn entries_record_their_originating_stage() {
        let mut logger = ProbeLogger::new(LogConfig::verbose());
        logger.info(Stage::Decision, "selected mode ultrasonic");
        assert_eq!(logger.entries()[0].stage, Stage::Decision);
    }
}
