//! # Diagnostics
//!
//! Leveled message sink the index reports lookup misses and parse progress to.
//! The default forwards to `tracing`; callers can inject their own.

use parking_lot::Mutex;
use std::sync::Arc;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warning,
    Error,
}

/// Receiver of leveled diagnostic messages.
pub trait Diagnostics: Send + Sync {
    fn log(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    fn warning(&self, message: &str) {
        self.log(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }
}

/// Emits every message as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Debug => tracing::debug!(target: "otu_index", "{}", message),
            Level::Info => tracing::info!(target: "otu_index", "{}", message),
            Level::Warning => tracing::warn!(target: "otu_index", "{}", message),
            Level::Error => tracing::error!(target: "otu_index", "{}", message),
        }
    }
}

/// Keeps every message in memory. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct RecordingDiagnostics {
    entries: Arc<Mutex<Vec<(Level, String)>>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().clone()
    }

    /// Messages recorded at exactly `level`.
    pub fn at_level(&self, level: Level) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|(entry_level, _)| *entry_level == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.entries
            .lock()
            .iter()
            .any(|(entry_level, message)| *entry_level == level && message.contains(needle))
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn log(&self, level: Level, message: &str) {
        self.entries.lock().push((level, message.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_shares_buffer_across_clones() {
        let sink = RecordingDiagnostics::new();
        let handle = sink.clone();

        sink.warning("Bad element: g9 in 0.03");
        sink.debug("Reading threshold: 0.03");

        assert_eq!(handle.entries().len(), 2);
        assert!(handle.contains(Level::Warning, "g9"));
        assert!(!handle.contains(Level::Error, "g9"));
        assert_eq!(handle.at_level(Level::Debug), vec!["Reading threshold: 0.03"]);

        handle.clear();
        assert!(sink.entries().is_empty());
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_sink_forwards_levels() {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let sink = TracingDiagnostics;
            sink.debug("Reading threshold: 0.03");
            sink.warning("Bad element: g9 in 0.03");
            sink.error("Bad cutoff: 0.04");
        });

        let output = String::from_utf8(buffer.0.lock().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("DEBUG") && lines[0].contains("Reading threshold: 0.03"));
        assert!(lines[1].contains("WARN") && lines[1].contains("Bad element: g9 in 0.03"));
        assert!(lines[2].contains("ERROR") && lines[2].contains("Bad cutoff: 0.04"));
        assert!(lines.iter().all(|line| line.contains("otu_index")));
    }
}
