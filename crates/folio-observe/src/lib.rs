use anyhow::Result;
use chrono::Utc;
use folio_core::{ConsoleEvent, LoggingConfig, runtime_dir};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Where diagnostic output may go. The full-screen shell owns stderr, so it
/// only ever logs to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    FileOnly,
    FileAndStderr,
}

pub struct Observer {
    log_dir: PathBuf,
    event_log_path: PathBuf,
    verbose: bool,
}

impl Observer {
    pub fn new(workspace: &Path) -> Result<Self> {
        let log_dir = runtime_dir(workspace).join("logs");
        fs::create_dir_all(&log_dir)?;
        Ok(Self {
            event_log_path: log_dir.join("observe.log"),
            log_dir,
            verbose: false,
        })
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn event_log_path(&self) -> &Path {
        &self.event_log_path
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Install the global `tracing` subscriber. Returns `Ok(false)` when a
    /// subscriber was already installed (tests, repeated calls).
    pub fn init_tracing(&self, cfg: &LoggingConfig, target: LogTarget) -> Result<bool> {
        let filter = EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| {
            if self.verbose {
                EnvFilter::new("folio=debug")
            } else {
                EnvFilter::new(&cfg.filter)
            }
        });

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_dir.join(&cfg.file_name))?;
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true);

        let stderr_layer = (target == LogTarget::FileAndStderr && self.verbose).then(|| {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
        });

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(stderr_layer)
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!(dir = %self.log_dir.display(), "tracing initialized");
        }
        Ok(installed)
    }

    pub fn record_event(&self, event: &ConsoleEvent) -> Result<()> {
        tracing::info!(kind = ?event.kind, detail = %event.detail, "console event");
        self.append_log_line(&format!(
            "{} EVENT {}",
            event.at.to_rfc3339(),
            serde_json::to_string(event)?
        ))
    }

    /// Log a warning: always written to the event log, and to stderr in verbose mode.
    pub fn warn_log(&self, msg: &str) {
        tracing::warn!("{msg}");
        if self.verbose {
            eprintln!("[folio WARN] {msg}");
        }
        let _ = self.append_log_line(&format!("{} WARN {msg}", Utc::now().to_rfc3339()));
    }

    fn append_log_line(&self, line: &str) -> Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.event_log_path)?;
        writeln!(f, "{line}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::EventKind;
    use serde_json::json;

    fn sample_event() -> ConsoleEvent {
        ConsoleEvent::new(EventKind::CommandSubmitted, json!({"command": "help"}))
    }

    #[test]
    fn new_creates_log_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let observer = Observer::new(dir.path()).expect("observer");
        assert!(observer.log_dir().is_dir());
        assert!(observer.log_dir().starts_with(dir.path().join(".folio")));
    }

    #[test]
    fn record_event_writes_to_log_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let observer = Observer::new(dir.path()).expect("observer");
        observer.record_event(&sample_event()).expect("record");

        let log = fs::read_to_string(observer.event_log_path()).expect("read log");
        assert!(log.contains("EVENT"));
        assert!(log.contains("command_submitted"));
        assert!(log.contains("\"help\""));
    }

    #[test]
    fn multiple_events_append_to_log() {
        let dir = tempfile::tempdir().expect("tempdir");
        let observer = Observer::new(dir.path()).expect("observer");
        observer.record_event(&sample_event()).expect("record 1");
        observer
            .record_event(&ConsoleEvent::new(EventKind::PageViewed, json!({"page": "skills"})))
            .expect("record 2");
        observer.warn_log("asset missing");

        let log = fs::read_to_string(observer.event_log_path()).expect("read log");
        assert_eq!(log.lines().filter(|l| l.contains(" EVENT ")).count(), 2);
        assert_eq!(log.lines().filter(|l| l.contains(" WARN ")).count(), 1);
    }

    #[test]
    fn init_tracing_creates_log_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let observer = Observer::new(dir.path()).expect("observer");
        let cfg = LoggingConfig::default();
        observer
            .init_tracing(&cfg, LogTarget::FileOnly)
            .expect("init tracing");
        assert!(observer.log_dir().join(&cfg.file_name).exists());
    }
}
