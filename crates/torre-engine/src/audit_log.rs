//! Append-only audit history on disk.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{Duration, NaiveDateTime};
use tracing::warn;

use torre_core::{AuditEvent, AuditIndex, TorreError};

use crate::config::Config;

/// The audit file plus its in-memory index. Appends go to both; the file
/// itself is never rewritten.
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
    index: AuditIndex,
}

impl AuditLog {
    /// Open the history, indexing whatever is already recorded. A missing
    /// file is an empty history.
    pub fn open(config: &Config) -> Result<Self, TorreError> {
        let path = config.audit_log_path();
        let mut index = AuditIndex::new();
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                for (i, line) in text.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match AuditEvent::parse_line(line) {
                        Some(event) => index.record(event),
                        None => {
                            warn!(path = %path.display(), line = i + 1, "unreadable audit line ignored");
                        }
                    }
                }
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }
        Ok(Self { path, index })
    }

    /// Append one event to the file and the index.
    pub fn append(&mut self, event: AuditEvent) -> Result<(), TorreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", event.to_line())?;
        self.index.record(event);
        Ok(())
    }

    pub fn index(&self) -> &AuditIndex {
        &self.index
    }

    /// Releases recorded in the trailing `window_min` minutes, `now`
    /// inclusive at the window's start.
    pub fn releases_within(&self, now: NaiveDateTime, window_min: i64) -> usize {
        self.index.releases_since(now - Duration::minutes(window_min))
    }
}
