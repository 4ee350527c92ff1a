//! File-backed queue persistence.
//!
//! Each queue lives in one semicolon-separated file under the data
//! directory. The full queue is rewritten after every mutation, so the
//! on-disk order always matches the in-memory order.

use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use torre_core::{contains_flight, sort_entries, QueueEntry, QueueKind, TorreError};

use crate::config::Config;

const FIELD_SEPARATOR: char = ';';

#[derive(Debug)]
pub struct QueueStore {
    departure_path: PathBuf,
    arrival_path: PathBuf,
    departure: Vec<QueueEntry>,
    arrival: Vec<QueueEntry>,
}

impl QueueStore {
    /// Open both queues. Missing files mean empty queues.
    pub fn open(config: &Config) -> Result<Self, TorreError> {
        let departure_path = config.queue_path(QueueKind::Departure);
        let arrival_path = config.queue_path(QueueKind::Arrival);
        let departure = load_entries(&departure_path, QueueKind::Departure)?;
        let arrival = load_entries(&arrival_path, QueueKind::Arrival)?;
        Ok(Self {
            departure_path,
            arrival_path,
            departure,
            arrival,
        })
    }

    pub fn entries(&self, kind: QueueKind) -> &[QueueEntry] {
        match kind {
            QueueKind::Departure => &self.departure,
            QueueKind::Arrival => &self.arrival,
        }
    }

    pub fn len(&self, kind: QueueKind) -> usize {
        self.entries(kind).len()
    }

    pub fn is_empty(&self, kind: QueueKind) -> bool {
        self.entries(kind).is_empty()
    }

    /// Whether the flight sits in either queue.
    pub fn contains(&self, flight_id: &str) -> bool {
        contains_flight(&self.departure, flight_id) || contains_flight(&self.arrival, flight_id)
    }

    /// Admit an entry to its queue, re-sort, and persist that queue.
    pub fn enqueue(&mut self, entry: QueueEntry) -> Result<(), TorreError> {
        if self.contains(&entry.flight_id) {
            return Err(TorreError::DuplicateEntry {
                flight_id: entry.flight_id,
            });
        }
        let kind = entry.kind;
        let queue = self.queue_mut(kind);
        queue.push(entry);
        sort_entries(queue);
        self.persist(kind)
    }

    /// Remove one flight from a queue and persist it.
    pub fn remove(&mut self, kind: QueueKind, flight_id: &str) -> Result<QueueEntry, TorreError> {
        let queue = self.queue_mut(kind);
        let position = queue
            .iter()
            .position(|e| e.flight_id == flight_id)
            .ok_or_else(|| TorreError::NotFound {
                flight_id: flight_id.to_string(),
                queue: kind,
            })?;
        let entry = queue.remove(position);
        self.persist(kind)?;
        Ok(entry)
    }

    /// Empty both queues and truncate their files.
    pub fn clear(&mut self) -> Result<(), TorreError> {
        self.departure.clear();
        self.arrival.clear();
        self.persist(QueueKind::Departure)?;
        self.persist(QueueKind::Arrival)
    }

    fn queue_mut(&mut self, kind: QueueKind) -> &mut Vec<QueueEntry> {
        match kind {
            QueueKind::Departure => &mut self.departure,
            QueueKind::Arrival => &mut self.arrival,
        }
    }

    fn path(&self, kind: QueueKind) -> &Path {
        match kind {
            QueueKind::Departure => &self.departure_path,
            QueueKind::Arrival => &self.arrival_path,
        }
    }

    fn persist(&self, kind: QueueKind) -> Result<(), TorreError> {
        let mut out = String::new();
        for entry in self.entries(kind) {
            let _ = writeln!(
                out,
                "{id}{sep}{time}{sep}{priority}{sep}{runway}{sep}{kind}",
                id = entry.flight_id,
                time = entry.scheduled_time.format("%H:%M"),
                priority = entry.priority,
                runway = entry.preferred_runway,
                kind = entry.kind.as_str(),
                sep = FIELD_SEPARATOR,
            );
        }
        std::fs::write(self.path(kind), out)?;
        Ok(())
    }
}

/// Parse one queue file. The queue's own identity decides the entry kind;
/// the stored kind field is informational. Damaged time or priority fields
/// degrade to `00:00` and `0` so hand-edited files never lose entries.
fn load_entries(path: &Path, kind: QueueKind) -> Result<Vec<QueueEntry>, TorreError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    let mut entries: Vec<QueueEntry> = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split(FIELD_SEPARATOR);
        let Some(flight_id) = fields.next().map(str::trim).filter(|id| !id.is_empty()) else {
            warn!(path = %path.display(), line = i + 1, "skipping queue line with no flight id");
            continue;
        };
        let scheduled_time = fields
            .next()
            .and_then(crate::registry::parse_hhmm)
            .unwrap_or_else(|| {
                warn!(
                    path = %path.display(),
                    line = i + 1,
                    flight = flight_id,
                    "queue entry has a bad time field; using 00:00"
                );
                chrono::NaiveTime::MIN
            });
        let priority = fields
            .next()
            .and_then(|p| p.trim().parse::<i32>().ok())
            .unwrap_or(0);
        let preferred_runway = fields.next().map(str::trim).unwrap_or("").to_string();
        entries.push(QueueEntry {
            flight_id: flight_id.to_string(),
            scheduled_time,
            priority,
            preferred_runway,
            kind,
        });
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn entry(flight_id: &str, time: NaiveTime, priority: i32, kind: QueueKind) -> QueueEntry {
        QueueEntry {
            flight_id: flight_id.into(),
            scheduled_time: time,
            priority,
            preferred_runway: "10/28".into(),
            kind,
        }
    }

    fn store_in(dir: &tempfile::TempDir) -> (Config, QueueStore) {
        let config = Config::with_base_dir(dir.path());
        config.ensure_dirs().unwrap();
        let store = QueueStore::open(&config).unwrap();
        (config, store)
    }

    #[test]
    fn enqueue_sorts_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let (config, mut store) = store_in(&dir);

        store.enqueue(entry("AZ100", t(8, 30), 1, QueueKind::Departure)).unwrap();
        store.enqueue(entry("AZ200", t(7, 0), 1, QueueKind::Departure)).unwrap();
        store.enqueue(entry("EM999", t(9, 0), 9, QueueKind::Departure)).unwrap();

        let ids: Vec<_> = store
            .entries(QueueKind::Departure)
            .iter()
            .map(|e| e.flight_id.clone())
            .collect();
        assert_eq!(ids, ["EM999", "AZ200", "AZ100"]);

        let reopened = QueueStore::open(&config).unwrap();
        let ids: Vec<_> = reopened
            .entries(QueueKind::Departure)
            .iter()
            .map(|e| e.flight_id.clone())
            .collect();
        assert_eq!(ids, ["EM999", "AZ200", "AZ100"]);
        assert_eq!(reopened.entries(QueueKind::Departure)[0].priority, 9);
    }

    #[test]
    fn a_flight_cannot_sit_in_both_queues() {
        let dir = tempfile::tempdir().unwrap();
        let (_config, mut store) = store_in(&dir);

        store.enqueue(entry("AZ100", t(8, 30), 1, QueueKind::Departure)).unwrap();
        let err = store
            .enqueue(entry("AZ100", t(8, 30), 1, QueueKind::Arrival))
            .unwrap_err();
        assert!(matches!(err, TorreError::DuplicateEntry { .. }));
        assert!(store.is_empty(QueueKind::Arrival));
    }

    #[test]
    fn remove_returns_the_entry_and_rewrites_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let (config, mut store) = store_in(&dir);

        store.enqueue(entry("AZ100", t(8, 30), 1, QueueKind::Arrival)).unwrap();
        store.enqueue(entry("AZ200", t(9, 0), 1, QueueKind::Arrival)).unwrap();

        let removed = store.remove(QueueKind::Arrival, "AZ100").unwrap();
        assert_eq!(removed.flight_id, "AZ100");
        assert_eq!(store.len(QueueKind::Arrival), 1);

        let text = std::fs::read_to_string(config.queue_path(QueueKind::Arrival)).unwrap();
        assert_eq!(text, "AZ200;09:00;1;10/28;arrival\n");

        let err = store.remove(QueueKind::Arrival, "AZ100").unwrap_err();
        assert!(matches!(err, TorreError::NotFound { .. }));
    }

    #[test]
    fn clear_truncates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let (config, mut store) = store_in(&dir);

        store.enqueue(entry("AZ100", t(8, 30), 1, QueueKind::Departure)).unwrap();
        store.enqueue(entry("AZ200", t(9, 0), 1, QueueKind::Arrival)).unwrap();
        store.clear().unwrap();

        assert!(store.is_empty(QueueKind::Departure));
        assert!(store.is_empty(QueueKind::Arrival));
        let text = std::fs::read_to_string(config.queue_path(QueueKind::Departure)).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn damaged_fields_degrade_without_losing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_base_dir(dir.path());
        config.ensure_dirs().unwrap();
        std::fs::write(
            config.queue_path(QueueKind::Departure),
            "AZ100;not-a-time;high;10/28;departure\n;;;;\n",
        )
        .unwrap();

        let store = QueueStore::open(&config).unwrap();
        let entries = store.entries(QueueKind::Departure);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].flight_id, "AZ100");
        assert_eq!(entries[0].scheduled_time, NaiveTime::MIN);
        assert_eq!(entries[0].priority, 0);
    }
}
