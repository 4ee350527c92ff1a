//! Audit events and the in-memory view over the audit history.
//!
//! Every decision that touches a runway is recorded as one line of
//! append-only history. Lines are plain text so the file stays readable
//! and greppable on the operations console.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::models::QueueKind;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditKind {
    Authorized,
    Denied,
}

impl AuditKind {
    pub fn token(self) -> &'static str {
        match self {
            Self::Authorized => "AUTHORIZED",
            Self::Denied => "DENIED",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "AUTHORIZED" => Some(Self::Authorized),
            "DENIED" => Some(Self::Denied),
            _ => None,
        }
    }
}

/// One recorded decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub at: NaiveDateTime,
    pub kind: AuditKind,
    pub queue: QueueKind,
    /// Absent for runway-level refusals, where no candidate was picked.
    pub flight_id: Option<String>,
    pub runway_id: String,
    /// Stable reason token: `ok` for releases, a deny code otherwise.
    pub reason: String,
}

impl AuditEvent {
    /// Render the single-line wire form.
    ///
    /// `2026-03-14 08:30:00 AUTHORIZED DEPARTURE flight=AZ100 runway=10/28 reason=ok`
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {} flight={} runway={} reason={}",
            self.at.format(TIMESTAMP_FORMAT),
            self.kind.token(),
            self.queue.audit_token(),
            self.flight_id.as_deref().unwrap_or("-"),
            self.runway_id,
            self.reason,
        )
    }

    /// Parse one history line. Returns `None` for lines that do not match
    /// the wire form; callers skip those.
    pub fn parse_line(line: &str) -> Option<AuditEvent> {
        let mut parts = line.split_whitespace();
        let date = parts.next()?;
        let time = parts.next()?;
        let at = NaiveDateTime::parse_from_str(&format!("{date} {time}"), TIMESTAMP_FORMAT).ok()?;
        let kind = AuditKind::from_token(parts.next()?)?;
        let queue = QueueKind::from_audit_token(parts.next()?)?;
        let flight = parts.next()?.strip_prefix("flight=")?;
        let runway = parts.next()?.strip_prefix("runway=")?;
        let reason = parts.next()?.strip_prefix("reason=")?;
        if parts.next().is_some() {
            return None;
        }
        Some(AuditEvent {
            at,
            kind,
            queue,
            flight_id: (flight != "-").then(|| flight.to_string()),
            runway_id: runway.to_string(),
            reason: reason.to_string(),
        })
    }
}

/// In-memory view over the append-only audit history.
///
/// Release timestamps are kept sorted on the side so the trailing-window
/// query stays logarithmic instead of rescanning the history.
#[derive(Debug, Default)]
pub struct AuditIndex {
    events: Vec<AuditEvent>,
    release_times: Vec<NaiveDateTime>,
}

impl AuditIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: AuditEvent) {
        if event.kind == AuditKind::Authorized {
            let pos = self.release_times.partition_point(|t| *t <= event.at);
            self.release_times.insert(pos, event.at);
        }
        self.events.push(event);
    }

    /// Releases recorded at or after `cutoff`.
    pub fn releases_since(&self, cutoff: NaiveDateTime) -> usize {
        self.release_times.len() - self.release_times.partition_point(|t| *t < cutoff)
    }

    pub fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
