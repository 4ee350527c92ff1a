//! Status snapshots and period reports.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::Serialize;

use torre_core::{AuditIndex, AuditKind, QueueEntry, QueueKind, RunwayStatus, TorreError, WeatherSample};

use crate::config::Config;
use crate::registry::Registry;
use crate::store::QueueStore;

/// Queue positions shown per queue in the status view.
const NEXT_SHOWN: usize = 3;
/// Denial reasons listed in a period report.
const MAX_REPORTED_REASONS: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub generated_at: NaiveDateTime,
    pub runways: Vec<RunwaySummary>,
    pub departure: QueueSummary,
    pub arrival: QueueSummary,
    /// Weather sample in effect at the snapshot time.
    pub weather: Option<WeatherSample>,
    /// Raw text of advisories active at the snapshot time.
    pub active_advisories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunwaySummary {
    pub runway_id: String,
    pub status: RunwayStatus,
    /// Raw text of the advisory closing this runway right now, if any.
    pub blocked_by: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueSummary {
    pub size: usize,
    /// The first few entries in release order.
    pub next: Vec<QueueEntry>,
}

/// Capture the operational picture at `now`. Reads state; mutates nothing.
pub fn status_snapshot(registry: &Registry, store: &QueueStore, now: NaiveDateTime) -> StatusSnapshot {
    let time = now.time();
    let runways = registry
        .runways
        .iter()
        .map(|r| RunwaySummary {
            runway_id: r.runway_id.clone(),
            status: r.status,
            blocked_by: registry
                .advisories
                .iter()
                .find(|a| a.blocks_runway(&r.runway_id, time))
                .map(|a| a.raw.clone()),
        })
        .collect();
    let summarize = |kind: QueueKind| QueueSummary {
        size: store.len(kind),
        next: store.entries(kind).iter().take(NEXT_SHOWN).cloned().collect(),
    };
    StatusSnapshot {
        generated_at: now,
        runways,
        departure: summarize(QueueKind::Departure),
        arrival: summarize(QueueKind::Arrival),
        weather: WeatherSample::in_effect_at(&registry.weather, time).cloned(),
        active_advisories: registry
            .advisories
            .iter()
            .filter(|a| a.is_active_at(time))
            .map(|a| a.raw.clone())
            .collect(),
    }
}

pub fn render_status(snapshot: &StatusSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Status at {}", snapshot.generated_at.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out);
    let _ = writeln!(out, "Runways:");
    if snapshot.runways.is_empty() {
        let _ = writeln!(out, "  none registered");
    }
    for runway in &snapshot.runways {
        let state = match runway.status {
            RunwayStatus::Open => "OPEN",
            RunwayStatus::Closed => "CLOSED",
        };
        match &runway.blocked_by {
            Some(advisory) => {
                let _ = writeln!(out, "  {}: {state} (blocked by advisory: {advisory})", runway.runway_id);
            }
            None => {
                let _ = writeln!(out, "  {}: {state}", runway.runway_id);
            }
        }
    }
    let _ = writeln!(out);
    render_queue(&mut out, "Departure queue", &snapshot.departure);
    render_queue(&mut out, "Arrival queue", &snapshot.arrival);
    let _ = writeln!(out, "Weather in effect:");
    match &snapshot.weather {
        Some(sample) => {
            let _ = writeln!(out, "  {}", sample.raw);
        }
        None => {
            let _ = writeln!(out, "  no reports");
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Active advisories:");
    if snapshot.active_advisories.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for advisory in &snapshot.active_advisories {
        let _ = writeln!(out, "  {advisory}");
    }
    out
}

fn render_queue(out: &mut String, label: &str, queue: &QueueSummary) {
    if queue.size == 0 {
        let _ = writeln!(out, "{label}: empty");
    } else {
        let _ = writeln!(out, "{label}: {} waiting", queue.size);
        for (i, entry) in queue.next.iter().enumerate() {
            let _ = writeln!(
                out,
                "  {}. {}  {}  prio {}  runway {}",
                i + 1,
                entry.flight_id,
                entry.scheduled_time.format("%H:%M"),
                entry.priority,
                entry.preferred_runway,
            );
        }
    }
    let _ = writeln!(out);
}

#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport {
    pub generated_at: NaiveDateTime,
    pub authorized: usize,
    pub denied: usize,
    /// Denial reasons by frequency, most frequent first.
    pub top_reasons: Vec<ReasonCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonCount {
    pub reason: String,
    pub count: usize,
}

/// Tally the audit history into a period report.
pub fn period_report(index: &AuditIndex, generated_at: NaiveDateTime) -> PeriodReport {
    let mut authorized = 0usize;
    let mut denied = 0usize;
    let mut reasons: HashMap<String, usize> = HashMap::new();
    for event in index.events() {
        match event.kind {
            AuditKind::Authorized => authorized += 1,
            AuditKind::Denied => {
                denied += 1;
                *reasons.entry(event.reason.clone()).or_insert(0) += 1;
            }
        }
    }
    let mut top_reasons: Vec<ReasonCount> = reasons
        .into_iter()
        .map(|(reason, count)| ReasonCount { reason, count })
        .collect();
    top_reasons.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.reason.cmp(&b.reason)));
    top_reasons.truncate(MAX_REPORTED_REASONS);
    PeriodReport {
        generated_at,
        authorized,
        denied,
        top_reasons,
    }
}

pub fn render_report(report: &PeriodReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Operations report - {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Authorized releases: {}", report.authorized);
    let _ = writeln!(out, "Denied releases: {}", report.denied);
    let _ = writeln!(out);
    let _ = writeln!(out, "Most frequent denial reasons:");
    if report.top_reasons.is_empty() {
        let _ = writeln!(out, "  none");
    }
    for reason in &report.top_reasons {
        let _ = writeln!(out, "  {}: {}", reason.reason, reason.count);
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Note: average queue wait is not computed; admissions are not\n\
         correlated with releases in the audit history."
    );
    out
}

/// Write the report under `relatorios/` as `operacao_<YYYYMMDD>.txt` and
/// return the path.
pub fn write_report(config: &Config, report: &PeriodReport) -> Result<PathBuf, TorreError> {
    let dir = config.report_dir();
    std::fs::create_dir_all(&dir)?;
    let path = dir.join(format!(
        "operacao_{}.txt",
        report.generated_at.format("%Y%m%d")
    ));
    std::fs::write(&path, render_report(report))?;
    Ok(path)
}
