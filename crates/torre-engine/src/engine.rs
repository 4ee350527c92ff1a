//! Queue admission and runway release.
//!
//! The engine owns the mutable state (queue store and audit history)
//! behind mutexes and works against an immutable registry snapshot.
//! Callers pass `now` explicitly; nothing below this line reads a clock.
//!
//! Lock order: store before audit.

use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDateTime;
use tracing::{info, warn};

use torre_core::{
    evaluate_runway, first_qualified_pilot, select_candidate, AuditEvent, AuditKind, Decision,
    DenyReason, QueueEntry, QueueKind, ReleaseRules, TorreError,
};

use crate::audit_log::AuditLog;
use crate::registry::Registry;
use crate::report::{period_report, status_snapshot, PeriodReport, StatusSnapshot};
use crate::store::QueueStore;

pub struct Engine {
    registry: Registry,
    rules: ReleaseRules,
    store: Mutex<QueueStore>,
    audit: Mutex<AuditLog>,
}

/// What an admission produced.
#[derive(Debug, Clone)]
pub struct Admission {
    pub entry: QueueEntry,
    pub pilot_id: String,
    pub pilot_name: String,
    /// Set when the fleet registry could not vouch for the pairing.
    pub fleet_warning: Option<String>,
}

/// What a release attempt decided. Refusals are outcomes, not errors.
#[derive(Debug, Clone)]
pub enum Release {
    Authorized { entry: QueueEntry, runway_id: String },
    Denied(DenyReason),
    /// Nothing is waiting; not recorded in the audit history.
    QueueEmpty,
    /// Entries exist but none resolves to a plan; not recorded either.
    NoEligibleFlight,
}

impl Engine {
    pub fn new(registry: Registry, store: QueueStore, audit: AuditLog) -> Self {
        Self {
            registry,
            rules: ReleaseRules::default(),
            store: Mutex::new(store),
            audit: Mutex::new(audit),
        }
    }

    pub fn with_rules(mut self, rules: ReleaseRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Admit a flight to a queue. The plan must exist, the flight must not
    /// already be queued anywhere, and a pilot with a valid rating must be
    /// available. Fleet problems only warn.
    pub fn enqueue(
        &self,
        flight_id: &str,
        kind: QueueKind,
        now: NaiveDateTime,
    ) -> Result<Admission, TorreError> {
        let plan = self
            .registry
            .plan(flight_id)
            .ok_or_else(|| TorreError::PlanNotFound {
                flight_id: flight_id.to_string(),
            })?;

        let mut store = self.lock_store()?;
        if store.contains(flight_id) {
            return Err(TorreError::AlreadyQueued {
                flight_id: flight_id.to_string(),
            });
        }

        let pilot =
            first_qualified_pilot(&self.registry.pilots, &plan.aircraft_type).ok_or_else(|| {
                TorreError::NoQualifiedPilot {
                    aircraft_type: plan.aircraft_type.clone(),
                }
            })?;
        if !pilot.certification_valid_on(now.date()) {
            return Err(TorreError::ExpiredCertification {
                pilot_id: pilot.pilot_id.clone(),
                expires_on: pilot.expires_on,
            });
        }

        let fleet_warning = match self.registry.fleet_record(&plan.aircraft_type) {
            Some(record) if record.permits_runway(&plan.preferred_runway) => None,
            Some(_) => {
                let message = format!(
                    "aircraft {} may not fit runway {}",
                    plan.aircraft_type, plan.preferred_runway
                );
                warn!(flight = flight_id, "{message}");
                Some(message)
            }
            None => {
                let message = format!(
                    "aircraft type {} is not in the fleet registry",
                    plan.aircraft_type
                );
                warn!(flight = flight_id, "{message}");
                Some(message)
            }
        };

        let entry = QueueEntry::from_plan(plan, kind);
        store.enqueue(entry.clone())?;
        info!(
            flight = flight_id,
            pilot = %pilot.pilot_id,
            queue = %kind,
            "flight admitted; pilot assigned"
        );
        Ok(Admission {
            entry,
            pilot_id: pilot.pilot_id.clone(),
            pilot_name: pilot.name.clone(),
            fleet_warning,
        })
    }

    /// Try to release the next eligible flight in `kind` onto `runway_id`.
    ///
    /// An empty queue returns before any runway check and leaves no audit
    /// trace. Runway-level refusals are audited without a flight. A release
    /// removes the candidate from the queue and audits it.
    pub fn authorize(
        &self,
        kind: QueueKind,
        runway_id: &str,
        now: NaiveDateTime,
    ) -> Result<Release, TorreError> {
        let mut store = self.lock_store()?;
        let mut audit = self.lock_audit()?;

        if store.is_empty(kind) {
            return Ok(Release::QueueEmpty);
        }

        let recent = audit.releases_within(now, self.rules.low_visibility_window_min);
        let facts = self.registry.facts_at(now.time(), recent);
        if let Decision::Deny(reason) = evaluate_runway(runway_id, &facts, &self.rules) {
            audit.append(AuditEvent {
                at: now,
                kind: AuditKind::Denied,
                queue: kind,
                flight_id: None,
                runway_id: runway_id.to_string(),
                reason: reason.code().to_string(),
            })?;
            info!(queue = %kind, runway = runway_id, reason = reason.code(), "release denied");
            return Ok(Release::Denied(reason));
        }

        for entry in store.entries(kind) {
            if self.registry.plan(&entry.flight_id).is_none() {
                warn!(
                    flight = %entry.flight_id,
                    "queued flight has no plan in the registry; skipping"
                );
            }
        }
        let candidate = select_candidate(store.entries(kind), &self.registry.plans)
            .map(|(entry, _)| entry.flight_id.clone());
        let Some(flight_id) = candidate else {
            return Ok(Release::NoEligibleFlight);
        };

        let entry = store.remove(kind, &flight_id)?;
        audit.append(AuditEvent {
            at: now,
            kind: AuditKind::Authorized,
            queue: kind,
            flight_id: Some(flight_id),
            runway_id: runway_id.to_string(),
            reason: "ok".to_string(),
        })?;
        info!(flight = %entry.flight_id, queue = %kind, runway = runway_id, "flight released");
        Ok(Release::Authorized {
            entry,
            runway_id: runway_id.to_string(),
        })
    }

    pub fn status(&self, now: NaiveDateTime) -> Result<StatusSnapshot, TorreError> {
        let store = self.lock_store()?;
        Ok(status_snapshot(&self.registry, &store, now))
    }

    pub fn period_report(&self, now: NaiveDateTime) -> Result<PeriodReport, TorreError> {
        let audit = self.lock_audit()?;
        Ok(period_report(audit.index(), now))
    }

    fn lock_store(&self) -> Result<MutexGuard<'_, QueueStore>, TorreError> {
        self.store.lock().map_err(|_| TorreError::StatePoisoned)
    }

    fn lock_audit(&self) -> Result<MutexGuard<'_, AuditLog>, TorreError> {
        self.audit.lock().map_err(|_| TorreError::StatePoisoned)
    }
}
