//! Release eligibility rules.
//!
//! A release decision looks at the runway first and the queue second.
//! Runway checks run in a fixed order (existence, declared status, active
//! closures, visibility) and the first failure wins. Candidate selection
//! then picks which queued flight takes the cleared runway.

use chrono::NaiveTime;

use crate::models::{
    Advisory, FlightCategory, FlightPlan, QueueEntry, RunwayState, RunwayStatus, WeatherSample,
};
use crate::rules::ReleaseRules;

/// Immutable bundle of operational facts captured for one decision.
///
/// The engine assembles a snapshot once per command; the rules below never
/// read clocks or files themselves.
#[derive(Debug, Clone)]
pub struct FactSnapshot {
    pub now: NaiveTime,
    pub runways: Vec<RunwayState>,
    /// Weather sample in effect at `now`, if any report exists.
    pub weather: Option<WeatherSample>,
    pub advisories: Vec<Advisory>,
    /// Releases already recorded inside the trailing low-visibility window.
    pub recent_releases: usize,
}

impl FactSnapshot {
    pub fn runway_status(&self, runway_id: &str) -> Option<RunwayStatus> {
        self.runways
            .iter()
            .find(|r| r.runway_id == runway_id)
            .map(|r| r.status)
    }

    /// Advisory currently closing `runway_id`, if any.
    pub fn blocking_advisory(&self, runway_id: &str) -> Option<&Advisory> {
        self.advisories
            .iter()
            .find(|a| a.blocks_runway(runway_id, self.now))
    }
}

/// Outcome of a runway eligibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

/// Why a release was refused. A refusal is a recorded outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    UnknownRunway { runway_id: String },
    RunwayClosed { runway_id: String },
    AdvisoryBlock { advisory: String },
    LowVisibility { visibility_km: u32 },
}

impl DenyReason {
    /// Stable token recorded in audit lines and tallied in reports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownRunway { .. } => "unknown_runway",
            Self::RunwayClosed { .. } => "runway_closed",
            Self::AdvisoryBlock { .. } => "advisory_block",
            Self::LowVisibility { .. } => "low_visibility",
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownRunway { runway_id } => {
                write!(f, "runway {runway_id} is not listed in the runway registry")
            }
            Self::RunwayClosed { runway_id } => write!(f, "runway {runway_id} is closed"),
            Self::AdvisoryBlock { advisory } => {
                write!(f, "runway blocked by advisory: {advisory}")
            }
            Self::LowVisibility { visibility_km } => write!(
                f,
                "low visibility ({visibility_km} km): a release was already authorized in the current window"
            ),
        }
    }
}

/// Runway-level checks, in order: the runway must be listed, declared open,
/// free of active closure advisories, and clear of the low-visibility limit.
pub fn evaluate_runway(runway_id: &str, facts: &FactSnapshot, rules: &ReleaseRules) -> Decision {
    match facts.runway_status(runway_id) {
        None => {
            return Decision::Deny(DenyReason::UnknownRunway {
                runway_id: runway_id.to_string(),
            })
        }
        Some(RunwayStatus::Closed) => {
            return Decision::Deny(DenyReason::RunwayClosed {
                runway_id: runway_id.to_string(),
            })
        }
        Some(RunwayStatus::Open) => {}
    }

    if let Some(advisory) = facts.blocking_advisory(runway_id) {
        return Decision::Deny(DenyReason::AdvisoryBlock {
            advisory: advisory.raw.clone(),
        });
    }

    if let Some(vis) = facts.weather.as_ref().and_then(|w| w.visibility_km) {
        if vis < rules.low_visibility_km && facts.recent_releases > 0 {
            return Decision::Deny(DenyReason::LowVisibility { visibility_km: vis });
        }
    }

    Decision::Allow
}

/// Pick the entry to release from an ordered queue view.
///
/// Entries whose plan no longer resolves are skipped without blocking the
/// queue. A resolvable emergency wins over any earlier non-emergency entry;
/// otherwise the first resolvable entry wins.
pub fn select_candidate<'a>(
    entries: &'a [QueueEntry],
    plans: &'a [FlightPlan],
) -> Option<(&'a QueueEntry, &'a FlightPlan)> {
    let mut fallback = None;
    for entry in entries {
        let Some(plan) = plans.iter().find(|p| p.flight_id == entry.flight_id) else {
            continue;
        };
        if plan.category == FlightCategory::Emergency {
            return Some((entry, plan));
        }
        if fallback.is_none() {
            fallback = Some((entry, plan));
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QueueKind;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn open_runway(id: &str) -> RunwayState {
        RunwayState { runway_id: id.into(), status: RunwayStatus::Open }
    }

    fn facts(now: NaiveTime) -> FactSnapshot {
        FactSnapshot {
            now,
            runways: vec![open_runway("10/28")],
            weather: None,
            advisories: vec![],
            recent_releases: 0,
        }
    }

    fn plan(flight_id: &str, category: FlightCategory, priority: i32) -> FlightPlan {
        FlightPlan {
            flight_id: flight_id.into(),
            origin: "GRU".into(),
            destination: "GIG".into(),
            departure_time: t(8, 0),
            arrival_time: t(9, 0),
            aircraft_type: "B737".into(),
            category,
            priority,
            preferred_runway: "10/28".into(),
        }
    }

    fn entry_for(plan: &FlightPlan) -> QueueEntry {
        QueueEntry::from_plan(plan, QueueKind::Departure)
    }

    #[test]
    fn unlisted_runway_is_denied() {
        let decision = evaluate_runway("99/99", &facts(t(10, 0)), &ReleaseRules::default());
        assert_eq!(
            decision,
            Decision::Deny(DenyReason::UnknownRunway { runway_id: "99/99".into() })
        );
    }

    #[test]
    fn closed_runway_is_denied() {
        let mut facts = facts(t(10, 0));
        facts.runways = vec![RunwayState {
            runway_id: "10/28".into(),
            status: RunwayStatus::Closed,
        }];
        let decision = evaluate_runway("10/28", &facts, &ReleaseRules::default());
        assert_eq!(
            decision,
            Decision::Deny(DenyReason::RunwayClosed { runway_id: "10/28".into() })
        );
    }

    #[test]
    fn active_closure_advisory_denies_inside_window_only() {
        let advisory = Advisory {
            kind: crate::models::AdvisoryKind::RunwayClosure { runway_id: "10/28".into() },
            window: Some(crate::models::TimeWindow { start: t(14, 0), end: t(16, 0) }),
            raw: "PISTA 10/28 FECHADA 14:00-16:00 MANUTENCAO".into(),
        };

        let mut blocked = facts(t(15, 0));
        blocked.advisories = vec![advisory.clone()];
        let decision = evaluate_runway("10/28", &blocked, &ReleaseRules::default());
        assert_eq!(
            decision,
            Decision::Deny(DenyReason::AdvisoryBlock { advisory: advisory.raw.clone() })
        );

        let mut clear = facts(t(17, 0));
        clear.advisories = vec![advisory];
        let decision = evaluate_runway("10/28", &clear, &ReleaseRules::default());
        assert_eq!(decision, Decision::Allow);
    }

    #[test]
    fn low_visibility_limits_to_one_release_per_window() {
        let sample = WeatherSample {
            time: t(10, 0),
            visibility_km: Some(4),
            raw: "10:00 METAR VIS 4KM".into(),
        };

        let mut first = facts(t(10, 5));
        first.weather = Some(sample.clone());
        assert_eq!(
            evaluate_runway("10/28", &first, &ReleaseRules::default()),
            Decision::Allow
        );

        let mut second = facts(t(10, 5));
        second.weather = Some(sample);
        second.recent_releases = 1;
        assert_eq!(
            evaluate_runway("10/28", &second, &ReleaseRules::default()),
            Decision::Deny(DenyReason::LowVisibility { visibility_km: 4 })
        );
    }

    #[test]
    fn good_visibility_ignores_recent_releases() {
        let mut facts = facts(t(10, 5));
        facts.weather = Some(WeatherSample {
            time: t(10, 0),
            visibility_km: Some(9),
            raw: "10:00 METAR VIS 9KM".into(),
        });
        facts.recent_releases = 3;
        assert_eq!(
            evaluate_runway("10/28", &facts, &ReleaseRules::default()),
            Decision::Allow
        );
    }

    #[test]
    fn report_without_visibility_group_imposes_no_limit() {
        let mut facts = facts(t(10, 5));
        facts.weather = Some(WeatherSample {
            time: t(10, 0),
            visibility_km: None,
            raw: "10:00 METAR CAVOK".into(),
        });
        facts.recent_releases = 2;
        assert_eq!(
            evaluate_runway("10/28", &facts, &ReleaseRules::default()),
            Decision::Allow
        );
    }

    #[test]
    fn emergency_preempts_earlier_higher_priority_entry() {
        let commercial = plan("AZ100", FlightCategory::Commercial, 9);
        let emergency = plan("AZ999", FlightCategory::Emergency, 1);
        let plans = vec![commercial.clone(), emergency.clone()];
        let entries = vec![entry_for(&commercial), entry_for(&emergency)];

        let (entry, plan) = select_candidate(&entries, &plans).unwrap();
        assert_eq!(entry.flight_id, "AZ999");
        assert_eq!(plan.category, FlightCategory::Emergency);
    }

    #[test]
    fn without_emergencies_the_first_entry_wins() {
        let a = plan("AZ100", FlightCategory::Commercial, 5);
        let b = plan("CG200", FlightCategory::Cargo, 3);
        let plans = vec![a.clone(), b.clone()];
        let entries = vec![entry_for(&a), entry_for(&b)];

        let (entry, _) = select_candidate(&entries, &plans).unwrap();
        assert_eq!(entry.flight_id, "AZ100");
    }

    #[test]
    fn entries_without_a_plan_are_skipped() {
        let known = plan("AZ100", FlightCategory::Commercial, 1);
        let ghost = plan("GH000", FlightCategory::Commercial, 9);
        let plans = vec![known.clone()];
        let entries = vec![entry_for(&ghost), entry_for(&known)];

        let (entry, _) = select_candidate(&entries, &plans).unwrap();
        assert_eq!(entry.flight_id, "AZ100");

        let orphans = vec![entry_for(&ghost)];
        assert!(select_candidate(&orphans, &plans).is_none());
        assert!(select_candidate(&[], &plans).is_none());
    }
}
