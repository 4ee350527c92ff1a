//! Core data models for the tower system.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// A flight declared in the flight plan registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightPlan {
    pub flight_id: String,
    pub origin: String,
    pub destination: String,
    /// Scheduled departure time (ETD)
    pub departure_time: NaiveTime,
    /// Scheduled arrival time (ETA)
    pub arrival_time: NaiveTime,
    pub aircraft_type: String,
    pub category: FlightCategory,
    /// Higher value means more urgent
    pub priority: i32,
    pub preferred_runway: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightCategory {
    Emergency,
    Commercial,
    Cargo,
}

impl FlightCategory {
    /// Parse a registry token (EMERGENCIA, COMERCIAL, CARGA).
    pub fn from_wire(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "EMERGENCIA" => Some(Self::Emergency),
            "COMERCIAL" => Some(Self::Commercial),
            "CARGA" => Some(Self::Cargo),
            _ => None,
        }
    }

    /// Listing rank: emergencies first, then commercial, then cargo.
    pub fn rank(self) -> u8 {
        match self {
            Self::Emergency => 0,
            Self::Commercial => 1,
            Self::Cargo => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Emergency => "EMERGENCIA",
            Self::Commercial => "COMERCIAL",
            Self::Cargo => "CARGA",
        }
    }
}

/// Operational state of one runway, as declared in the runway registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunwayState {
    pub runway_id: String,
    pub status: RunwayStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunwayStatus {
    Open,
    Closed,
}

impl RunwayStatus {
    /// Any token other than ABERTA counts as closed.
    pub fn from_wire(token: &str) -> Self {
        if token.trim() == "ABERTA" {
            Self::Open
        } else {
            Self::Closed
        }
    }

    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// One timestamped weather report line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub time: NaiveTime,
    /// Visibility in kilometers, when the report carries a VIS group.
    pub visibility_km: Option<u32>,
    /// The report text as read from the registry.
    pub raw: String,
}

impl WeatherSample {
    /// Sample in effect at `now`: the latest one at or before `now`.
    /// When every sample is later than `now`, the earliest applies.
    pub fn in_effect_at(samples: &[WeatherSample], now: NaiveTime) -> Option<&WeatherSample> {
        samples
            .iter()
            .filter(|s| s.time <= now)
            .max_by_key(|s| s.time)
            .or_else(|| samples.iter().min_by_key(|s| s.time))
    }
}

/// Closed time interval within one operational day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Inclusive at both endpoints. A window with `end < start` matches nothing.
    pub fn contains(&self, t: NaiveTime) -> bool {
        self.start <= t && t <= self.end
    }
}

/// A published operational notice, possibly scoped to a runway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    /// Effective window, when the notice declares one.
    pub window: Option<TimeWindow>,
    /// The notice text as read from the registry.
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdvisoryKind {
    /// Closes a specific runway for the window.
    RunwayClosure { runway_id: String },
    /// Informational notice with no runway effect.
    General,
}

impl Advisory {
    /// A notice without a window is never active.
    pub fn is_active_at(&self, now: NaiveTime) -> bool {
        self.window.is_some_and(|w| w.contains(now))
    }

    /// Whether this notice closes `runway_id` at `now`.
    pub fn blocks_runway(&self, runway_id: &str, now: NaiveTime) -> bool {
        match &self.kind {
            AdvisoryKind::RunwayClosure { runway_id: closed } => {
                closed == runway_id && self.is_active_at(now)
            }
            AdvisoryKind::General => false,
        }
    }
}

/// Which of the two operational queues an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueKind {
    Departure,
    Arrival,
}

impl QueueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Departure => "departure",
            Self::Arrival => "arrival",
        }
    }

    /// Token used in audit lines (DEPARTURE / ARRIVAL).
    pub fn audit_token(self) -> &'static str {
        match self {
            Self::Departure => "DEPARTURE",
            Self::Arrival => "ARRIVAL",
        }
    }

    pub fn from_audit_token(token: &str) -> Option<Self> {
        match token {
            "DEPARTURE" => Some(Self::Departure),
            "ARRIVAL" => Some(Self::Arrival),
            _ => None,
        }
    }
}

impl std::fmt::Display for QueueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One queued flight awaiting release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub flight_id: String,
    /// Scheduled time copied from the plan at admission.
    pub scheduled_time: NaiveTime,
    pub priority: i32,
    pub preferred_runway: String,
    pub kind: QueueKind,
}

impl QueueEntry {
    /// Build an entry from a plan. The plan's ETD orders the entry in
    /// either queue.
    pub fn from_plan(plan: &FlightPlan, kind: QueueKind) -> Self {
        Self {
            flight_id: plan.flight_id.clone(),
            scheduled_time: plan.departure_time,
            priority: plan.priority,
            preferred_runway: plan.preferred_runway.clone(),
            kind,
        }
    }
}

/// One pilot from the roster registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotRecord {
    pub pilot_id: String,
    pub name: String,
    pub license: String,
    /// Aircraft type code the pilot is rated for.
    pub certification: String,
    pub expires_on: NaiveDate,
}

impl PilotRecord {
    /// Case-insensitive substring match between the certification code and
    /// the aircraft type. A rating of `B7` therefore matches `B737`; rosters
    /// are expected to carry full type codes.
    pub fn certified_for(&self, aircraft_type: &str) -> bool {
        aircraft_type
            .to_uppercase()
            .contains(&self.certification.to_uppercase())
    }

    pub fn certification_valid_on(&self, date: NaiveDate) -> bool {
        self.expires_on >= date
    }
}

/// First roster entry rated for the aircraft type, in roster order.
pub fn first_qualified_pilot<'a>(
    roster: &'a [PilotRecord],
    aircraft_type: &str,
) -> Option<&'a PilotRecord> {
    roster.iter().find(|p| p.certified_for(aircraft_type))
}

/// One aircraft type from the fleet registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetRecord {
    pub aircraft_type: String,
    /// Minimum runway length in meters. Retained for the length gate.
    pub min_runway_len_m: u32,
    pub notes: String,
}

impl FleetRecord {
    /// Runway length gate. The runway registry carries no length data, so
    /// every pairing passes.
    pub fn permits_runway(&self, _runway_id: &str) -> bool {
        true
    }
}
