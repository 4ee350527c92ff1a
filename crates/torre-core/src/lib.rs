pub mod audit;
pub mod eligibility;
pub mod error;
pub mod models;
pub mod queue;
pub mod rules;

pub use audit::{AuditEvent, AuditIndex, AuditKind};
pub use eligibility::{evaluate_runway, select_candidate, Decision, DenyReason, FactSnapshot};
pub use error::TorreError;
pub use models::{
    first_qualified_pilot, Advisory, AdvisoryKind, FleetRecord, FlightCategory, FlightPlan,
    PilotRecord, QueueEntry, QueueKind, RunwayState, RunwayStatus, TimeWindow, WeatherSample,
};
pub use queue::{contains_flight, queue_order, sort_entries};
pub use rules::ReleaseRules;
