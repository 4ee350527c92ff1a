//! Error taxonomy for tower operations.
//!
//! Refusals to release a flight are not errors; they travel as
//! [`DenyReason`](crate::eligibility::DenyReason) values in the success
//! channel. The variants here are hard failures that abort a command.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::QueueKind;

#[derive(Debug, Error)]
pub enum TorreError {
    /// A required registry file is missing or unreadable.
    #[error("required data file unavailable: {}", .path.display())]
    DataUnavailable { path: PathBuf },

    /// Import precheck: every missing registry file, in one message.
    #[error("required data files missing: {}", join_paths(.paths))]
    MissingRegistries { paths: Vec<PathBuf> },

    /// A registry file exists but its structure cannot be used.
    #[error("invalid registry {}: {}", .path.display(), .detail)]
    InvalidRegistry { path: PathBuf, detail: String },

    #[error("flight {flight_id} not found in the flight plan registry")]
    PlanNotFound { flight_id: String },

    #[error("flight {flight_id} is already queued")]
    AlreadyQueued { flight_id: String },

    /// Store-level guard for the cross-queue uniqueness invariant.
    #[error("flight {flight_id} is already present in a queue")]
    DuplicateEntry { flight_id: String },

    #[error("flight {flight_id} is not in the {queue} queue")]
    NotFound { flight_id: String, queue: QueueKind },

    #[error("no pilot in the roster is rated for aircraft type {aircraft_type}")]
    NoQualifiedPilot { aircraft_type: String },

    #[error("pilot {pilot_id} certification expired on {expires_on}")]
    ExpiredCertification { pilot_id: String, expires_on: NaiveDate },

    /// A lock was poisoned by a panic in an earlier operation.
    #[error("internal state lock poisoned")]
    StatePoisoned,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
