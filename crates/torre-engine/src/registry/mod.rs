//! File-backed registry loading.
//!
//! Every registry is a flat file read in full on each command. Rows that
//! fail to parse are skipped with a warning; a missing file or an unusable
//! header aborts the command instead.

pub mod advisories;
pub mod fleet;
pub mod pilots;
pub mod plans;
pub mod runways;
pub mod weather;

use std::io::{self, Cursor};
use std::path::{Path, PathBuf};

use chrono::NaiveTime;

use torre_core::{
    Advisory, FactSnapshot, FleetRecord, FlightPlan, PilotRecord, RunwayState, TorreError,
    WeatherSample,
};

use crate::config::Config;

/// Normalized view over every registry file, loaded once per invocation.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pub plans: Vec<FlightPlan>,
    pub runways: Vec<RunwayState>,
    pub fleet: Vec<FleetRecord>,
    pub pilots: Vec<PilotRecord>,
    pub weather: Vec<WeatherSample>,
    pub advisories: Vec<Advisory>,
}

impl Registry {
    pub fn load(config: &Config) -> Result<Self, TorreError> {
        Ok(Self {
            plans: plans::load_flight_plans(&config.flight_plans_path())?,
            runways: runways::load_runways(&config.runways_path())?,
            fleet: fleet::load_fleet(&config.fleet_path())?,
            pilots: pilots::load_pilots(&config.pilots_path())?,
            weather: weather::load_weather(&config.weather_path())?,
            advisories: advisories::load_advisories(&config.advisories_path())?,
        })
    }

    /// Import precheck: every registry file must exist, advisories included.
    /// Reports all missing files at once.
    pub fn verify_files(config: &Config) -> Result<(), TorreError> {
        let required = [
            config.flight_plans_path(),
            config.runways_path(),
            config.fleet_path(),
            config.pilots_path(),
            config.weather_path(),
            config.advisories_path(),
        ];
        let missing: Vec<PathBuf> = required.into_iter().filter(|p| !p.exists()).collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TorreError::MissingRegistries { paths: missing })
        }
    }

    pub fn plan(&self, flight_id: &str) -> Option<&FlightPlan> {
        self.plans.iter().find(|p| p.flight_id == flight_id)
    }

    pub fn fleet_record(&self, aircraft_type: &str) -> Option<&FleetRecord> {
        self.fleet.iter().find(|f| f.aircraft_type == aircraft_type)
    }

    /// Capture the facts one decision needs. `recent_releases` is the count
    /// of releases already inside the low-visibility window; the caller
    /// derives it from the audit history.
    pub fn facts_at(&self, now: NaiveTime, recent_releases: usize) -> FactSnapshot {
        FactSnapshot {
            now,
            runways: self.runways.clone(),
            weather: WeatherSample::in_effect_at(&self.weather, now).cloned(),
            advisories: self.advisories.clone(),
            recent_releases,
        }
    }
}

/// Read a registry file to a string. A missing file is reported as
/// [`TorreError::DataUnavailable`] so callers can name the file.
pub(crate) fn read_registry(path: &Path) -> Result<String, TorreError> {
    std::fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => TorreError::DataUnavailable {
            path: path.to_path_buf(),
        },
        _ => TorreError::Io(err),
    })
}

pub(crate) fn parse_hhmm(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

/// Fail with [`TorreError::InvalidRegistry`] unless every required column
/// is present in the CSV header.
pub(crate) fn check_columns(
    path: &Path,
    reader: &mut csv::Reader<Cursor<String>>,
    required: &[&str],
) -> Result<(), TorreError> {
    let headers = reader.headers().map_err(|err| TorreError::InvalidRegistry {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;
    for name in required {
        if !headers.iter().any(|h| h == *name) {
            return Err(TorreError::InvalidRegistry {
                path: path.to_path_buf(),
                detail: format!("missing required column '{name}'"),
            });
        }
    }
    Ok(())
}
