//! Fleet registry parsing.

use std::io::Cursor;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use torre_core::{FleetRecord, TorreError};

use super::{check_columns, read_registry};

const REQUIRED_COLUMNS: [&str; 2] = ["aeronave", "comprimento_min_pista"];

#[derive(Debug, Deserialize)]
struct FleetRow {
    aeronave: String,
    comprimento_min_pista: String,
    #[serde(default)]
    obs: String,
}

pub fn load_fleet(path: &Path) -> Result<Vec<FleetRecord>, TorreError> {
    let text = read_registry(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(text));
    check_columns(path, &mut reader, &REQUIRED_COLUMNS)?;

    let mut fleet: Vec<FleetRecord> = Vec::new();
    for (i, result) in reader.deserialize::<FleetRow>().enumerate() {
        let line = i + 2;
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                warn!(path = %path.display(), line, error = %err, "skipping unreadable fleet row");
                continue;
            }
        };
        if row.aeronave.is_empty() {
            warn!(path = %path.display(), line, "skipping fleet row with empty aircraft type");
            continue;
        }
        let Ok(min_runway_len_m) = row.comprimento_min_pista.parse::<u32>() else {
            warn!(
                path = %path.display(),
                line,
                value = %row.comprimento_min_pista,
                "skipping fleet row with bad minimum runway length"
            );
            continue;
        };
        fleet.push(FleetRecord {
            aircraft_type: row.aeronave,
            min_runway_len_m,
            notes: row.obs,
        });
    }
    Ok(fleet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_rows_and_tolerates_a_missing_obs_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frota.csv");
        std::fs::write(&path, "aeronave,comprimento_min_pista\nB737,1800\nA320,1900\n").unwrap();
        let fleet = load_fleet(&path).unwrap();
        assert_eq!(fleet.len(), 2);
        assert_eq!(fleet[0].aircraft_type, "B737");
        assert_eq!(fleet[0].min_runway_len_m, 1800);
        assert_eq!(fleet[0].notes, "");
    }

    #[test]
    fn bad_length_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frota.csv");
        std::fs::write(
            &path,
            "aeronave,comprimento_min_pista,obs\nB737,longa,cargueiro\nB747,3000,pesado\n",
        )
        .unwrap();
        let fleet = load_fleet(&path).unwrap();
        assert_eq!(fleet.len(), 1);
        assert_eq!(fleet[0].aircraft_type, "B747");
        assert_eq!(fleet[0].notes, "pesado");
    }

    #[test]
    fn missing_aircraft_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frota.csv");
        std::fs::write(&path, "comprimento_min_pista,obs\n1800,x\n").unwrap();
        assert!(matches!(
            load_fleet(&path).unwrap_err(),
            TorreError::InvalidRegistry { .. }
        ));
    }
}
