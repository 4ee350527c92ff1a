//! Flight plan registry parsing.

use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

use chrono::NaiveTime;
use serde::Deserialize;
use tracing::warn;

use torre_core::{FlightCategory, FlightPlan, TorreError};

use super::{check_columns, parse_hhmm, read_registry};

const REQUIRED_COLUMNS: [&str; 9] = [
    "voo",
    "origem",
    "destino",
    "etd",
    "eta",
    "aeronave",
    "tipo",
    "prioridade",
    "pista_pref",
];

#[derive(Debug, Deserialize)]
struct PlanRow {
    voo: String,
    origem: String,
    destino: String,
    etd: String,
    eta: String,
    aeronave: String,
    tipo: String,
    prioridade: String,
    pista_pref: String,
}

impl TryFrom<PlanRow> for FlightPlan {
    type Error = String;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        if row.voo.is_empty() {
            return Err("empty flight id".into());
        }
        let departure_time =
            parse_hhmm(&row.etd).ok_or_else(|| format!("bad etd {:?}", row.etd))?;
        let arrival_time = parse_hhmm(&row.eta).ok_or_else(|| format!("bad eta {:?}", row.eta))?;
        let category = FlightCategory::from_wire(&row.tipo)
            .ok_or_else(|| format!("unknown category {:?}", row.tipo))?;
        let priority = row
            .prioridade
            .parse::<i32>()
            .map_err(|_| format!("bad priority {:?}", row.prioridade))?;
        Ok(FlightPlan {
            flight_id: row.voo,
            origin: row.origem,
            destination: row.destino,
            departure_time,
            arrival_time,
            aircraft_type: row.aeronave,
            category,
            priority,
            preferred_runway: row.pista_pref,
        })
    }
}

/// Load every usable plan row. Duplicate `(flight, etd)` pairs keep the
/// first occurrence.
pub fn load_flight_plans(path: &Path) -> Result<Vec<FlightPlan>, TorreError> {
    let text = read_registry(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(text));
    check_columns(path, &mut reader, &REQUIRED_COLUMNS)?;

    let mut plans: Vec<FlightPlan> = Vec::new();
    let mut seen: HashSet<(String, NaiveTime)> = HashSet::new();
    for (i, result) in reader.deserialize::<PlanRow>().enumerate() {
        let line = i + 2; // line 1 is the header
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                warn!(path = %path.display(), line, error = %err, "skipping unreadable plan row");
                continue;
            }
        };
        match FlightPlan::try_from(row) {
            Ok(plan) => {
                if !seen.insert((plan.flight_id.clone(), plan.departure_time)) {
                    warn!(
                        path = %path.display(),
                        line,
                        flight = %plan.flight_id,
                        "duplicate (flight, etd) pair; keeping the first"
                    );
                    continue;
                }
                plans.push(plan);
            }
            Err(detail) => {
                warn!(path = %path.display(), line, detail = %detail, "skipping invalid plan row");
            }
        }
    }
    Ok(plans)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "voo,origem,destino,etd,eta,aeronave,tipo,prioridade,pista_pref\n";

    fn write_plans(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planos_voo.csv");
        std::fs::write(&path, format!("{HEADER}{body}")).unwrap();
        (dir, path)
    }

    #[test]
    fn loads_well_formed_rows() {
        let (_dir, path) = write_plans(
            "AZ100,GRU,GIG,08:30,09:40,B737,COMERCIAL,2,10/28\n\
             CG300,VCP,MAO,09:00,13:00,B747,CARGA,1,01/19\n",
        );
        let plans = load_flight_plans(&path).unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].flight_id, "AZ100");
        assert_eq!(plans[0].category, FlightCategory::Commercial);
        assert_eq!(plans[0].departure_time, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(plans[1].priority, 1);
    }

    #[test]
    fn duplicate_flight_and_etd_keeps_the_first_row() {
        let (_dir, path) = write_plans(
            "AZ100,GRU,GIG,08:30,09:40,B737,COMERCIAL,2,10/28\n\
             AZ100,GRU,SSA,08:30,11:00,A320,COMERCIAL,5,01/19\n\
             AZ100,GRU,GIG,10:00,11:10,B737,COMERCIAL,2,10/28\n",
        );
        let plans = load_flight_plans(&path).unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].destination, "GIG");
        assert_eq!(plans[0].priority, 2);
    }

    #[test]
    fn unparsable_rows_are_skipped() {
        let (_dir, path) = write_plans(
            "AZ100,GRU,GIG,08:30,09:40,B737,COMERCIAL,2,10/28\n\
             BAD01,GRU,GIG,nope,09:40,B737,COMERCIAL,2,10/28\n\
             BAD02,GRU,GIG,08:30,09:40,B737,CHARTER,2,10/28\n\
             BAD03,GRU,GIG,08:30,09:40,B737,COMERCIAL,high,10/28\n\
             ,GRU,GIG,08:30,09:40,B737,COMERCIAL,2,10/28\n",
        );
        let plans = load_flight_plans(&path).unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].flight_id, "AZ100");
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planos_voo.csv");
        std::fs::write(&path, "voo,origem,destino,etd,eta,aeronave,tipo,prioridade\n").unwrap();
        let err = load_flight_plans(&path).unwrap_err();
        assert!(matches!(err, TorreError::InvalidRegistry { .. }));
        assert!(err.to_string().contains("pista_pref"));
    }

    #[test]
    fn missing_file_is_reported_as_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_flight_plans(&dir.path().join("planos_voo.csv")).unwrap_err();
        assert!(matches!(err, TorreError::DataUnavailable { .. }));
    }
}
