//! Pilot roster parsing.

use std::io::Cursor;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use torre_core::{PilotRecord, TorreError};

use super::{check_columns, read_registry};

const REQUIRED_COLUMNS: [&str; 5] = ["matricula", "nome", "licenca", "habilitacao", "validade"];

#[derive(Debug, Deserialize)]
struct PilotRow {
    matricula: String,
    nome: String,
    licenca: String,
    habilitacao: String,
    validade: String,
}

/// Load the roster in file order; admission picks the first match, so the
/// order here is load-bearing.
pub fn load_pilots(path: &Path) -> Result<Vec<PilotRecord>, TorreError> {
    let text = read_registry(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(text));
    check_columns(path, &mut reader, &REQUIRED_COLUMNS)?;

    let mut pilots: Vec<PilotRecord> = Vec::new();
    for (i, result) in reader.deserialize::<PilotRow>().enumerate() {
        let line = i + 2;
        let row = match result {
            Ok(row) => row,
            Err(err) => {
                warn!(path = %path.display(), line, error = %err, "skipping unreadable pilot row");
                continue;
            }
        };
        if row.matricula.is_empty() || row.habilitacao.is_empty() {
            warn!(path = %path.display(), line, "skipping pilot row with empty id or rating");
            continue;
        }
        let Ok(expires_on) = NaiveDate::parse_from_str(&row.validade, "%Y-%m-%d") else {
            warn!(
                path = %path.display(),
                line,
                pilot = %row.matricula,
                value = %row.validade,
                "skipping pilot row with bad expiry date"
            );
            continue;
        };
        pilots.push(PilotRecord {
            pilot_id: row.matricula,
            name: row.nome,
            license: row.licenca,
            certification: row.habilitacao,
            expires_on,
        });
    }
    Ok(pilots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_pilots_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pilotos.csv");
        std::fs::write(
            &path,
            "matricula,nome,licenca,habilitacao,validade\n\
             P1,Ana Souza,ATP,A320,2030-01-01\n\
             P2,Bruno Lima,ATP,B737,2029-06-30\n",
        )
        .unwrap();
        let pilots = load_pilots(&path).unwrap();
        assert_eq!(pilots.len(), 2);
        assert_eq!(pilots[0].pilot_id, "P1");
        assert_eq!(pilots[1].certification, "B737");
        assert_eq!(
            pilots[1].expires_on,
            NaiveDate::from_ymd_opt(2029, 6, 30).unwrap()
        );
    }

    #[test]
    fn rows_with_bad_expiry_dates_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pilotos.csv");
        std::fs::write(
            &path,
            "matricula,nome,licenca,habilitacao,validade\n\
             P1,Ana Souza,ATP,A320,31/12/2030\n\
             P2,Bruno Lima,ATP,B737,2029-06-30\n",
        )
        .unwrap();
        let pilots = load_pilots(&path).unwrap();
        assert_eq!(pilots.len(), 1);
        assert_eq!(pilots[0].pilot_id, "P2");
    }
}
