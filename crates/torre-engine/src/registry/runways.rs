//! Runway registry parsing.

use std::path::Path;

use tracing::warn;

use torre_core::{RunwayState, RunwayStatus, TorreError};

use super::read_registry;

/// Load runway states. Lines are `id, STATUS`; a repeated id keeps the
/// last declaration.
pub fn load_runways(path: &Path) -> Result<Vec<RunwayState>, TorreError> {
    let text = read_registry(path)?;
    let mut runways: Vec<RunwayState> = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let Some((id, status)) = line.split_once(',') else {
            warn!(path = %path.display(), line = i + 1, "skipping malformed runway line");
            continue;
        };
        let id = id.trim();
        if id.is_empty() {
            warn!(path = %path.display(), line = i + 1, "skipping runway line with empty id");
            continue;
        }
        let token = status.trim();
        if token != "ABERTA" && token != "FECHADA" {
            warn!(
                path = %path.display(),
                line = i + 1,
                token,
                "unknown runway status token; treating as closed"
            );
        }
        let status = RunwayStatus::from_wire(token);
        match runways.iter_mut().find(|r| r.runway_id == id) {
            Some(existing) => existing.status = status,
            None => runways.push(RunwayState {
                runway_id: id.to_string(),
                status,
            }),
        }
    }
    Ok(runways)
}
