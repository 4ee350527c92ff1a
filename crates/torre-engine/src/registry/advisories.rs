//! Advisory (NOTAM-style) notice parsing.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use torre_core::{Advisory, AdvisoryKind, TimeWindow, TorreError};

use super::{parse_hhmm, read_registry};

/// Runway closure notice: `PISTA <id> FECHADA HH:MM-HH:MM <free text>`.
fn closure_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^PISTA (\S+) FECHADA (\d{2}:\d{2})-(\d{2}:\d{2})").unwrap())
}

/// Any other notice carrying a window: `<text> HH:MM-HH:MM`.
fn windowed_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.*) (\d{2}:\d{2})-(\d{2}:\d{2})").unwrap())
}

/// Load advisories. A missing file means no advisories, not a failure;
/// the import precheck is where absence gets flagged.
pub fn load_advisories(path: &Path) -> Result<Vec<Advisory>, TorreError> {
    let text = match read_registry(path) {
        Ok(text) => text,
        Err(TorreError::DataUnavailable { .. }) => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };

    let mut advisories: Vec<Advisory> = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let advisory = if let Some(captures) = closure_pattern().captures(line) {
            Advisory {
                kind: AdvisoryKind::RunwayClosure {
                    runway_id: captures[1].to_string(),
                },
                window: parse_window(&captures[2], &captures[3], path, i + 1),
                raw: line.to_string(),
            }
        } else if let Some(captures) = windowed_pattern().captures(line) {
            Advisory {
                kind: AdvisoryKind::General,
                window: parse_window(&captures[2], &captures[3], path, i + 1),
                raw: line.to_string(),
            }
        } else {
            Advisory {
                kind: AdvisoryKind::General,
                window: None,
                raw: line.to_string(),
            }
        };
        advisories.push(advisory);
    }
    Ok(advisories)
}

fn parse_window(start: &str, end: &str, path: &Path, line: usize) -> Option<TimeWindow> {
    match (parse_hhmm(start), parse_hhmm(end)) {
        (Some(start), Some(end)) => Some(TimeWindow { start, end }),
        _ => {
            warn!(
                path = %path.display(),
                line,
                "advisory window has an invalid time; keeping the notice without a window"
            );
            None
        }
    }
}
