//! Weather report parsing.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use torre_core::{TorreError, WeatherSample};

use super::{parse_hhmm, read_registry};

/// Report lines start with a clock time: `HH:MM <report text>`.
fn report_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{2}:\d{2}) (.*)$").unwrap())
}

/// Optional visibility group inside the report text: `VIS <km>KM`.
fn visibility_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"VIS (\d+)KM").unwrap())
}

pub fn load_weather(path: &Path) -> Result<Vec<WeatherSample>, TorreError> {
    let text = read_registry(path)?;
    let mut samples: Vec<WeatherSample> = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let Some(captures) = report_pattern().captures(line) else {
            warn!(path = %path.display(), line = i + 1, "skipping weather line without a leading time");
            continue;
        };
        let Some(time) = parse_hhmm(&captures[1]) else {
            warn!(path = %path.display(), line = i + 1, "skipping weather line with an invalid time");
            continue;
        };
        let visibility_km = visibility_pattern()
            .captures(&captures[2])
            .and_then(|c| c[1].parse::<u32>().ok());
        samples.push(WeatherSample {
            time,
            visibility_km,
            raw: line.to_string(),
        });
    }
    Ok(samples)
}
