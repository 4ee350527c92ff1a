//! Operational thresholds for release decisions.

use serde::{Deserialize, Serialize};

/// Configuration for release rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReleaseRules {
    /// Visibility below this value (km) limits the field to one release per window
    pub low_visibility_km: u32,
    /// Trailing window for the low-visibility limit (minutes)
    pub low_visibility_window_min: i64,
}

impl Default for ReleaseRules {
    fn default() -> Self {
        Self {
            low_visibility_km: 6,
            low_visibility_window_min: 10,
        }
    }
}
