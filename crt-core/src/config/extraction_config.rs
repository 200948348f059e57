use serde::{Deserialize, Serialize};

use super::defaults;

/// Claim extractor configuration (spec §4.2).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// τ_open: minimum confidence for a Tier B open tuple to be kept.
    pub tau_open: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            tau_open: defaults::DEFAULT_OPEN_TUPLE_CONFIDENCE_FLOOR,
        }
    }
}
