use serde::{Deserialize, Serialize};

use super::defaults;

/// Contradiction detector configuration (spec §4.5).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContradictionConfig {
    /// θ_contra: minimum similarity for the semantic path to consider a pair.
    pub theta_contra: f64,
}

impl Default for ContradictionConfig {
    fn default() -> Self {
        Self {
            theta_contra: defaults::DEFAULT_THETA_CONTRA,
        }
    }
}
