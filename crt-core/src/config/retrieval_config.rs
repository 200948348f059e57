use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval subsystem configuration (spec §4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// M in `candidates(thread, qvec, k·M)`.
    pub candidate_fanout_multiplier: usize,
    pub default_min_trust: f64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            candidate_fanout_multiplier: defaults::DEFAULT_CANDIDATE_FANOUT_MULTIPLIER,
            default_min_trust: defaults::DEFAULT_MIN_TRUST,
        }
    }
}
