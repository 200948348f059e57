use serde::{Deserialize, Serialize};

use super::defaults;

/// Gate pipeline configuration (spec §4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// θ_cite: minimum semantic similarity for an open-tuple citation to
    /// satisfy the memory-citation gate.
    pub theta_cite: f64,
    pub assistant_identity_name: String,
    pub assistant_identity_statement: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            theta_cite: defaults::DEFAULT_THETA_CITE,
            assistant_identity_name: "the assistant".to_string(),
            assistant_identity_statement:
                "I'm an AI assistant. I don't have personal experiences, a creator I can speak for, or sentience — just the memories you and I have built up in this conversation.".to_string(),
        }
    }
}
