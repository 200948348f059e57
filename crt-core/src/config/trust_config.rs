use serde::{Deserialize, Serialize};

use super::defaults;

/// Trust/confidence model configuration (spec §4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrustConfig {
    /// κ_c ∈ (0, 0.3]: confirmation boost rate.
    pub kappa_confirm: f64,
    /// κ_d ∈ (0, 0.3]: conflict degradation rate.
    pub kappa_degrade: f64,
    pub trust_floor: f64,
    pub trust_ceiling: f64,
}

impl Default for TrustConfig {
    fn default() -> Self {
        Self {
            kappa_confirm: defaults::DEFAULT_KAPPA_CONFIRM,
            kappa_degrade: defaults::DEFAULT_KAPPA_DEGRADE,
            trust_floor: defaults::DEFAULT_TRUST_FLOOR,
            trust_ceiling: defaults::DEFAULT_TRUST_CEILING,
        }
    }
}
