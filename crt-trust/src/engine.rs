//! Bounded trust update functions — spec §4.7. Trust is an explicit,
//! hand-specified function of confirmations and `conflict` contradictions,
//! never a learned score.
//!
//! Grounded on `cortex-decay::adaptive`'s shape (several small, independently
//! testable factor functions composed by one entry point) — the factors
//! themselves are rewritten from "access/validation/linkage multipliers on
//! a half-life" to the two bounded additive/multiplicative rules spec §4.7
//! names explicitly, since CRT rejects learned or usage-derived scores.

use crt_core::config::TrustConfig;
use crt_core::models::ContradictionType;

/// What should happen to a memory's trust at a particular lifecycle point.
/// `None` means spec §4.7's "non-`conflict` types must not mutate trust".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustMutation {
    Confirm,
    Degrade,
    None,
}

/// The mutation to apply to each side of a resolved contradiction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustUpdatePlan {
    pub old: TrustMutation,
    pub new: TrustMutation,
}

pub struct TrustEngine {
    config: TrustConfig,
}

impl TrustEngine {
    pub fn new(config: TrustConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    /// Confirmation boost: `trust ← trust + κ_c·(1 − trust)`, clamped to
    /// `[trust_floor, trust_ceiling]`. Monotone increasing, approaches
    /// `trust_ceiling` asymptotically, never overshoots it.
    pub fn confirm(&self, trust: f64) -> f64 {
        let boosted = trust + self.config.kappa_confirm * (1.0 - trust);
        boosted.clamp(self.config.trust_floor, self.config.trust_ceiling)
    }

    /// Conflict degradation: `trust ← trust · (1 − κ_d)`, clamped to never
    /// drop below `trust_floor` — deprecated memories keep a floor, never
    /// zero, so their history remains interpretable.
    pub fn degrade(&self, trust: f64) -> f64 {
        let degraded = trust * (1.0 - self.config.kappa_degrade);
        degraded.clamp(self.config.trust_floor, self.config.trust_ceiling)
    }

    /// Apply one `TrustMutation` to a trust value.
    pub fn apply(&self, trust: f64, mutation: TrustMutation) -> f64 {
        match mutation {
            TrustMutation::Confirm => self.confirm(trust),
            TrustMutation::Degrade => self.degrade(trust),
            TrustMutation::None => trust,
        }
    }

    /// Called when a ledger entry transitions to `asked` — spec §4.7's
    /// "contradiction, type=conflict, status=asked (not yet resolved)"
    /// rule. Only `conflict` degrades the old memory's trust at this point;
    /// every other type waits for (or never reaches) a resolution.
    pub fn on_asked(&self, contradiction_type: ContradictionType) -> TrustMutation {
        match contradiction_type {
            ContradictionType::Conflict => TrustMutation::Degrade,
            _ => TrustMutation::None,
        }
    }

    /// Called when a ledger entry resolves. Per spec §4.7/§4.6:
    /// - `conflict` `user_override`: new confirmed, old already degraded at
    ///   `asked` and stays frozen (no second degrade).
    /// - `conflict` `user_preserve`: old is re-confirmed (it won); new is
    ///   frozen (never boosted, never re-degraded).
    /// - `revision` `user_override`: old takes the bounded haircut only now
    ///   that the user has confirmed the correction (spec §4.5); new is
    ///   confirmed.
    /// - `revision` `user_merge`, and every `user_both_true`/dismiss case:
    ///   neither side has a winner or loser, so neither mutates.
    pub fn on_resolved(
        &self,
        contradiction_type: ContradictionType,
        method: crt_core::models::ResolutionMethod,
    ) -> TrustUpdatePlan {
        use crt_core::models::ResolutionMethod::*;
        match (contradiction_type, method) {
            (ContradictionType::Conflict, UserOverride) => {
                TrustUpdatePlan { old: TrustMutation::None, new: TrustMutation::Confirm }
            }
            (ContradictionType::Conflict, UserPreserve) => {
                TrustUpdatePlan { old: TrustMutation::Confirm, new: TrustMutation::None }
            }
            (ContradictionType::Revision, UserOverride) => {
                TrustUpdatePlan { old: TrustMutation::Degrade, new: TrustMutation::Confirm }
            }
            _ => TrustUpdatePlan { old: TrustMutation::None, new: TrustMutation::None },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> TrustEngine {
        TrustEngine::new(TrustConfig::default())
    }

    #[test]
    fn confirm_is_monotone_and_bounded() {
        let engine = engine();
        let mut trust = 0.2;
        for _ in 0..50 {
            let next = engine.confirm(trust);
            assert!(next >= trust);
            trust = next;
        }
        assert!(trust <= 1.0);
    }

    #[test]
    fn degrade_never_drops_below_floor() {
        let engine = engine();
        let mut trust = 0.5;
        for _ in 0..50 {
            trust = engine.degrade(trust);
        }
        assert!(trust >= engine.config.trust_floor);
    }

    #[test]
    fn only_conflict_degrades_on_asked() {
        let engine = engine();
        assert_eq!(engine.on_asked(ContradictionType::Conflict), TrustMutation::Degrade);
        assert_eq!(engine.on_asked(ContradictionType::Revision), TrustMutation::None);
        assert_eq!(engine.on_asked(ContradictionType::Temporal), TrustMutation::None);
        assert_eq!(engine.on_asked(ContradictionType::Refinement), TrustMutation::None);
    }

    #[test]
    fn conflict_user_preserve_reboosts_old_and_freezes_new() {
        let engine = engine();
        let plan = engine.on_resolved(
            ContradictionType::Conflict,
            crt_core::models::ResolutionMethod::UserPreserve,
        );
        assert_eq!(plan.old, TrustMutation::Confirm);
        assert_eq!(plan.new, TrustMutation::None);
    }

    #[test]
    fn revision_user_override_waits_until_resolution_to_haircut_old() {
        let engine = engine();
        assert_eq!(engine.on_asked(ContradictionType::Revision), TrustMutation::None);
        let plan = engine.on_resolved(
            ContradictionType::Revision,
            crt_core::models::ResolutionMethod::UserOverride,
        );
        assert_eq!(plan.old, TrustMutation::Degrade);
        assert_eq!(plan.new, TrustMutation::Confirm);
    }

    #[test]
    fn revision_merge_mutates_neither_side() {
        let engine = engine();
        let plan = engine.on_resolved(
            ContradictionType::Revision,
            crt_core::models::ResolutionMethod::UserMerge,
        );
        assert_eq!(plan.old, TrustMutation::None);
        assert_eq!(plan.new, TrustMutation::None);
    }

    #[test]
    fn both_true_mutates_neither_side() {
        let engine = engine();
        let plan = engine.on_resolved(
            ContradictionType::Refinement,
            crt_core::models::ResolutionMethod::UserBothTrue,
        );
        assert_eq!(plan.old, TrustMutation::None);
        assert_eq!(plan.new, TrustMutation::None);
    }
}
