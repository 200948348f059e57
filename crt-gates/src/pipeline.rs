//! The ordered gate pipeline (C8) — spec §4.8: run gates 1-4 in fixed
//! order, stop at the first non-`pass`, and record exactly the decisions
//! that ran.
//!
//! Grounded on `cortex-retrieval::generation::validation`'s
//! accumulate-then-decide shape, restructured to short-circuit since this
//! spec's gates replace the whole response rather than accumulate warnings.

use crt_core::config::GateConfig;
use crt_core::models::{GateDecision, GateOutcome, LedgerEntry, Memory};
use crt_core::traits::Embedder;

use crate::citation::memory_citation_gate;
use crate::contradiction_status::contradiction_status_gate;
use crate::identity::assistant_identity_gate;
use crate::named_reference::named_reference_gate;

pub struct GatePipeline<'a> {
    config: &'a GateConfig,
    embedder: &'a dyn Embedder,
}

/// Outcome of running the full pipeline over one candidate response.
pub struct PipelineResult {
    pub final_response: String,
    pub decisions: Vec<GateDecision>,
}

impl<'a> GatePipeline<'a> {
    pub fn new(config: &'a GateConfig, embedder: &'a dyn Embedder) -> Self {
        Self { config, embedder }
    }

    /// Run gates 1-4 against `candidate`. The first gate to return
    /// anything other than `Pass` terminates the pipeline; its output
    /// becomes `final_response`.
    pub fn run(&self, candidate: &str, retrieved: &[Memory], open_ledger_entries: &[LedgerEntry]) -> PipelineResult {
        let mut decisions = Vec::new();
        let mut response = candidate.to_string();

        macro_rules! run_gate {
            ($name:expr, $outcome:expr) => {{
                let outcome = $outcome;
                let is_pass = outcome.is_pass();
                if let GateOutcome::Rewrite { ref text, .. } | GateOutcome::Replace { ref text, .. } = outcome {
                    response = text.clone();
                }
                decisions.push(GateDecision { gate_name: $name, outcome });
                if !is_pass {
                    return PipelineResult { final_response: response, decisions };
                }
            }};
        }

        run_gate!("assistant-identity", assistant_identity_gate(&response, self.config));
        run_gate!("named-reference", named_reference_gate(&response, retrieved));
        run_gate!(
            "memory-citation",
            memory_citation_gate(&response, retrieved, self.embedder, self.config.theta_cite)
        );
        run_gate!("contradiction-status", contradiction_status_gate(&response, open_ledger_entries));

        PipelineResult { final_response: response, decisions }
    }
}
