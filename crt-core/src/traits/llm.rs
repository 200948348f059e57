use std::time::Duration;

/// The external LLM driver (spec §1 non-goals, §6). Best-effort: may fail,
/// and its output is never trusted for facts — only the gate pipeline (C8)
/// decides what reaches the user.
pub trait LlmClient: Send + Sync {
    fn generate(&self, prompt: &str, deadline: Duration) -> Option<String>;
}

/// An `LlmClient` that always times out — used when no model is wired up
/// yet; the coordinator degrades to the canned "couldn't complete that
/// turn" reply (spec §5 cancellation rules).
pub struct NullLlm;

impl LlmClient for NullLlm {
    fn generate(&self, _prompt: &str, _deadline: Duration) -> Option<String> {
        None
    }
}
