use crate::models::ExtractionResult;

/// Converts an utterance into typed hard-slot facts and open tuples
/// (spec §4.2, §6). Implementations must never surface malformed input as
/// an error — return an empty `ExtractionResult` instead.
pub trait ClaimExtractor: Send + Sync {
    fn extract(&self, utterance: &str) -> ExtractionResult;
}
