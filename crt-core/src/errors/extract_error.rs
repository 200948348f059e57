/// Extraction-time errors. Per spec §4.2/§7, malformed input never
/// surfaces an error — this enum exists for extractor-plugin implementors
/// that want to report a hard failure which the coordinator then treats
/// as `degraded`, not propagated.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("extractor unavailable: {0}")]
    Unavailable(String),

    #[error("extractor timed out")]
    TimedOut,
}
