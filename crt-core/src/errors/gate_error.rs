/// Gate pipeline errors. Gates themselves never fail the turn (a gate
/// outcome is always `Pass`/`Rewrite`/`Replace`) — this enum covers
/// misconfiguration only (e.g. a gate registered twice).
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("gate pipeline misconfigured: {0}")]
    Misconfigured(String),
}
