/// Errors from rule evaluation.
///
/// Note that a `GateError` never reaches callers of the gate itself: the
/// gate converts any evaluation fault into a rejection (fail-closed). The
/// type exists so rule implementations can propagate read failures with `?`.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// A rule could not be evaluated (e.g., a read against the store failed).
    #[error("rule evaluation failed: {0}")]
    Rule(String),
}
