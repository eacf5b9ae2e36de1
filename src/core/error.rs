use crate::rules::RulePackError;

/// Degenerate arithmetic while valuing a single asset. The orchestrator
/// records these per asset and keeps going.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ComputationError {
    #[error("converted acquisition price needs a non-zero transfer-side standard value")]
    ZeroTransferStandardValue,
    #[error("gift-with-debt apportionment needs a non-zero assessed value")]
    ZeroAssessedValue,
}

/// Failures that prevent computing a case at all.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    RulePack(#[from] RulePackError),
    #[error("failed to encode case for digest: {0}")]
    Digest(#[from] serde_json::Error),
}
