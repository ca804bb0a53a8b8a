use thiserror::Error;

/// Measurement failure modes (spec §4.6, §7).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeasurementError {
    #[error("unknown channel {channel} requested for cell line {cell_line}")]
    UnknownChannel { cell_line: String, channel: String },

    #[error("rng guard violation: {0}")]
    RngGuard(#[from] rng::RngGuardViolation),

    #[error("negative entropy is not a valid observation input: {detail}")]
    NegativeEntropy { detail: String },
}
