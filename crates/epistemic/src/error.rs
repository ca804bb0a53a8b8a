use thiserror::Error;

/// Epistemic controller failure modes (spec §4.7, §7).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EpistemicError {
    #[error("action_id {action_id} has no outstanding claim to resolve")]
    UnknownActionId { action_id: u64 },

    #[error("action_id {action_id} already has an outstanding claim; resolve it before reclaiming")]
    DuplicateClaim { action_id: u64 },

    #[error("prior_entropy must be non-negative, got {value}")]
    NegativePriorEntropy { value: f64 },

    #[error("posterior_entropy must be non-negative, got {value}")]
    NegativePosteriorEntropy { value: f64 },

    #[error("action_id {action_id} has no provisional penalty in escrow")]
    UnknownProvisionalPenalty { action_id: u64 },
}
