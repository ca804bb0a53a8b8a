use thiserror::Error;

use crate::bridge::BridgeError;

/// Aggregated failure modes for the World Orchestrator (spec §7: one
/// error type at the public boundary, matching the teacher's
/// `DeterminismError` aggregation style).
///
/// Each subsystem keeps its own `thiserror` enum; `WorldError` wraps
/// them via `#[from]` rather than re-deriving their variants, so a
/// caller that only cares "did `run_cycle` succeed" can match on one
/// type while a caller that cares about the subsystem can still
/// `matches!` the wrapped variant.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("vessel {vessel_id} is unknown to the world")]
    UnknownVessel { vessel_id: String },

    #[error("unknown cell line {cell_line} referenced by vessel {vessel_id}")]
    UnknownCellLine { vessel_id: String, cell_line: String },

    #[error("dt_h must be non-negative, got {dt_h}")]
    NegativeDt { dt_h: f64 },

    #[error("invalid direct-state mutation: {detail}")]
    InvalidDirectMutation { detail: String },

    #[error(transparent)]
    Event(#[from] bvm_events::EventError),

    #[error(transparent)]
    Spine(#[from] bvm_physics::SpineError),

    #[error(transparent)]
    Biology(#[from] bvm_biology::BiologyError),

    #[error(transparent)]
    Measurement(#[from] bvm_measurement::MeasurementError),

    #[error(transparent)]
    Epistemic(#[from] bvm_epistemic::EpistemicError),

    #[error(transparent)]
    StepGuard(#[from] bvm_scheduler::StepGuardError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
