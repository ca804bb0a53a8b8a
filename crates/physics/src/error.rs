use thiserror::Error;

/// Errors raised by the Concentration Spine.
///
/// Per spec §7, an invariant violation is fatal for the run; the other
/// variants are rejected at the operation boundary and the run continues.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpineError {
    #[error("vessel {vessel_id} is unknown to the spine")]
    UnknownVessel { vessel_id: String },

    #[error("vessel {vessel_id} already seeded; SEED_VESSEL may only be applied once")]
    DuplicateSeed { vessel_id: String },

    #[error("compound {compound_id} is not in the run's chemistry registry")]
    UnknownCompound { compound_id: String },

    #[error("nutrient {nutrient_id} is not in the run's chemistry registry")]
    UnknownNutrient { nutrient_id: String },

    #[error(
        "invariant violation in vessel {vessel_id}: {detail} (fatal, run aborts with forensic \
         state: volume_uL={volume_ul}, compound_mass_before={mass_before}, \
         compound_mass_after={mass_after})"
    )]
    InvariantViolation {
        vessel_id: String,
        detail: String,
        volume_ul: f64,
        mass_before: f64,
        mass_after: f64,
    },

    #[error("dt_h must be non-negative, got {dt_h}")]
    NegativeDt { dt_h: f64 },
}
