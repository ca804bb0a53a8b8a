//! Per-vessel cell-culture state and the biology step function
//! (spec §3, §4.5).
//!
//! Owns [`VesselState`]. Reads the spine's view of a vessel (compound
//! doses, nutrient concentrations) as values handed in by the caller,
//! rather than as a live dependency; `bvm-biology` never drives
//! `bvm-physics` directly, keeping the mirror-sync boundary (spec §5)
//! with the world orchestrator.

/// Death causes, stress axes, and per-vessel state.
pub mod types;

/// Cell-line parameters and the full biology configuration.
pub mod config;

/// Closed-form interval integrators used by [`step::step_vessel`].
pub mod kinetics;

/// Biology step failure modes.
pub mod error;

/// The per-vessel step function.
pub mod step;

pub use config::{
    BiologyConfig, CellLineParams, ContactPressureConfig, ContaminationConfig, OsmoticConfig,
    StarvationConfig, StressKineticsParams,
};
pub use error::BiologyError;
pub use step::step_vessel;
pub use types::{DeathCause, StressAxis, VesselState};
