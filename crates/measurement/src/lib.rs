//! The measurement layer: turns a [`bvm_biology::VesselState`] into an
//! agent-facing [`Observation`] through an eight-layer noise model,
//! without ever touching biology or batch RNG streams (spec §4.6).
//!
//! Plate position is not one of this crate's dependencies (unlike
//! biology's spine mirror, there is no live read of `bvm-physics`
//! here): edge-well status is a parameter the caller supplies, the same
//! way biology receives compound doses as values rather than driving
//! the spine itself.

/// Measurement failure modes.
pub mod error;

/// Per-channel tunables, plating/edge-well/segmentation config, and the
/// once-per-run [`config::RunContext`].
pub mod config;

/// Assay kinds, the canonical [`Observation`] schema, and closed
/// failure/QC enums.
pub mod types;

/// The eight ordered noise-model layers.
pub mod noise;

/// Assay orchestration: `measure_cell_painting` and
/// `measure_cytotoxicity`.
pub mod assays;

pub use assays::{measure_cell_painting, measure_cytotoxicity};
pub use config::{ChannelConfig, EdgeWellConfig, MeasurementConfig, PlatingTransientConfig, RunContext, SegmentationConfig};
pub use error::MeasurementError;
pub use types::{Assay, ImagingArtifacts, Observation, QcFlag, WellFailureMode};
