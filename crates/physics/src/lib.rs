//! The Concentration Spine: sole writer of per-vessel volumes and solute
//! concentrations (spec §4.3).
//!
//! [`InjectionManager`] is the only component permitted to mutate
//! `volume_uL`, compound, and nutrient amounts. Every mutation traces to
//! exactly one applied [`bvm_events::Event`] or one [`InjectionManager::step`]
//! call; concentration is always recomputed as `mass / volume`, never
//! cached, and evaporation moves volume only, never solute mass.

/// Per-vessel spine state and the evaporation model.
pub mod spine;

/// Configuration for evaporation and the optional chemistry registry.
pub mod config;

/// Spine error taxonomy (spec §7: invariant violation is fatal).
pub mod error;

pub use config::{ChemistryConfig, EvaporationConfig};
pub use error::SpineError;
pub use spine::{InjectionManager, MirrorSnapshot, SpineVessel};
