//! Canonical agent-facing DTOs crossing the core/agent boundary (spec
//! §6 "External Interfaces").
//!
//! Agent policy and belief representation are deliberately out of scope
//! for the core (spec §1): this crate defines only the shapes that
//! cross the boundary (what an agent proposes, `Design`, and what it
//! observes), not how a policy decides what to propose.

use serde::{Deserialize, Serialize};

use bvm_events::PlateCoordinate;
pub use bvm_measurement::Observation;

/// One agent-facing instruction against a single vessel (spec §6:
/// `WellIntent { vessel_id?, cell_line, treatment, observation_time_h,
/// assay }`).
///
/// `vessel_id: None` on a `Treatment::Seed` intent asks the bridge to
/// mint a fresh vessel id; every other treatment kind requires an
/// existing `vessel_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WellIntent {
    pub vessel_id: Option<String>,
    pub cell_line: String,
    pub treatment: Option<Treatment>,
    /// Canonical meaning: hours since treatment start when the assay
    /// readout is taken. No synonym (`time_h`, `timepoint_h`, duration)
    /// is accepted at this boundary (spec §6).
    pub observation_time_h: f64,
    pub assay: Option<bvm_measurement::Assay>,
}

/// The closed set of operations a `WellIntent` may request (spec §3
/// event schema, restated at the agent boundary rather than exposing
/// `bvm_events::EventPayload` directly, so the core's internal event
/// shape can evolve without breaking the agent contract).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Treatment {
    Seed {
        position: PlateCoordinate,
        initial_cells: f64,
        initial_volume_ul: f64,
        initial_nutrients_mm: std::collections::BTreeMap<String, f64>,
    },
    TreatCompound {
        compound_id: String,
        dose_um: f64,
    },
    Feed {
        nutrients_mm: std::collections::BTreeMap<String, f64>,
    },
    Washout {
        compound_id: Option<String>,
    },
}

/// A full cycle's proposal: the list of `WellIntent`s an agent submits
/// in one `propose(beliefs)` call (spec §6).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Design {
    pub well_intents: Vec<WellIntent>,
}

impl Design {
    pub fn new(well_intents: Vec<WellIntent>) -> Self {
        Self { well_intents }
    }
}
