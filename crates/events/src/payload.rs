use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The closed set of operations the Concentration Spine understands.
///
/// Unknown fields are rejected at deserialization (`deny_unknown_fields`)
/// so a malformed event fails loudly at the schema boundary rather than
/// silently dropping data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", deny_unknown_fields)]
pub enum EventPayload {
    /// Creates a vessel. Self-flushing: the scheduler delivers this
    /// immediately so the vessel has concentrations before any other
    /// event can reference it.
    SeedVessel {
        vessel_id: String,
        position: PlateCoordinate,
        cell_line: String,
        initial_cells: f64,
        initial_volume_ul: f64,
        initial_nutrients_mm: BTreeMap<String, f64>,
    },
    /// Sets a compound's concentration to `dose_um`. No implicit dilution
    /// math at v1; this is an absolute set, not an addition.
    TreatCompound {
        vessel_id: String,
        compound_id: String,
        dose_um: f64,
    },
    /// Resets nutrient concentrations. Does not touch compounds.
    FeedVessel {
        vessel_id: String,
        nutrients_mm: BTreeMap<String, f64>,
    },
    /// Hard-clamps a compound's concentration to zero. `compound_id: None`
    /// means wash out every compound in the vessel.
    WashoutCompound {
        vessel_id: String,
        compound_id: Option<String>,
    },
}

/// A plate coordinate, used by the evaporation model to derive edge-ness.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlateCoordinate {
    pub row: u32,
    pub col: u32,
}

impl PlateCoordinate {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl EventPayload {
    /// The vessel this event targets.
    pub fn vessel_id(&self) -> &str {
        match self {
            EventPayload::SeedVessel { vessel_id, .. }
            | EventPayload::TreatCompound { vessel_id, .. }
            | EventPayload::FeedVessel { vessel_id, .. }
            | EventPayload::WashoutCompound { vessel_id, .. } => vessel_id,
        }
    }

    /// Short, stable name for logging and the event log's `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            EventPayload::SeedVessel { .. } => "seed_vessel",
            EventPayload::TreatCompound { .. } => "treat_compound",
            EventPayload::FeedVessel { .. } => "feed_vessel",
            EventPayload::WashoutCompound { .. } => "washout_compound",
        }
    }
}
