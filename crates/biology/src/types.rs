use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bvm_physics::MirrorSnapshot;

/// Closed set of death causes (spec §9 "death causes... closed tagged
/// unions"). Adding a cause means extending this enum, not subclassing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    CompoundAttrition,
    Starvation,
    Osmotic,
    Contamination,
}

impl DeathCause {
    pub const ALL: [DeathCause; 4] = [
        DeathCause::CompoundAttrition,
        DeathCause::Starvation,
        DeathCause::Osmotic,
        DeathCause::Contamination,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCause::CompoundAttrition => "compound_attrition",
            DeathCause::Starvation => "starvation",
            DeathCause::Osmotic => "osmotic",
            DeathCause::Contamination => "contamination",
        }
    }
}

/// Closed set of stress latent axes (spec §3 names ER stress,
/// mitochondrial dysfunction, transport dysfunction as examples).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StressAxis {
    ErStress,
    MitochondrialDysfunction,
    TransportDysfunction,
}

impl StressAxis {
    pub const ALL: [StressAxis; 3] = [
        StressAxis::ErStress,
        StressAxis::MitochondrialDysfunction,
        StressAxis::TransportDysfunction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StressAxis::ErStress => "er_stress",
            StressAxis::MitochondrialDysfunction => "mitochondrial_dysfunction",
            StressAxis::TransportDysfunction => "transport_dysfunction",
        }
    }
}

/// Per-vessel biological state (spec §3). Mutated only by the biology
/// step and, for the read-only mirror fields, by the world orchestrator
/// copying a spine [`MirrorSnapshot`] in the same call chain that
/// mutated the spine (spec §5 shared-resource policy).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VesselState {
    pub vessel_id: String,
    pub cell_line: String,
    pub cell_count: f64,
    pub viability: f64,
    pub death_ledger: BTreeMap<DeathCause, f64>,
    pub dominant_death_cause: Option<DeathCause>,
    pub stress_latents: BTreeMap<StressAxis, f64>,
    pub contact_pressure: f64,
    pub vessel_capacity: f64,
    pub t_seed_h: f64,
    pub t_treatment_start_h: BTreeMap<String, f64>,
    pub contaminated: bool,
    /// Read-only mirror of the spine; never written except via
    /// [`VesselState::sync_mirror`]. Never read by `_step_vessel`.
    pub mirror: MirrorSnapshot,
}

impl VesselState {
    pub fn new(
        vessel_id: String,
        cell_line: String,
        initial_cells: f64,
        vessel_capacity: f64,
        t_seed_h: f64,
        mirror: MirrorSnapshot,
    ) -> Self {
        let mut death_ledger = BTreeMap::new();
        for cause in DeathCause::ALL {
            death_ledger.insert(cause, 0.0);
        }
        let mut stress_latents = BTreeMap::new();
        for axis in StressAxis::ALL {
            stress_latents.insert(axis, 0.0);
        }
        Self {
            vessel_id,
            cell_line,
            cell_count: initial_cells,
            viability: 1.0,
            death_ledger,
            dominant_death_cause: None,
            stress_latents,
            contact_pressure: 0.0,
            vessel_capacity,
            t_seed_h,
            t_treatment_start_h: BTreeMap::new(),
            contaminated: false,
            mirror,
        }
    }

    /// `cell_count / vessel_capacity`. Derived, not a writable field.
    pub fn confluence(&self) -> f64 {
        if self.vessel_capacity <= 0.0 {
            0.0
        } else {
            self.cell_count / self.vessel_capacity
        }
    }

    /// Sum of the death ledger, which must equal `1 - viability` to
    /// float tolerance after every commit (spec §3, §8).
    pub fn death_ledger_sum(&self) -> f64 {
        self.death_ledger.values().sum()
    }

    /// Copy a spine mirror snapshot into this vessel's read-only mirror.
    /// The only legitimate writer of `mirror` outside `VesselState::new`.
    pub fn sync_mirror(&mut self, snapshot: MirrorSnapshot) {
        self.mirror = snapshot;
    }
}
