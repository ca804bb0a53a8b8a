/**
 * Purpose: The Concentration Spine (`InjectionManager`), sole writer of
 * per-vessel volumes and solute concentrations (spec §4.3).
 *
 * Invariants enforced:
 * - Non-negativity of volumes, amounts, concentrations.
 * - Mass conservation across evaporation: `step` changes volume, never
 *   solute mass; concentration is always recomputed as `mass / volume`,
 *   never cached.
 * - No resurrection: a washed-out compound stays at zero until the next
 *   `TreatCompound`.
 * - Event-driven only: every state diff traces to exactly one `apply`
 *   or one `step` call.
 *
 * What this file does NOT do:
 * - Does not decide delivery order (that's `bvm-scheduler`).
 * - Does not write vessel biology mirrors directly; the orchestrator
 *   copies a `MirrorSnapshot` into the vessel's read-only mirror in the
 *   same call chain, per spec §5's "updated in the same call chain"
 *   shared-resource policy, keeping this crate free of a dependency on
 *   `bvm-biology`.
 */
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use bvm_events::{Event, EventPayload, PlateCoordinate};

use crate::config::{ChemistryConfig, EvaporationConfig};
use crate::error::SpineError;

/// Per-vessel spine state: the sole authoritative record of a vessel's
/// volume and solute concentrations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpineVessel {
    pub volume_ul: f64,
    /// Volume at `SEED_VESSEL`, the reference point for the evaporation
    /// floor (`min_volume_multiplier * initial_volume_ul`).
    pub initial_volume_ul: f64,
    pub compounds: BTreeMap<String, f64>,
    pub nutrients: BTreeMap<String, f64>,
    pub position: PlateCoordinate,
}

/// Read-only copy of a vessel's spine state, for syncing biology mirrors.
/// Never the source of truth; see module docs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MirrorSnapshot {
    pub volume_ul: f64,
    pub compounds: BTreeMap<String, f64>,
    pub nutrients: BTreeMap<String, f64>,
}

/// Sole writer of `volume_uL`, compound, and nutrient concentrations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InjectionManager {
    vessels: BTreeMap<String, SpineVessel>,
    evaporation: EvaporationConfig,
    chemistry: ChemistryConfig,
}

impl InjectionManager {
    pub fn new(evaporation: EvaporationConfig, chemistry: ChemistryConfig) -> Self {
        Self {
            vessels: BTreeMap::new(),
            evaporation,
            chemistry,
        }
    }

    /// Apply a single validated event to the spine. Caller (the
    /// scheduler's delivered batch) is responsible for ordering; this
    /// method applies exactly one event's worth of state change.
    pub fn apply(&mut self, event: &Event) -> Result<(), SpineError> {
        match &event.payload {
            EventPayload::SeedVessel {
                vessel_id,
                position,
                initial_cells: _,
                initial_volume_ul,
                initial_nutrients_mm,
                cell_line: _,
            } => self.apply_seed(vessel_id, *position, *initial_volume_ul, initial_nutrients_mm)?,
            EventPayload::TreatCompound {
                vessel_id,
                compound_id,
                dose_um,
            } => self.apply_treat(vessel_id, compound_id, *dose_um)?,
            EventPayload::FeedVessel {
                vessel_id,
                nutrients_mm,
            } => self.apply_feed(vessel_id, nutrients_mm)?,
            EventPayload::WashoutCompound {
                vessel_id,
                compound_id,
            } => self.apply_washout(vessel_id, compound_id.as_deref())?,
        }
        self.check_invariants(event.payload.vessel_id())
    }

    fn apply_seed(
        &mut self,
        vessel_id: &str,
        position: PlateCoordinate,
        initial_volume_ul: f64,
        initial_nutrients_mm: &BTreeMap<String, f64>,
    ) -> Result<(), SpineError> {
        if self.vessels.contains_key(vessel_id) {
            return Err(SpineError::DuplicateSeed {
                vessel_id: vessel_id.to_string(),
            });
        }
        for nutrient_id in initial_nutrients_mm.keys() {
            if !self.chemistry.nutrient_allowed(nutrient_id) {
                return Err(SpineError::UnknownNutrient {
                    nutrient_id: nutrient_id.clone(),
                });
            }
        }
        debug!(vessel_id, initial_volume_ul, "seeding vessel in spine");
        let _ = self.vessels.insert(
            vessel_id.to_string(),
            SpineVessel {
                volume_ul: initial_volume_ul,
                initial_volume_ul,
                compounds: BTreeMap::new(),
                nutrients: initial_nutrients_mm.clone(),
                position,
            },
        );
        Ok(())
    }

    fn apply_treat(
        &mut self,
        vessel_id: &str,
        compound_id: &str,
        dose_um: f64,
    ) -> Result<(), SpineError> {
        if !self.chemistry.compound_allowed(compound_id) {
            return Err(SpineError::UnknownCompound {
                compound_id: compound_id.to_string(),
            });
        }
        let vessel = self.vessel_mut(vessel_id)?;
        trace!(vessel_id, compound_id, dose_um, "treat compound");
        let _ = vessel.compounds.insert(compound_id.to_string(), dose_um);
        Ok(())
    }

    fn apply_feed(
        &mut self,
        vessel_id: &str,
        nutrients_mm: &BTreeMap<String, f64>,
    ) -> Result<(), SpineError> {
        for nutrient_id in nutrients_mm.keys() {
            if !self.chemistry.nutrient_allowed(nutrient_id) {
                return Err(SpineError::UnknownNutrient {
                    nutrient_id: nutrient_id.clone(),
                });
            }
        }
        let vessel = self.vessel_mut(vessel_id)?;
        trace!(vessel_id, "feed vessel, nutrients reset, compounds untouched");
        vessel.nutrients = nutrients_mm.clone();
        Ok(())
    }

    fn apply_washout(
        &mut self,
        vessel_id: &str,
        compound_id: Option<&str>,
    ) -> Result<(), SpineError> {
        let vessel = self.vessel_mut(vessel_id)?;
        match compound_id {
            Some(id) => {
                trace!(vessel_id, compound_id = id, "washout single compound");
                let _ = vessel.compounds.insert(id.to_string(), 0.0);
            }
            None => {
                trace!(vessel_id, "washout all compounds");
                for value in vessel.compounds.values_mut() {
                    *value = 0.0;
                }
            }
        }
        Ok(())
    }

    /// Apply evaporation once over `[now_h, now_h + dt_h)`. Removes
    /// volume only; solute mass is unchanged (concentration is
    /// recomputed to conserve `mass = concentration * volume`).
    pub fn step(&mut self, dt_h: f64, now_h: f64) -> Result<(), SpineError> {
        if dt_h < 0.0 {
            return Err(SpineError::NegativeDt { dt_h });
        }
        if dt_h == 0.0 {
            return Ok(());
        }
        let vessel_ids: Vec<String> = self.vessels.keys().cloned().collect();
        for vessel_id in vessel_ids {
            self.evaporate_one(&vessel_id, dt_h, now_h)?;
            self.check_invariants(&vessel_id)?;
        }
        Ok(())
    }

    fn evaporate_one(&mut self, vessel_id: &str, dt_h: f64, now_h: f64) -> Result<(), SpineError> {
        let evaporation = self.evaporation.clone();
        let vessel = self.vessel_mut(vessel_id)?;
        let rate = evaporation.rate_for(vessel.position.row, vessel.position.col);
        let floor = vessel.initial_volume_ul * evaporation.min_volume_multiplier;
        let volume_old = vessel.volume_ul;
        let volume_target = volume_old * (1.0 - rate * dt_h).max(0.0);
        let volume_new = volume_target.max(floor);

        if volume_new >= volume_old {
            // Already at the floor; nothing evaporates this step.
            return Ok(());
        }

        let scale = volume_old / volume_new;
        for value in vessel.compounds.values_mut() {
            *value *= scale;
        }
        for value in vessel.nutrients.values_mut() {
            *value *= scale;
        }
        vessel.volume_ul = volume_new;
        trace!(
            vessel_id,
            now_h,
            dt_h,
            volume_old,
            volume_new,
            "evaporation step"
        );
        Ok(())
    }

    fn check_invariants(&self, vessel_id: &str) -> Result<(), SpineError> {
        let vessel = self.vessel(vessel_id)?;
        if !(vessel.volume_ul > 0.0) || !vessel.volume_ul.is_finite() {
            return Err(SpineError::InvariantViolation {
                vessel_id: vessel_id.to_string(),
                detail: format!("volume_uL must be positive and finite, got {}", vessel.volume_ul),
                volume_ul: vessel.volume_ul,
                mass_before: 0.0,
                mass_after: 0.0,
            });
        }
        for (compound_id, conc) in &vessel.compounds {
            if *conc < 0.0 || !conc.is_finite() {
                return Err(SpineError::InvariantViolation {
                    vessel_id: vessel_id.to_string(),
                    detail: format!("compound {compound_id} concentration must be >= 0 and finite, got {conc}"),
                    volume_ul: vessel.volume_ul,
                    mass_before: 0.0,
                    mass_after: 0.0,
                });
            }
        }
        for (nutrient_id, conc) in &vessel.nutrients {
            if *conc < 0.0 || !conc.is_finite() {
                warn!(vessel_id, nutrient_id, conc, "negative/non-finite nutrient concentration");
                return Err(SpineError::InvariantViolation {
                    vessel_id: vessel_id.to_string(),
                    detail: format!("nutrient {nutrient_id} concentration must be >= 0 and finite, got {conc}"),
                    volume_ul: vessel.volume_ul,
                    mass_before: 0.0,
                    mass_after: 0.0,
                });
            }
        }
        Ok(())
    }

    fn vessel(&self, vessel_id: &str) -> Result<&SpineVessel, SpineError> {
        self.vessels.get(vessel_id).ok_or_else(|| SpineError::UnknownVessel {
            vessel_id: vessel_id.to_string(),
        })
    }

    fn vessel_mut(&mut self, vessel_id: &str) -> Result<&mut SpineVessel, SpineError> {
        self.vessels.get_mut(vessel_id).ok_or_else(|| SpineError::UnknownVessel {
            vessel_id: vessel_id.to_string(),
        })
    }

    /// Whether a vessel exists in the spine (i.e. has been seeded).
    pub fn contains_vessel(&self, vessel_id: &str) -> bool {
        self.vessels.contains_key(vessel_id)
    }

    pub fn get_compound_um(&self, vessel_id: &str, compound_id: &str) -> Result<f64, SpineError> {
        Ok(*self.vessel(vessel_id)?.compounds.get(compound_id).unwrap_or(&0.0))
    }

    pub fn get_nutrient_mm(&self, vessel_id: &str, nutrient_id: &str) -> Result<f64, SpineError> {
        Ok(*self.vessel(vessel_id)?.nutrients.get(nutrient_id).unwrap_or(&0.0))
    }

    pub fn get_volume_ul(&self, vessel_id: &str) -> Result<f64, SpineError> {
        Ok(self.vessel(vessel_id)?.volume_ul)
    }

    /// Sum of all compound concentrations in a vessel, used by hazards
    /// (e.g. osmotic stress) that respond to total solute load rather
    /// than any single compound.
    pub fn get_total_compound_um(&self, vessel_id: &str) -> Result<f64, SpineError> {
        Ok(self.vessel(vessel_id)?.compounds.values().sum())
    }

    /// Whether a vessel sits on the plate's outer ring, per the run's
    /// configured evaporation geometry (spec §9 [SUPPLEMENT]: edge-ness
    /// is derived from configured plate dimensions, not hardcoded).
    /// Consumed by measurement's edge-well penalty, which the caller
    /// (the world orchestrator) reads here and passes in explicitly;
    /// `bvm-measurement` does not depend on this crate.
    pub fn is_edge_well(&self, vessel_id: &str) -> Result<bool, SpineError> {
        let position = self.vessel(vessel_id)?.position;
        Ok(self.evaporation.is_edge_well(position.row, position.col))
    }

    /// Snapshot of everything a vessel's read-only biology mirror needs.
    pub fn mirror_snapshot(&self, vessel_id: &str) -> Result<MirrorSnapshot, SpineError> {
        let vessel = self.vessel(vessel_id)?;
        Ok(MirrorSnapshot {
            volume_ul: vessel.volume_ul,
            compounds: vessel.compounds.clone(),
            nutrients: vessel.nutrients.clone(),
        })
    }

    /// Total solute mass (sum of compound + nutrient `concentration *
    /// volume`) for a vessel, used by conservation tests.
    pub fn total_solute_mass(&self, vessel_id: &str) -> Result<f64, SpineError> {
        let vessel = self.vessel(vessel_id)?;
        let compound_mass: f64 = vessel.compounds.values().sum::<f64>() * vessel.volume_ul;
        let nutrient_mass: f64 = vessel.nutrients.values().sum::<f64>() * vessel.volume_ul;
        Ok(compound_mass + nutrient_mass)
    }
}
