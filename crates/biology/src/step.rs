/**
 * Purpose: `step_vessel`, the per-vessel biology step (spec §4.5).
 *
 * Integrates one vessel across `[now_h, now_h + dt_h)` using only state
 * as-of `now_h` (the spine values the caller read before this call) plus
 * the vessel's own latents. Every quantity is integrated analytically
 * over the interval (no endpoint sampling of lag, saturation, or gate
 * thresholds), so that one `dt_h = 24` call and two `dt_h = 12` calls
 * produce the same cumulative effect (spec §8 boundary-invariance
 * property).
 *
 * Stochasticity (contamination onset) is decided by the caller from
 * `rng_operational_events` and handed in as `contamination_onset`; this
 * function draws no randomness itself, so biology trajectories stay
 * byte-identical whether or not contamination is enabled (spec §4.1).
 */
use std::collections::BTreeMap;

use tracing::warn;

use bvm_deterministic::DeterministicMath;

use crate::config::{BiologyConfig, CellLineParams};
use crate::error::BiologyError;
use crate::kinetics::{integrate_contact_pressure, integrate_stress_latent, interval_mean_linear_ramp, logistic_growth};
use crate::types::{DeathCause, StressAxis, VesselState};

const CONSERVATION_TOLERANCE: f64 = 1e-6;

/// Advance one vessel's biology across `[now_h, now_h + dt_h)`.
///
/// `compound_doses_um` and `nutrient_concs_mm` are the spine's view of
/// this vessel as of `now_h`, read by the caller before the call (this
/// crate never reads the spine directly). `total_compound_um` is the
/// sum across all compounds, for the osmotic hazard.
#[allow(clippy::too_many_arguments)]
pub fn step_vessel(
    vessel: &mut VesselState,
    cell_line: &CellLineParams,
    config: &BiologyConfig,
    compound_doses_um: &BTreeMap<String, f64>,
    total_compound_um: f64,
    nutrient_concs_mm: &BTreeMap<String, f64>,
    contamination_onset: bool,
    now_h: f64,
    dt_h: f64,
) -> Result<(), BiologyError> {
    if dt_h < 0.0 {
        return Err(BiologyError::NegativeDt { dt_h });
    }
    if dt_h == 0.0 {
        return Ok(());
    }
    let t0 = now_h;
    let t1 = now_h + dt_h;

    if config.contamination.enabled && contamination_onset {
        vessel.contaminated = true;
    }

    let compound_attrition_hazard =
        compound_attrition_hazard(vessel, cell_line, config, compound_doses_um, t0, t1);
    let starvation_hazard = hazard_if(
        nutrient_concs_mm
            .get(&config.starvation.nutrient_id)
            .copied()
            .unwrap_or(0.0)
            < config.starvation.threshold_mm,
        config.starvation.hazard_rate_per_h,
    );
    let osmotic_hazard = hazard_if(
        total_compound_um > config.osmotic.threshold_um,
        config.osmotic.hazard_rate_per_h,
    );
    let contamination_hazard = hazard_if(vessel.contaminated, config.contamination.hazard_rate_per_h);

    let mut hazards = BTreeMap::new();
    hazards.insert(DeathCause::CompoundAttrition, compound_attrition_hazard);
    hazards.insert(DeathCause::Starvation, starvation_hazard);
    hazards.insert(DeathCause::Osmotic, osmotic_hazard);
    hazards.insert(DeathCause::Contamination, contamination_hazard);
    let total_hazard: f64 = hazards.values().sum();

    let survival = DeterministicMath::safe_exp(-total_hazard * dt_h);
    let viability_before = vessel.viability;
    let viability_after = (viability_before * survival).clamp(0.0, 1.0);
    let delta_viability = viability_before - viability_after;

    if total_hazard > 0.0 {
        for (cause, hazard) in &hazards {
            let share = hazard / total_hazard;
            let entry = vessel.death_ledger.entry(*cause).or_insert(0.0);
            *entry += delta_viability * share;
        }
    }
    vessel.viability = viability_after;

    let ramp = interval_mean_linear_ramp(t0, t1, vessel.t_seed_h, config.lag_duration_h);
    let r_bar = cell_line.baseline_growth_rate_per_h * ramp;
    let capacity = vessel.vessel_capacity * cell_line.carrying_capacity_scalar;
    let grown = logistic_growth(vessel.cell_count, r_bar, capacity, dt_h);
    vessel.cell_count = (grown * survival).max(0.0);

    step_stress_latents(vessel, config, compound_doses_um, cell_line, nutrient_concs_mm, dt_h);
    step_contact_pressure(vessel, config, dt_h);
    relabel_dominant_death_cause(vessel);

    check_invariants(vessel)
}

fn compound_attrition_hazard(
    vessel: &VesselState,
    cell_line: &CellLineParams,
    config: &BiologyConfig,
    compound_doses_um: &BTreeMap<String, f64>,
    t0: f64,
    t1: f64,
) -> f64 {
    let mut hazard = 0.0;
    for (compound_id, dose_um) in compound_doses_um {
        let Some(treatment_start) = vessel.t_treatment_start_h.get(compound_id) else {
            continue;
        };
        let gate = DeterministicMath::interval_gate_fraction(
            t0,
            t1,
            treatment_start + config.attrition_threshold_h,
        );
        if gate <= 0.0 {
            continue;
        }
        let dose_fraction = cell_line.dose_fraction(compound_id, *dose_um);
        hazard += cell_line.max_attrition_hazard_per_h * dose_fraction * gate;
    }
    hazard
}

fn hazard_if(condition: bool, rate_per_h: f64) -> f64 {
    if condition {
        rate_per_h
    } else {
        0.0
    }
}

fn step_stress_latents(
    vessel: &mut VesselState,
    config: &BiologyConfig,
    compound_doses_um: &BTreeMap<String, f64>,
    cell_line: &CellLineParams,
    nutrient_concs_mm: &BTreeMap<String, f64>,
    dt_h: f64,
) {
    let acute_dose_fraction = compound_doses_um
        .iter()
        .map(|(compound_id, dose_um)| cell_line.dose_fraction(compound_id, *dose_um))
        .fold(0.0_f64, f64::max);
    let starving = nutrient_concs_mm
        .get(&config.starvation.nutrient_id)
        .copied()
        .unwrap_or(0.0)
        < config.starvation.threshold_mm;
    let starvation_signal = if starving { 1.0 } else { 0.0 };

    for axis in StressAxis::ALL {
        let Some(kinetics) = config.stress_kinetics.get(&axis) else {
            continue;
        };
        let drive = match axis {
            StressAxis::ErStress => acute_dose_fraction,
            StressAxis::MitochondrialDysfunction => acute_dose_fraction.max(starvation_signal),
            StressAxis::TransportDysfunction => {
                if config.contact_pressure_drives_stress {
                    vessel.contact_pressure
                } else {
                    0.0
                }
            }
        };
        let previous = vessel.stress_latents.get(&axis).copied().unwrap_or(0.0);
        let raw = integrate_stress_latent(previous, drive, kinetics.k_up_per_h, kinetics.k_down_per_h, dt_h);
        if !(0.0..=1.0).contains(&raw) {
            warn!(
                vessel_id = vessel.vessel_id.as_str(),
                axis = axis.as_str(),
                raw,
                "stress latent left [0, 1], clamping"
            );
        }
        vessel.stress_latents.insert(axis, raw.clamp(0.0, 1.0));
    }
}

fn step_contact_pressure(vessel: &mut VesselState, config: &BiologyConfig, dt_h: f64) {
    let confluence = vessel.confluence();
    let target = DeterministicMath::logistic(
        confluence,
        config.contact_pressure.midpoint_confluence,
        config.contact_pressure.steepness,
    );
    vessel.contact_pressure = integrate_contact_pressure(
        vessel.contact_pressure,
        target,
        config.contact_pressure.tau_h,
        dt_h,
    );
}

fn relabel_dominant_death_cause(vessel: &mut VesselState) {
    vessel.dominant_death_cause = vessel
        .death_ledger
        .iter()
        .filter(|(_, mass)| **mass > 0.0)
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(cause, _)| *cause);
}

fn check_invariants(vessel: &VesselState) -> Result<(), BiologyError> {
    let fail = |detail: String| {
        Err(BiologyError::InvariantViolation {
            vessel_id: vessel.vessel_id.clone(),
            detail,
            cell_count: vessel.cell_count,
            viability: vessel.viability,
            death_ledger_sum: vessel.death_ledger_sum(),
        })
    };

    if !vessel.cell_count.is_finite() || vessel.cell_count < 0.0 {
        return fail(format!("cell_count must be >= 0 and finite, got {}", vessel.cell_count));
    }
    if !vessel.viability.is_finite() || !(0.0..=1.0).contains(&vessel.viability) {
        return fail(format!("viability must be in [0, 1], got {}", vessel.viability));
    }
    let ledger_sum = vessel.death_ledger_sum();
    if !ledger_sum.is_finite() {
        return fail("death ledger sum is non-finite".to_string());
    }
    let expected = 1.0 - vessel.viability;
    if (ledger_sum - expected).abs() > CONSERVATION_TOLERANCE {
        return fail(format!(
            "death ledger sum {ledger_sum} does not match 1 - viability {expected}"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use bvm_physics::MirrorSnapshot;

    use super::*;

    fn mirror() -> MirrorSnapshot {
        MirrorSnapshot {
            volume_ul: 200.0,
            compounds: BTreeMap::new(),
            nutrients: BTreeMap::new(),
        }
    }

    fn vessel() -> VesselState {
        VesselState::new("A1".to_string(), "line-a".to_string(), 3000.0, 20_000.0, 0.0, mirror())
    }

    fn cell_line() -> CellLineParams {
        let mut ic50 = BTreeMap::new();
        ic50.insert("compound-x".to_string(), 10.0);
        let mut hill = BTreeMap::new();
        hill.insert("compound-x".to_string(), 1.0);
        CellLineParams {
            baseline_growth_rate_per_h: 0.03,
            carrying_capacity_scalar: 1.0,
            ic50_um: ic50,
            hill_coefficient: hill,
            max_attrition_hazard_per_h: 0.1,
            baseline_channel_means: BTreeMap::new(),
        }
    }

    #[test]
    fn death_ledger_conserves_against_viability() {
        let mut vessel = vessel();
        vessel.t_treatment_start_h.insert("compound-x".to_string(), 0.0);
        let config = BiologyConfig::default();
        let cell_line = cell_line();
        let mut doses = BTreeMap::new();
        doses.insert("compound-x".to_string(), 50.0);

        for hour in 0..10 {
            step_vessel(
                &mut vessel,
                &cell_line,
                &config,
                &doses,
                50.0,
                &BTreeMap::new(),
                false,
                hour as f64 * 24.0,
                24.0,
            )
            .unwrap();
        }

        let sum: f64 = vessel.death_ledger.values().sum();
        assert!((sum - (1.0 - vessel.viability)).abs() < 1e-9);
    }

    #[test]
    fn untreated_vessel_grows_without_dying() {
        let mut vessel = vessel();
        let config = BiologyConfig::default();
        let cell_line = cell_line();
        let before = vessel.cell_count;

        step_vessel(
            &mut vessel,
            &cell_line,
            &config,
            &BTreeMap::new(),
            0.0,
            &BTreeMap::new(),
            false,
            0.0,
            48.0,
        )
        .unwrap();

        assert!(vessel.cell_count > before);
        assert_eq!(vessel.viability, 1.0);
        assert_eq!(vessel.death_ledger_sum(), 0.0);
    }

    #[test]
    fn splitting_a_step_does_not_change_cumulative_hazard_mass() {
        let config = BiologyConfig::default();
        let cell_line = cell_line();
        let mut doses = BTreeMap::new();
        doses.insert("compound-x".to_string(), 50.0);

        let mut whole = vessel();
        whole.t_treatment_start_h.insert("compound-x".to_string(), 0.0);
        step_vessel(&mut whole, &cell_line, &config, &doses, 50.0, &BTreeMap::new(), false, 12.0, 24.0).unwrap();

        let mut split = vessel();
        split.t_treatment_start_h.insert("compound-x".to_string(), 0.0);
        step_vessel(&mut split, &cell_line, &config, &doses, 50.0, &BTreeMap::new(), false, 12.0, 12.0).unwrap();
        step_vessel(&mut split, &cell_line, &config, &doses, 50.0, &BTreeMap::new(), false, 24.0, 12.0).unwrap();

        assert!((whole.viability - split.viability).abs() < 1e-9);
    }

    #[test]
    fn starvation_below_threshold_produces_hazard() {
        let mut vessel = vessel();
        let config = BiologyConfig::default();
        let cell_line = cell_line();
        let mut nutrients = BTreeMap::new();
        nutrients.insert("glucose".to_string(), 0.1);

        step_vessel(
            &mut vessel,
            &cell_line,
            &config,
            &BTreeMap::new(),
            0.0,
            &nutrients,
            false,
            0.0,
            24.0,
        )
        .unwrap();

        assert!(vessel.viability < 1.0);
        assert_eq!(vessel.dominant_death_cause, Some(DeathCause::Starvation));
    }

    #[test]
    fn negative_dt_is_rejected() {
        let mut vessel = vessel();
        let config = BiologyConfig::default();
        let cell_line = cell_line();
        let err = step_vessel(
            &mut vessel,
            &cell_line,
            &config,
            &BTreeMap::new(),
            0.0,
            &BTreeMap::new(),
            false,
            0.0,
            -1.0,
        )
        .unwrap_err();
        assert!(matches!(err, BiologyError::NegativeDt { .. }));
    }
}
