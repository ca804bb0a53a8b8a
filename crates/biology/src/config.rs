use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::StressAxis;

/// Per-cell-line growth and sensitivity parameters (spec §3
/// [SUPPLEMENT] cell line registry; spec §9 `cell_lines`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CellLineParams {
    /// Intrinsic exponential growth rate in the absence of stress,
    /// confluence saturation, or death (per hour).
    pub baseline_growth_rate_per_h: f64,
    /// Multiplies the vessel's nominal capacity to get this cell line's
    /// effective carrying capacity.
    pub carrying_capacity_scalar: f64,
    /// Half-maximal inhibitory concentration per compound, µM.
    pub ic50_um: BTreeMap<String, f64>,
    /// Hill coefficient per compound (steepness of the dose-response).
    pub hill_coefficient: BTreeMap<String, f64>,
    /// Hazard rate per hour at full (saturating) dose occupancy.
    pub max_attrition_hazard_per_h: f64,
    /// Baseline per-channel morphology means, consumed by measurement.
    pub baseline_channel_means: BTreeMap<String, f64>,
}

impl CellLineParams {
    /// Fractional dose-response occupancy in `[0, 1)` via a Hill
    /// function: `conc^n / (conc^n + ic50^n)`. Returns `0.0` for an
    /// unlisted compound (no sensitivity declared).
    pub fn dose_fraction(&self, compound_id: &str, conc_um: f64) -> f64 {
        let ic50 = match self.ic50_um.get(compound_id) {
            Some(v) if *v > 0.0 => *v,
            _ => return 0.0,
        };
        if conc_um <= 0.0 {
            return 0.0;
        }
        let n = self.hill_coefficient.get(compound_id).copied().unwrap_or(1.0);
        let conc_n = conc_um.powf(n);
        let ic50_n = ic50.powf(n);
        conc_n / (conc_n + ic50_n)
    }
}

/// Sigmoid parameters for the contact-pressure response curve
/// (spec §9 `contact_pressure`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContactPressureConfig {
    pub midpoint_confluence: f64,
    pub steepness: f64,
    /// Lag time constant for contact pressure buildup (spec: ~12h).
    pub tau_h: f64,
}

impl Default for ContactPressureConfig {
    fn default() -> Self {
        Self {
            midpoint_confluence: 0.80,
            steepness: 10.0,
            tau_h: 12.0,
        }
    }
}

/// Starvation hazard parameters: a vessel starves when a tracked
/// nutrient falls below `threshold_mm`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StarvationConfig {
    pub nutrient_id: String,
    pub threshold_mm: f64,
    pub hazard_rate_per_h: f64,
}

impl Default for StarvationConfig {
    fn default() -> Self {
        Self {
            nutrient_id: "glucose".to_string(),
            threshold_mm: 1.0,
            hazard_rate_per_h: 0.02,
        }
    }
}

/// Osmotic-stress hazard parameters: triggered when total compound
/// concentration in a vessel exceeds `threshold_um`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OsmoticConfig {
    pub threshold_um: f64,
    pub hazard_rate_per_h: f64,
}

impl Default for OsmoticConfig {
    fn default() -> Self {
        Self {
            threshold_um: 500.0,
            hazard_rate_per_h: 0.01,
        }
    }
}

/// Contamination parameters. Contamination is a rare discrete
/// operational event (spec §4.1), drawn from `rng_operational_events`
/// so enabling/disabling it cannot perturb biology-stream outputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContaminationConfig {
    pub enabled: bool,
    pub onset_probability_per_h: f64,
    pub hazard_rate_per_h: f64,
}

impl Default for ContaminationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            onset_probability_per_h: 0.0005,
            hazard_rate_per_h: 0.15,
        }
    }
}

/// Per-axis linear kinetics: `dS/dt = k_up * p(t) - k_down * S`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StressKineticsParams {
    pub k_up_per_h: f64,
    pub k_down_per_h: f64,
}

/// Full biology configuration (spec §9 "configurable biology
/// parameters"): a reject-unknown-fields record, not a monkey-patchable
/// global.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BiologyConfig {
    pub cell_lines: BTreeMap<String, CellLineParams>,
    pub vessel_capacity: f64,
    /// Hours post-treatment-start before compound attrition can begin
    /// (spec worked example: 12h gate).
    pub attrition_threshold_h: f64,
    /// Hours post-seed over which the lag-phase growth ramp rises
    /// linearly from 0 to 1.
    pub lag_duration_h: f64,
    pub contact_pressure: ContactPressureConfig,
    /// Open question (spec §9): does contact pressure drive biological
    /// stress hazards, or only enter measurement as a nuisance
    /// covariate? Resolved in DESIGN.md; default `false` (deferred).
    pub contact_pressure_drives_stress: bool,
    pub starvation: StarvationConfig,
    pub osmotic: OsmoticConfig,
    pub contamination: ContaminationConfig,
    pub stress_kinetics: BTreeMap<StressAxis, StressKineticsParams>,
    /// Per-channel contact-pressure nuisance coefficients consumed by
    /// measurement (spec §4.5 "nuisance feedback", e.g. +10% actin per
    /// unit Δp).
    pub contact_pressure_channel_coefficients: BTreeMap<String, f64>,
}

impl Default for BiologyConfig {
    fn default() -> Self {
        let mut stress_kinetics = BTreeMap::new();
        stress_kinetics.insert(
            StressAxis::ErStress,
            StressKineticsParams {
                k_up_per_h: 0.08,
                k_down_per_h: 0.05,
            },
        );
        stress_kinetics.insert(
            StressAxis::MitochondrialDysfunction,
            StressKineticsParams {
                k_up_per_h: 0.05,
                k_down_per_h: 0.04,
            },
        );
        stress_kinetics.insert(
            StressAxis::TransportDysfunction,
            StressKineticsParams {
                k_up_per_h: 0.03,
                k_down_per_h: 0.03,
            },
        );

        let mut contact_pressure_channel_coefficients = BTreeMap::new();
        contact_pressure_channel_coefficients.insert("actin".to_string(), 0.10);

        Self {
            cell_lines: BTreeMap::new(),
            vessel_capacity: 20_000.0,
            attrition_threshold_h: 12.0,
            lag_duration_h: 6.0,
            contact_pressure: ContactPressureConfig::default(),
            contact_pressure_drives_stress: false,
            starvation: StarvationConfig::default(),
            osmotic: OsmoticConfig::default(),
            contamination: ContaminationConfig::default(),
            stress_kinetics,
            contact_pressure_channel_coefficients,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dose_fraction_is_half_at_ic50() {
        let mut params = CellLineParams {
            baseline_growth_rate_per_h: 0.03,
            carrying_capacity_scalar: 1.0,
            ic50_um: BTreeMap::new(),
            hill_coefficient: BTreeMap::new(),
            max_attrition_hazard_per_h: 0.2,
            baseline_channel_means: BTreeMap::new(),
        };
        params.ic50_um.insert("compound-x".to_string(), 10.0);
        let frac = params.dose_fraction("compound-x", 10.0);
        assert!((frac - 0.5).abs() < 1e-9);
    }

    #[test]
    fn dose_fraction_is_zero_for_unlisted_compound() {
        let params = CellLineParams {
            baseline_growth_rate_per_h: 0.03,
            carrying_capacity_scalar: 1.0,
            ic50_um: BTreeMap::new(),
            hill_coefficient: BTreeMap::new(),
            max_attrition_hazard_per_h: 0.2,
            baseline_channel_means: BTreeMap::new(),
        };
        assert_eq!(params.dose_fraction("unknown", 100.0), 0.0);
    }
}
