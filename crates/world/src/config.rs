use serde::{Deserialize, Serialize};

use bvm_biology::BiologyConfig;
use bvm_epistemic::EpistemicConfig;
use bvm_measurement::MeasurementConfig;
use bvm_physics::{ChemistryConfig, EvaporationConfig};

/// Full configuration for one `World` run: the union of every
/// subsystem's own config, plus the handful of settings that only make
/// sense at the orchestrator seam (spec §9 "every tunable lives in a
/// config object, not a hardcoded constant").
///
/// `#[serde(deny_unknown_fields)]` so a malformed run config fails to
/// deserialize rather than silently ignoring a misspelled section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WorldConfig {
    /// The single root seed every RNG stream in the run derives from
    /// (spec §4.1).
    pub root_seed: u64,
    pub evaporation: EvaporationConfig,
    pub chemistry: ChemistryConfig,
    pub biology: BiologyConfig,
    pub measurement: MeasurementConfig,
    pub epistemic: EpistemicConfig,
    /// Overrides `EpistemicConfig::baseline_entropy_default` for this
    /// run (spec §4.7 "`baseline_entropy` set once per run").
    pub epistemic_baseline_entropy: Option<f64>,
    /// Channels sampled into the run's batch-level bias
    /// (`RunContext::sample`) and offered to Cell-Painting assays.
    pub measurement_channels: Vec<String>,
    /// Cap on inflated cost per claimed bit of marginal information gain
    /// before a measurement request is refused (spec §7 "Quota/
    /// justification failure"). Generous by default so a well-behaved
    /// agent with little accrued debt is never refused.
    pub max_cost_per_bit: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            root_seed: 0,
            evaporation: EvaporationConfig::default(),
            chemistry: ChemistryConfig::default(),
            biology: BiologyConfig::default(),
            measurement: MeasurementConfig::default(),
            epistemic: EpistemicConfig::default(),
            epistemic_baseline_entropy: None,
            measurement_channels: Vec::new(),
            max_cost_per_bit: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_json() {
        let config = WorldConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let reloaded: WorldConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, reloaded);
    }
}
