use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use bvm_biology::StressAxis;

/// Per-channel measurement tunables (spec §4.6 layers 1, 4, 5): the
/// viability floor below which a channel signal cannot fall regardless
/// of cell death, and the well-level multiplicative noise applied after
/// all bias layers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChannelConfig {
    /// Fraction of baseline signal retained at zero viability (spec
    /// §4.6 layer 3: "signal never fully vanishes dead cells still
    /// autofluoresce").
    pub viability_floor: f64,
    /// Acute compound-effect coefficient: scales this channel's response
    /// to instantaneous dose occupancy.
    pub acute_effect_coefficient: f64,
    /// Well-level lognormal noise sigma (underlying-normal scale) applied
    /// after all deterministic bias layers.
    pub well_noise_sigma: f64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            viability_floor: 0.05,
            acute_effect_coefficient: 0.0,
            well_noise_sigma: 0.08,
        }
    }
}

/// Plating/post-dissociation transient (spec §4.6 layer 4): an
/// exponentially-decaying boost to well-to-well CV that starts at
/// `t_seed_h` and fades with `decay_tau_h`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PlatingTransientConfig {
    pub peak_cv_boost: f64,
    pub decay_tau_h: f64,
}

impl Default for PlatingTransientConfig {
    fn default() -> Self {
        Self {
            peak_cv_boost: 0.15,
            decay_tau_h: 18.0,
        }
    }
}

/// Edge-well penalty (spec §4.6 layer 7): wells on the plate perimeter
/// get a fixed evaporation/illumination-driven multiplicative penalty
/// and an elevated well-failure probability.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EdgeWellConfig {
    pub signal_penalty_multiplier: f64,
    pub failure_rate_multiplier: f64,
}

impl Default for EdgeWellConfig {
    fn default() -> Self {
        Self {
            signal_penalty_multiplier: 0.92,
            failure_rate_multiplier: 3.0,
        }
    }
}

/// Segmentation-quality model (spec §4.6 layer 8): quality score `q` in
/// `[0, 1]` degrades proportionally to confluence crowding and
/// contributes its own multiplicative distortion to intensities.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SegmentationConfig {
    pub base_quality: f64,
    pub confluence_penalty_coefficient: f64,
    /// Quality below this threshold flags the channel
    /// [`crate::types::QcFlag::LowQualitySegmentation`] but does not by
    /// itself drop the well.
    pub low_quality_threshold: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            base_quality: 0.97,
            confluence_penalty_coefficient: 0.3,
            low_quality_threshold: 0.6,
        }
    }
}

/// Full measurement configuration (spec §9 "configurable... assay
/// parameters"): reject-unknown-fields, no monkey-patchable global.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MeasurementConfig {
    pub channels: BTreeMap<String, ChannelConfig>,
    pub plating_transient: PlatingTransientConfig,
    pub edge_well: EdgeWellConfig,
    pub segmentation: SegmentationConfig,
    /// Chronic (stress-latent-driven) effect coefficients per channel per
    /// axis (spec §4.6 layer 3: "chronic latent effect").
    pub chronic_effect_coefficients: BTreeMap<String, BTreeMap<StressAxis, f64>>,
    /// Base per-hour probability of each rare well-failure mode (spec
    /// §4.6 layer 7), before the edge-well multiplier.
    pub well_failure_base_rate_per_h: f64,
    /// Cytotoxicity-assay LDH-release-like signal scaling: maps
    /// `1 - viability` to a release signal.
    pub cytotoxicity_release_gain: f64,
    pub cytotoxicity_noise_sigma: f64,
}

impl Default for MeasurementConfig {
    fn default() -> Self {
        Self {
            channels: BTreeMap::new(),
            plating_transient: PlatingTransientConfig::default(),
            edge_well: EdgeWellConfig::default(),
            segmentation: SegmentationConfig::default(),
            chronic_effect_coefficients: BTreeMap::new(),
            well_failure_base_rate_per_h: 0.0005,
            cytotoxicity_release_gain: 1.0,
            cytotoxicity_noise_sigma: 0.06,
        }
    }
}

/// Batch-level biases sampled exactly once per run from `rng_batch`
/// (spec §4.6 layer 6 "per-channel/per-batch bias"; §4.1 role
/// `rng_batch`). Held by the orchestrator and passed by reference into
/// every assay call for the run's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunContext {
    pub illumination_bias: f64,
    pub channel_gain: BTreeMap<String, f64>,
    pub operator_shift: f64,
    pub day_shift: f64,
    pub plate_shift: f64,
}

impl RunContext {
    /// Sample a fresh run context from `rng_batch`. Must be called
    /// exactly once per run; re-sampling mid-run breaks the "sampled
    /// once" contract and makes assay output order-dependent.
    pub fn sample(rng: &mut rng::RngStream, channels: &[String]) -> Self {
        let illumination_bias = 1.0 + 0.03 * rng.next_gaussian();
        let operator_shift = 0.02 * rng.next_gaussian();
        let day_shift = 0.02 * rng.next_gaussian();
        let plate_shift = 0.015 * rng.next_gaussian();
        let mut channel_gain = BTreeMap::new();
        for channel in channels {
            let _ = channel_gain.insert(channel.clone(), 1.0 + 0.04 * rng.next_gaussian());
        }
        Self {
            illumination_bias,
            channel_gain,
            operator_shift,
            day_shift,
            plate_shift,
        }
    }

    pub fn gain_for(&self, channel: &str) -> f64 {
        self.channel_gain.get(channel).copied().unwrap_or(1.0)
    }

    /// Combined scalar bias applied before well-level noise (spec §4.6
    /// layer 6): product of illumination and the three additive shifts
    /// folded back to a multiplicative factor around 1.0.
    pub fn combined_bias(&self) -> f64 {
        self.illumination_bias * (1.0 + self.operator_shift + self.day_shift + self.plate_shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_context_is_deterministic_for_fixed_seed() {
        let seed = [9u8; 32];
        let channels = vec!["actin".to_string(), "dna".to_string()];
        let mut s1 = rng::RngStream::new(seed, rng::RngSubsystem::Batch, 0);
        let mut s2 = rng::RngStream::new(seed, rng::RngSubsystem::Batch, 0);
        let ctx1 = RunContext::sample(&mut s1, &channels);
        let ctx2 = RunContext::sample(&mut s2, &channels);
        assert_eq!(ctx1, ctx2);
    }
}
