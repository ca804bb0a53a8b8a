//! Assay orchestration: wires the eight noise layers together for the
//! two concrete assay kinds (spec §4.6 [SUPPLEMENT]).
//!
//! Both functions draw exclusively from an `rng_assay` stream, checked
//! against [`rng::MEASUREMENT_GUARD`] so a caller cannot accidentally
//! hand in a biology or batch stream and silently couple measurement
//! noise to simulation state (spec §8 "observer independence").

use std::collections::BTreeMap;

use bvm_biology::{CellLineParams, VesselState};
use rng::RngStream;

use crate::config::{MeasurementConfig, RunContext};
use crate::error::MeasurementError;
use crate::noise;
use crate::types::{Assay, ImagingArtifacts, Observation, QcFlag};

/// Produce a Cell-Painting-style observation: one intensity value per
/// requested channel, each run through the full noise stack
/// independently.
#[allow(clippy::too_many_arguments)]
pub fn measure_cell_painting(
    vessel: &VesselState,
    cell_line: &CellLineParams,
    config: &MeasurementConfig,
    run_context: &RunContext,
    channels: &[String],
    dose_occupancy: f64,
    is_edge_well: bool,
    hours_since_seed: f64,
    observation_time_h: f64,
    include_structured_artifacts: bool,
    rng: &mut RngStream,
) -> Result<Observation, MeasurementError> {
    rng::MEASUREMENT_GUARD.check(rng.subsystem())?;

    let confluence = vessel.confluence();
    let quality = noise::segmentation_quality(
        confluence,
        config.segmentation.base_quality,
        config.segmentation.confluence_penalty_coefficient,
    );

    let mut intensities = BTreeMap::new();
    let mut qc_flags: BTreeMap<String, Vec<QcFlag>> = BTreeMap::new();
    let mut dropped = false;
    let mut any_artifacts: Option<ImagingArtifacts> = None;

    for channel in channels {
        let baseline = cell_line.baseline_channel_means.get(channel).copied().ok_or_else(|| {
            MeasurementError::UnknownChannel {
                cell_line: vessel.cell_line.clone(),
                channel: channel.clone(),
            }
        })?;
        let channel_cfg = config.channels.get(channel).cloned().unwrap_or_default();

        let mut signal = noise::apply_acute_effect(baseline, channel_cfg.acute_effect_coefficient, dose_occupancy);

        let chronic_coeffs = config
            .chronic_effect_coefficients
            .get(channel)
            .cloned()
            .unwrap_or_default();
        signal = noise::apply_chronic_effect(signal, &vessel.stress_latents, &chronic_coeffs);
        signal = noise::apply_viability_floor(signal, vessel.viability, channel_cfg.viability_floor);

        let transient_boost = noise::plating_transient_sigma_boost(
            hours_since_seed,
            config.plating_transient.peak_cv_boost,
            config.plating_transient.decay_tau_h,
        );
        signal = noise::apply_batch_bias(signal, run_context, channel);
        signal = noise::apply_edge_well_penalty(signal, is_edge_well, config.edge_well.signal_penalty_multiplier);

        let well_sigma = channel_cfg.well_noise_sigma + transient_boost;
        signal = noise::apply_well_noise(signal, well_sigma, rng);

        let mut flags = Vec::new();
        if let Some(mode) = noise::draw_well_failure(
            config.well_failure_base_rate_per_h,
            is_edge_well,
            config.edge_well.failure_rate_multiplier,
            rng,
        ) {
            let (distorted, flag) = noise::apply_well_failure(signal, mode);
            signal = distorted;
            flags.push(flag);
        }

        signal = noise::apply_segmentation_distortion(signal, quality, rng);
        if quality < config.segmentation.low_quality_threshold {
            flags.push(QcFlag::LowQualitySegmentation);
        }

        if include_structured_artifacts && any_artifacts.is_none() {
            any_artifacts = Some(noise::build_imaging_artifacts(run_context, channel, quality, vessel));
        }

        let _ = intensities.insert(channel.clone(), signal.max(0.0));
        if !flags.is_empty() {
            let _ = qc_flags.insert(channel.clone(), flags);
        }
    }

    if qc_flags.values().any(|flags| {
        flags
            .iter()
            .any(|f| matches!(f, QcFlag::WellFailure(crate::types::WellFailureMode::Contamination)))
    }) {
        dropped = true;
    }

    Ok(Observation {
        vessel_id: vessel.vessel_id.clone(),
        assay_kind: Assay::CellPainting { channels: channels.to_vec() }.kind(),
        observation_time_h,
        viability: vessel.viability,
        observed_cell_count: vessel.cell_count,
        channel_intensities: intensities,
        channel_qc_flags: qc_flags,
        segmentation_quality: quality,
        dropped,
        imaging_artifacts: any_artifacts,
    })
}

/// Produce a cytotoxicity (LDH-release-like) observation: a single
/// scalar signal driven by `1 - viability`, with well-level noise and
/// edge-well penalty but no segmentation (no imaging, no confluence
/// quality score).
#[allow(clippy::too_many_arguments)]
pub fn measure_cytotoxicity(
    vessel: &VesselState,
    config: &MeasurementConfig,
    run_context: &RunContext,
    is_edge_well: bool,
    observation_time_h: f64,
    rng: &mut RngStream,
) -> Result<Observation, MeasurementError> {
    rng::MEASUREMENT_GUARD.check(rng.subsystem())?;

    let release = (1.0 - vessel.viability) * config.cytotoxicity_release_gain;
    let mut signal = noise::apply_batch_bias(release, run_context, "cytotoxicity");
    signal = noise::apply_edge_well_penalty(signal, is_edge_well, config.edge_well.signal_penalty_multiplier);
    signal = noise::apply_well_noise(signal, config.cytotoxicity_noise_sigma, rng);

    let mut flags = Vec::new();
    let mut dropped = false;
    if let Some(mode) = noise::draw_well_failure(
        config.well_failure_base_rate_per_h,
        is_edge_well,
        config.edge_well.failure_rate_multiplier,
        rng,
    ) {
        let (distorted, flag) = noise::apply_well_failure(signal, mode);
        signal = distorted;
        if matches!(mode, crate::types::WellFailureMode::Contamination) {
            dropped = true;
        }
        flags.push(flag);
    }

    let mut channel_intensities = BTreeMap::new();
    let _ = channel_intensities.insert("ldh_release".to_string(), signal.max(0.0));
    let mut channel_qc_flags = BTreeMap::new();
    if !flags.is_empty() {
        let _ = channel_qc_flags.insert("ldh_release".to_string(), flags);
    }

    Ok(Observation {
        vessel_id: vessel.vessel_id.clone(),
        assay_kind: Assay::Cytotoxicity.kind(),
        observation_time_h,
        viability: vessel.viability,
        observed_cell_count: vessel.cell_count,
        channel_intensities,
        channel_qc_flags,
        segmentation_quality: 1.0,
        dropped,
        imaging_artifacts: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bvm_biology::VesselState;
    use bvm_physics::MirrorSnapshot;
    use std::collections::BTreeMap;

    fn make_vessel() -> VesselState {
        let mirror = MirrorSnapshot {
            volume_ul: 200.0,
            compounds: BTreeMap::new(),
            nutrients: BTreeMap::new(),
        };
        let mut vessel = VesselState::new("v1".to_string(), "line-a".to_string(), 5000.0, 20_000.0, 0.0, mirror);
        vessel.viability = 0.9;
        vessel
    }

    fn make_cell_line() -> CellLineParams {
        let mut baseline_channel_means = BTreeMap::new();
        let _ = baseline_channel_means.insert("actin".to_string(), 100.0);
        CellLineParams {
            baseline_growth_rate_per_h: 0.03,
            carrying_capacity_scalar: 1.0,
            ic50_um: BTreeMap::new(),
            hill_coefficient: BTreeMap::new(),
            max_attrition_hazard_per_h: 0.2,
            baseline_channel_means,
        }
    }

    #[test]
    fn unknown_channel_is_rejected() {
        let vessel = make_vessel();
        let cell_line = make_cell_line();
        let config = MeasurementConfig::default();
        let run_context = RunContext::sample(
            &mut RngStream::new([1u8; 32], rng::RngSubsystem::Batch, 0),
            &["actin".to_string()],
        );
        let mut rng = RngStream::new([1u8; 32], rng::RngSubsystem::Assay, 0);
        let result = measure_cell_painting(
            &vessel,
            &cell_line,
            &config,
            &run_context,
            &["dna".to_string()],
            0.0,
            false,
            24.0,
            24.0,
            false,
            &mut rng,
        );
        assert!(matches!(result, Err(MeasurementError::UnknownChannel { .. })));
    }

    #[test]
    fn cell_painting_is_deterministic_for_fixed_seed() {
        let vessel = make_vessel();
        let cell_line = make_cell_line();
        let config = MeasurementConfig::default();
        let channels = vec!["actin".to_string()];
        let run_context = RunContext::sample(&mut RngStream::new([5u8; 32], rng::RngSubsystem::Batch, 0), &channels);

        let mut rng1 = RngStream::new([5u8; 32], rng::RngSubsystem::Assay, 0);
        let mut rng2 = RngStream::new([5u8; 32], rng::RngSubsystem::Assay, 0);
        let obs1 =
            measure_cell_painting(&vessel, &cell_line, &config, &run_context, &channels, 0.2, false, 24.0, 24.0, false, &mut rng1)
                .unwrap();
        let obs2 =
            measure_cell_painting(&vessel, &cell_line, &config, &run_context, &channels, 0.2, false, 24.0, 24.0, false, &mut rng2)
                .unwrap();
        assert_eq!(obs1, obs2);
    }

    #[test]
    fn cytotoxicity_increases_with_death() {
        let config = MeasurementConfig::default();
        let run_context = RunContext::sample(&mut RngStream::new([2u8; 32], rng::RngSubsystem::Batch, 0), &[]);

        let mut healthy = make_vessel();
        healthy.viability = 0.99;
        let mut dying = make_vessel();
        dying.viability = 0.2;

        let mut rng1 = RngStream::new([2u8; 32], rng::RngSubsystem::Assay, 0);
        let mut rng2 = RngStream::new([2u8; 32], rng::RngSubsystem::Assay, 0);
        let obs_healthy = measure_cytotoxicity(&healthy, &config, &run_context, false, 24.0, &mut rng1).unwrap();
        let obs_dying = measure_cytotoxicity(&dying, &config, &run_context, false, 24.0, &mut rng2).unwrap();

        let healthy_signal = obs_healthy.channel_intensities["ldh_release"];
        let dying_signal = obs_dying.channel_intensities["ldh_release"];
        assert!(dying_signal > healthy_signal);
    }
}
