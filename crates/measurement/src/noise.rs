//! The eight-layer noise model (spec §4.6), applied in a fixed order so
//! that replay and "observer independence" hold regardless of which
//! assay is requested: baseline -> acute effect -> chronic effect ->
//! viability attenuation -> plating transient -> batch/channel bias ->
//! edge-well + well noise + failure modes -> segmentation distortion.

use std::collections::BTreeMap;

use bvm_biology::{StressAxis, VesselState};
use rng::RngStream;

use crate::config::RunContext;
use crate::types::{ImagingArtifacts, QcFlag, WellFailureMode};

/// Layer 1+2: baseline channel mean scaled by the acute compound
/// effect. `dose_occupancy` is the dominant compound's Hill-function
/// occupancy in `[0, 1)`, already computed by the caller from
/// `CellLineParams::dose_fraction`.
pub fn apply_acute_effect(baseline_mean: f64, acute_coefficient: f64, dose_occupancy: f64) -> f64 {
    baseline_mean * (1.0 + acute_coefficient * dose_occupancy)
}

/// Layer 3: chronic latent effect. Each stress axis contributes
/// linearly, scaled by its per-channel coefficient.
pub fn apply_chronic_effect(
    signal: f64,
    stress_latents: &BTreeMap<StressAxis, f64>,
    coefficients: &BTreeMap<StressAxis, f64>,
) -> f64 {
    let mut total = 0.0;
    for (axis, latent) in stress_latents {
        let coeff = coefficients.get(axis).copied().unwrap_or(0.0);
        total += coeff * latent;
    }
    signal * (1.0 + total)
}

/// Layer 3b: viability attenuation. Signal never fully vanishes dead
/// cells still autofluoresce at `viability_floor`.
pub fn apply_viability_floor(signal: f64, viability: f64, viability_floor: f64) -> f64 {
    signal * (viability_floor + (1.0 - viability_floor) * viability)
}

/// Layer 4: plating/post-dissociation transient CV boost, as an
/// exponentially-decaying multiplicative sigma added on top of the
/// base well-noise sigma.
pub fn plating_transient_sigma_boost(
    hours_since_seed: f64,
    peak_cv_boost: f64,
    decay_tau_h: f64,
) -> f64 {
    if hours_since_seed < 0.0 {
        return 0.0;
    }
    peak_cv_boost * (-hours_since_seed / decay_tau_h).exp()
}

/// Layer 6: run-level batch/channel bias, applied multiplicatively.
pub fn apply_batch_bias(signal: f64, run_context: &RunContext, channel: &str) -> f64 {
    signal * run_context.combined_bias() * run_context.gain_for(channel)
}

/// Layer 7a: edge-well signal penalty.
pub fn apply_edge_well_penalty(signal: f64, is_edge_well: bool, penalty_multiplier: f64) -> f64 {
    if is_edge_well {
        signal * penalty_multiplier
    } else {
        signal
    }
}

/// Layer 7b: well-level lognormal noise. `sigma` is the combined base
/// plus plating-transient sigma.
pub fn apply_well_noise(signal: f64, sigma: f64, rng: &mut RngStream) -> f64 {
    if sigma <= 0.0 {
        return signal;
    }
    let mu = -0.5 * sigma * sigma;
    signal * rng.next_lognormal(mu, sigma)
}

/// Layer 7c: draw whether a rare well-failure mode fires this
/// observation. Returns `None` if no failure fires.
pub fn draw_well_failure(
    base_rate_per_h: f64,
    is_edge_well: bool,
    edge_multiplier: f64,
    rng: &mut RngStream,
) -> Option<WellFailureMode> {
    let rate = if is_edge_well {
        base_rate_per_h * edge_multiplier
    } else {
        base_rate_per_h
    };
    let modes = WellFailureMode::ALL;
    let total_p = rate * modes.len() as f64;
    let draw = rng.next_f64();
    if draw >= total_p {
        return None;
    }
    let slot = (draw / rate).floor() as usize;
    modes.get(slot.min(modes.len() - 1)).copied()
}

/// Apply a fired well-failure mode's characteristic signature to the
/// signal, and return the QC flag it contributes.
pub fn apply_well_failure(signal: f64, mode: WellFailureMode) -> (f64, QcFlag) {
    let distorted = match mode {
        WellFailureMode::Bubble => signal * 0.4,
        WellFailureMode::Contamination => signal * 1.8,
        WellFailureMode::FocusFailure => signal * 0.6,
        WellFailureMode::PipettingMiss => signal * 0.1,
    };
    (distorted, QcFlag::WellFailure(mode))
}

/// Layer 8: segmentation quality score, degraded by confluence
/// crowding.
pub fn segmentation_quality(confluence: f64, base_quality: f64, confluence_penalty: f64) -> f64 {
    (base_quality - confluence_penalty * confluence.max(0.0)).clamp(0.0, 1.0)
}

/// Layer 8b: segmentation distortion applied to the signal, separate
/// from the quality score itself (which is reported, not folded in
/// silently).
pub fn apply_segmentation_distortion(signal: f64, quality: f64, rng: &mut RngStream) -> f64 {
    let distortion_sigma = (1.0 - quality) * 0.25;
    if distortion_sigma <= 0.0 {
        return signal;
    }
    let mu = -0.5 * distortion_sigma * distortion_sigma;
    signal * rng.next_lognormal(mu, distortion_sigma)
}

/// Build the opt-in structured artifacts record from the same inputs
/// used to distort the signal, so the structured and scalar paths never
/// disagree about what happened.
pub fn build_imaging_artifacts(
    run_context: &RunContext,
    channel: &str,
    segmentation_quality: f64,
    vessel: &VesselState,
) -> ImagingArtifacts {
    ImagingArtifacts {
        background_multiplier: run_context.combined_bias() * run_context.gain_for(channel),
        segmentation_mode: if segmentation_quality >= 0.6 {
            "nominal".to_string()
        } else {
            "degraded".to_string()
        },
        spatial_field_row: vessel.mirror.volume_ul.signum(),
        spatial_field_col: vessel.contact_pressure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viability_floor_bounds_attenuation() {
        let at_zero = apply_viability_floor(1.0, 0.0, 0.05);
        let at_one = apply_viability_floor(1.0, 1.0, 0.05);
        assert!((at_zero - 0.05).abs() < 1e-12);
        assert!((at_one - 1.0).abs() < 1e-12);
    }

    #[test]
    fn plating_transient_decays_to_zero() {
        let boost = plating_transient_sigma_boost(1_000.0, 0.15, 18.0);
        assert!(boost < 1e-6);
        let initial = plating_transient_sigma_boost(0.0, 0.15, 18.0);
        assert!((initial - 0.15).abs() < 1e-12);
    }

    #[test]
    fn well_noise_is_deterministic_for_fixed_seed() {
        let seed = [3u8; 32];
        let mut s1 = RngStream::new(seed, rng::RngSubsystem::Assay, 0);
        let mut s2 = RngStream::new(seed, rng::RngSubsystem::Assay, 0);
        assert_eq!(apply_well_noise(1.0, 0.1, &mut s1), apply_well_noise(1.0, 0.1, &mut s2));
    }

    #[test]
    fn edge_well_penalty_only_applies_to_edge_wells() {
        assert_eq!(apply_edge_well_penalty(100.0, false, 0.9), 100.0);
        assert!((apply_edge_well_penalty(100.0, true, 0.9) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn segmentation_quality_degrades_with_confluence() {
        let low = segmentation_quality(0.1, 0.97, 0.3);
        let high = segmentation_quality(1.0, 0.97, 0.3);
        assert!(high < low);
    }
}
