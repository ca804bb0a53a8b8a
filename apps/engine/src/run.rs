/**
 * Purpose: drives the per-cycle contract of spec §4.8's pseudocode
 * (`submit_design` -> `advance_time` -> `measure` -> `resolve_action`)
 * against the reference scenario in `crate::demo`, persisting every
 * artifact spec §6 names.
 */
use std::path::Path;

use tracing::{info, warn};

use bvm_epistemic::EntropySource;
use bvm_measurement::Assay;
use bvm_persistence::{open_ledger, open_measurements, write_event_log, EpistemicLedgerEntry};
use bvm_world::{Claim, DefaultDesignBridge, World, WorldConfig};

use crate::config::EngineConfig;

/// Hours beyond which a single cycle's `dt` risks under-resolving a
/// death-heavy attrition gate (spec §4.5 "must not exceed 24h for
/// death-sensitive conditions"; spec §7 "Discretization warning").
const DEATH_SENSITIVE_DT_CEILING_H: f64 = 24.0;

/// Outcome of one run, summarized for the caller to log or compare
/// across parallel seeds.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub root_seed: u64,
    pub cycles_run: u32,
    pub final_now_h: f64,
    pub final_debt_bits: f64,
    pub event_count: usize,
}

/// Run the reference scenario for `engine_config.cycles` cycles against
/// a fresh `World`, persisting the event log, epistemic ledger, and
/// measurement records under `engine_config.out_dir`.
pub fn run_once(engine_config: &EngineConfig) -> Result<RunSummary, Box<dyn std::error::Error>> {
    run_with_seed(engine_config, engine_config.root_seed)
}

/// Run the same scenario under `root_seed`, writing artifacts to a
/// seed-specific subdirectory of `engine_config.out_dir` (spec §5:
/// independent root seeds are embarrassingly parallel runs).
pub fn run_with_seed(engine_config: &EngineConfig, root_seed: u64) -> Result<RunSummary, Box<dyn std::error::Error>> {
    if engine_config.dt_cycle_h < 0.0 {
        return Err(format!("dt_cycle_h must be non-negative, got {}", engine_config.dt_cycle_h).into());
    }
    if engine_config.dt_cycle_h > DEATH_SENSITIVE_DT_CEILING_H {
        warn!(
            dt_cycle_h = engine_config.dt_cycle_h,
            ceiling_h = DEATH_SENSITIVE_DT_CEILING_H,
            "discretization warning: dt_cycle_h exceeds the recommended ceiling for death-sensitive regimes"
        );
    }

    let out_dir = Path::new(&engine_config.out_dir).join(format!("seed-{root_seed}"));
    std::fs::create_dir_all(&out_dir)?;

    let world_config: WorldConfig = crate::demo::demo_world_config(root_seed);
    let mut world = World::new(world_config);
    let bridge = DefaultDesignBridge;

    let mut ledger_writer = open_ledger(out_dir.join("epistemic_ledger.jsonl"))?;
    let mut measurement_writer = open_measurements(out_dir.join("measurements.jsonl"))?;

    let vessel_id = "A1";
    let mut next_action_id: u64 = 0;

    for cycle in 0..engine_config.cycles {
        let design = crate::demo::design_for_cycle(cycle, vessel_id);
        world.submit_design(&bridge, &design)?;
        world.advance_time(engine_config.dt_cycle_h)?;

        for intent in &design.well_intents {
            let Some(assay) = &intent.assay else { continue };
            let Some(vessel_id) = &intent.vessel_id else { continue };

            let action_id = next_action_id;
            next_action_id += 1;
            let claimed_bits = 0.4;

            match world.authorize_measurement(10.0, claimed_bits) {
                Ok(_inflated_cost) => {}
                Err(refusal) => {
                    warn!(%refusal, "measurement request refused");
                    continue;
                }
            }

            world.claim_action(Claim {
                action_id,
                action_type: assay.kind().to_string(),
                expected_gain_bits: claimed_bits,
                prior_modalities: vec![],
                claimed_marginal_gain: claimed_bits,
                entropy_source: EntropySource::MeasurementNarrowing,
            })?;
            ledger_writer.append(&EpistemicLedgerEntry::Claimed {
                action_id,
                action_type: assay.kind().to_string(),
                expected_gain_bits: claimed_bits,
                claimed_marginal_gain: claimed_bits,
                entropy_source: EntropySource::MeasurementNarrowing,
                timestamp_h: world.now_h(),
            })?;

            let observation = world.measure(vessel_id, assay, world.now_h(), false)?;
            measurement_writer.append(&observation)?;

            let prior_entropy = world.compute_penalty().entropy_penalty.max(0.5) + 0.5;
            let posterior_entropy = (1.0 - observation.viability).max(0.01);
            let realized_bits =
                world.measure_information_gain(prior_entropy, posterior_entropy, EntropySource::MeasurementNarrowing)?;
            world.resolve_action(action_id, realized_bits)?;
            ledger_writer.append(&EpistemicLedgerEntry::Resolved {
                action_id,
                realized_bits,
                debt_bits_after: world.debt_bits(),
                timestamp_h: world.now_h(),
            })?;

            info!(
                root_seed,
                cycle,
                vessel_id,
                assay_kind = assay.kind(),
                viability = observation.viability,
                "measured"
            );
        }
    }

    write_event_log(out_dir.join("event_log.jsonl"), world.event_log())?;

    Ok(RunSummary {
        root_seed,
        cycles_run: engine_config.cycles,
        final_now_h: world.now_h(),
        final_debt_bits: world.debt_bits(),
        event_count: world.event_log().len(),
    })
}
