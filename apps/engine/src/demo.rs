/**
 * Purpose: a runnable reference scenario exercising every subsystem the
 * world orchestrator binds (spec §4.8), standing in for the agent
 * policy and design-validation layer the core deliberately does not own
 * (spec §1 "Deliberately out of scope"). This is plumbing to give the
 * binary something concrete to run, not a policy implementation.
 *
 * What this file does NOT do:
 * - Does not decide what a real agent should propose; the fixed
 *   schedule below exists only to drive `World` end-to-end.
 */
use std::collections::BTreeMap;

use bvm_biology::CellLineParams;
use bvm_events::PlateCoordinate;
use bvm_measurement::{Assay, ChannelConfig, MeasurementConfig};
use bvm_protocol::{Design, Treatment, WellIntent};
use bvm_world::WorldConfig;

/// Cell line id used throughout the reference scenario.
pub const CELL_LINE: &str = "line-a";
/// Compound id used throughout the reference scenario.
pub const COMPOUND: &str = "compound-x";
/// Morphology channels the demo Cell-Painting assay reports.
pub const CHANNELS: &[&str] = &["actin", "dna"];

/// Build a `WorldConfig` with one cell line and measurement channels
/// populated, matching spec §8 scenario 1's literal values (cell line
/// A, 3000 initial cells, 25 mM glucose, 10 µM compound dose).
pub fn demo_world_config(root_seed: u64) -> WorldConfig {
    let mut config = WorldConfig::default();
    config.root_seed = root_seed;

    let mut ic50_um = BTreeMap::new();
    let _ = ic50_um.insert(COMPOUND.to_string(), 10.0);
    let mut hill_coefficient = BTreeMap::new();
    let _ = hill_coefficient.insert(COMPOUND.to_string(), 1.5);
    let mut baseline_channel_means = BTreeMap::new();
    let _ = baseline_channel_means.insert("actin".to_string(), 1.0);
    let _ = baseline_channel_means.insert("dna".to_string(), 1.0);

    let _ = config.biology.cell_lines.insert(
        CELL_LINE.to_string(),
        CellLineParams {
            baseline_growth_rate_per_h: 0.03,
            carrying_capacity_scalar: 1.0,
            ic50_um,
            hill_coefficient,
            max_attrition_hazard_per_h: 0.2,
            baseline_channel_means,
        },
    );

    let mut channels = BTreeMap::new();
    for channel in CHANNELS {
        let _ = channels.insert(channel.to_string(), ChannelConfig::default());
    }
    config.measurement = MeasurementConfig {
        channels,
        ..MeasurementConfig::default()
    };
    config.measurement_channels = CHANNELS.iter().map(|c| c.to_string()).collect();

    config
}

/// One cycle's fixed design: seed on cycle 0, treat on cycle 1, measure
/// every cycle from cycle 2 onward (spec §8 scenario 1's treatment
/// schedule, generalized to N cycles instead of the literal 8).
pub fn design_for_cycle(cycle: u32, vessel_id: &str) -> Design {
    match cycle {
        0 => Design::new(vec![WellIntent {
            vessel_id: Some(vessel_id.to_string()),
            cell_line: CELL_LINE.to_string(),
            treatment: Some(Treatment::Seed {
                position: PlateCoordinate::new(5, 5),
                initial_cells: 3000.0,
                initial_volume_ul: 200.0,
                initial_nutrients_mm: {
                    let mut m = BTreeMap::new();
                    let _ = m.insert("glucose".to_string(), 25.0);
                    m
                },
            }),
            observation_time_h: 0.0,
            assay: None,
        }]),
        1 => Design::new(vec![WellIntent {
            vessel_id: Some(vessel_id.to_string()),
            cell_line: CELL_LINE.to_string(),
            treatment: Some(Treatment::TreatCompound {
                compound_id: COMPOUND.to_string(),
                dose_um: 10.0,
            }),
            observation_time_h: 0.0,
            assay: None,
        }]),
        _ => Design::new(vec![WellIntent {
            vessel_id: Some(vessel_id.to_string()),
            cell_line: CELL_LINE.to_string(),
            treatment: None,
            observation_time_h: 0.0,
            assay: Some(Assay::Cytotoxicity),
        }]),
    }
}
