/**
 * Purpose: engine-binary configuration, read from the environment
 * (informational/bootstrap configuration only, per the teacher's own
 * `parse_config` idiom; determinism of a run is governed entirely by
 * `bvm_world::WorldConfig::root_seed` and the event log, never by
 * anything read here).
 */
use std::env;

/// Bootstrap configuration for the `bvm-engine` binary.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root seed handed to `bvm_world::WorldConfig`.
    pub root_seed: u64,
    /// Number of cycles to run (spec §4.8 "for cycle in 0..N").
    pub cycles: u32,
    /// Hours advanced per cycle (spec §4.5 recommends 6-12h).
    pub dt_cycle_h: f64,
    /// Directory artifacts are written to (spec §6 "Persisted
    /// artifacts"). Created if it does not exist.
    pub out_dir: String,
    /// Additional seeds to run in parallel, one `World` per seed (spec
    /// §5 "embarrassingly parallel" across independent root seeds).
    /// Empty by default: only `root_seed` runs.
    pub parallel_seeds: Vec<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_seed: 42,
            cycles: 8,
            dt_cycle_h: 6.0,
            out_dir: "./run-artifacts".to_string(),
            parallel_seeds: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Read overrides from the environment; anything unset keeps its
    /// default. Malformed values are ignored rather than rejected (this
    /// is bootstrap plumbing, not the schema the core enforces).
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = env::var("BVM_ROOT_SEED") {
            if let Ok(parsed) = v.parse() {
                config.root_seed = parsed;
            }
        }
        if let Ok(v) = env::var("BVM_CYCLES") {
            if let Ok(parsed) = v.parse() {
                config.cycles = parsed;
            }
        }
        if let Ok(v) = env::var("BVM_DT_CYCLE_H") {
            if let Ok(parsed) = v.parse() {
                config.dt_cycle_h = parsed;
            }
        }
        if let Ok(v) = env::var("BVM_OUT_DIR") {
            config.out_dir = v;
        }
        if let Ok(v) = env::var("BVM_PARALLEL_SEEDS") {
            config.parallel_seeds = v
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
        }

        config
    }
}
