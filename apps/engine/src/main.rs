//! Reference runner for the biological virtual machine core.
//!
//! Boots an `EngineConfig` from the environment, drives the fixed
//! reference schedule in `demo` against a fresh `bvm_world::World` for
//! every configured root seed, and writes each run's event log,
//! epistemic ledger, and measurement records under `out_dir`.
//!
//! # Usage
//!
//! ```no_run
//! // BVM_ROOT_SEED=42 BVM_CYCLES=8 BVM_OUT_DIR=./run-artifacts bvm-engine
//! ```

use tracing::{error, info};

use bvm_engine::config::EngineConfig;
use bvm_engine::parallel::run_all_seeds;

fn main() {
    tracing_subscriber::fmt::init();

    info!("bvm-engine starting");

    let config = EngineConfig::from_env();
    info!(
        root_seed = config.root_seed,
        cycles = config.cycles,
        dt_cycle_h = config.dt_cycle_h,
        out_dir = %config.out_dir,
        parallel_seeds = config.parallel_seeds.len(),
        "engine configuration loaded"
    );

    let summaries = run_all_seeds(&config);
    if summaries.is_empty() {
        error!("no runs completed successfully");
        std::process::exit(1);
    }

    for summary in &summaries {
        info!(
            root_seed = summary.root_seed,
            cycles_run = summary.cycles_run,
            final_now_h = summary.final_now_h,
            final_debt_bits = summary.final_debt_bits,
            event_count = summary.event_count,
            "run complete"
        );
    }

    info!(completed = summaries.len(), "bvm-engine finished");
}
