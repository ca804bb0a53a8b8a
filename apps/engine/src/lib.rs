//! `bvm-engine` - reference binary driving a `bvm_world::World` run end
//! to end and persisting its artifacts.
//!
//! This crate is deliberately thin: every invariant the spec cares about
//! lives in `bvm-world` and the crates it binds. This binary supplies
//! the one thing the core does not own - a concrete per-cycle schedule
//! and the bootstrap configuration to run it under - and writes the
//! resulting event log, epistemic ledger, and measurement records to
//! disk.

/// Bootstrap configuration, read from the environment.
pub mod config;

/// The fixed reference schedule this binary drives `World` with.
pub mod demo;

/// The per-cycle run loop and artifact persistence.
pub mod run;

/// Multi-seed parallel execution.
pub mod parallel;

pub use config::EngineConfig;
pub use run::{run_once, run_with_seed, RunSummary};
