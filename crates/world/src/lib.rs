//! The World Orchestrator: binds the RNG registry, event log, scheduler,
//! spine, biology step, measurement, and epistemic controller into one
//! run (spec §4.8).
//!
//! `World` exclusively owns vessel states, the scheduler, the spine, and
//! the epistemic controller for the duration of a run (spec §3
//! "Ownership rules"). Agent policy and belief update are out of scope
//! (spec §1); `World` exposes the mechanical half of the per-cycle
//! contract (`submit_design`, `advance_time`, `measure`,
//! `resolve_action`) and leaves `propose(beliefs)` / `update(beliefs,
//! obs)` to the caller.

/// World-level configuration: the union of every subsystem's config.
pub mod config;

/// `WorldError`, aggregating every subsystem's error type.
pub mod error;

/// The `DesignBridge` seam: translates a `Design` into scheduler
/// intents and epistemic claims without the core depending on agent
/// internals.
pub mod bridge;

/// Structured measurement refusal (spec §7 "Quota/justification
/// failure").
pub mod refusal;

/// `World`, the orchestrator itself.
pub mod world;

pub use bridge::{BridgeError, Claim, DefaultDesignBridge, DesignBridge, ScheduledEvent};
pub use config::WorldConfig;
pub use error::WorldError;
pub use refusal::MeasurementRefusal;
pub use world::World;
