//! The Operation Scheduler: a pure envelope queue that owns *when* and
//! *in what order* operations take effect (spec §4.4).
//!
//! The scheduler never reads biology and never mutates the Concentration
//! Spine itself; it queues [`Intent`]s and, at a boundary, hands back
//! the due ones in the fixed deterministic order the spec mandates.
//! Submitting an intent has no effect until a boundary (`flush_due`)
//! crosses it.

/// Queued intents and the boundary-delivery algorithm.
pub mod queue;

/// Guardrail against direct-state mutation while a biology step is open.
pub mod step_guard;

pub use bvm_events::priority;
pub use queue::{Intent, OperationScheduler, ScheduledId};
pub use step_guard::{StepGuard, StepGuardError};
