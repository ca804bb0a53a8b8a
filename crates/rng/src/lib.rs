//! Deterministic random number generation for the biological virtual machine.
//!
//! This crate provides the RNG registry of spec §4.1: a single root seed
//! fans out into named, independently-seeded, splittable ChaCha20 streams
//! (`rng_batch`, `rng_operational_events`, `rng_biology`, `rng_assay`,
//! `rng_treatment`), each isolated so that disabling one role's consumers
//! cannot perturb any other role's output, and every draw is audit-logged
//! for replay verification.
//!
//! # Usage
//!
//! ```rust
//! use rng::{RngRegistry, RngSubsystem};
//!
//! let mut registry = RngRegistry::from_root_seed(1337);
//! let value = registry.stream(RngSubsystem::Biology).next_u64();
//! ```

/// RFC 7539 ChaCha20 implementation.
pub mod chacha20;

/// RNG stream management and subsystem isolation.
pub mod rng_stream;

/// Root-seed-derived registry of named streams, with audit logging.
pub mod registry;

/// Audit log for all RNG draws.
pub mod audit_log;

/// Call-site restrictions enforcing subsystem isolation (spec §4.1).
pub mod guard;

pub use audit_log::{RngAuditLog, RngDrawRecord};
pub use chacha20::ChaCha20Rng;
pub use guard::{RngGuard, RngGuardViolation, BIOLOGY_GUARD, MEASUREMENT_GUARD};
pub use registry::RngRegistry;
pub use rng_stream::{RngStream, RngSubsystem};
