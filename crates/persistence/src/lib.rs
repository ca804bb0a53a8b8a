//! Per-run artifact persistence (spec §6 "Persisted artifacts").
//!
//! The core is explicitly not a database client (spec §1 places
//! "persistent databases" out of scope); this crate is a set of
//! newline-delimited-JSON file sinks, one writer per artifact kind,
//! matching spec §6's "Layout is JSON-lines per artifact type":
//!
//! - the event log itself, via [`event_log`] (a thin file wrapper
//!   around [`bvm_events::EventLog::dump`]/[`bvm_events::EventLog::load`],
//!   which already owns the JSONL shape and hash-chain re-validation);
//! - the epistemic ledger (claims and resolutions), via [`ledger`];
//! - measurement records, via [`measurement`].
//!
//! None of these writers interpret what they are shown; they are
//! restartable, append-only sequences (spec §9 "Lazy, restartable
//! sequences"), grounded on the teacher's own dump/load idiom.

/// Generic append-only JSON-lines sink and source, shared by every
/// artifact writer in this crate.
pub mod jsonl;

/// File-backed event log persistence.
pub mod event_log;

/// Epistemic ledger (claims and resolutions) persistence.
pub mod ledger;

/// Measurement record persistence.
pub mod measurement;

pub use event_log::{load_event_log, write_event_log, EventLogLoadError};
pub use jsonl::{JsonlReader, JsonlWriter, PersistenceError};
pub use ledger::{open_ledger, EpistemicLedgerEntry, EpistemicLedgerWriter};
pub use measurement::{open_measurements, MeasurementWriter};
