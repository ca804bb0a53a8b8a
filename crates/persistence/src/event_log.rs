/**
 * Purpose: file-backed persistence for the event log proper (spec §6
 * "Persisted artifacts: Per-run: event log").
 *
 * `bvm_events::EventLog` already owns the JSONL shape and hash-chain
 * re-validation on load (spec §4.2 `dump(sink)`/`load(source)`); this
 * module is just the file plumbing around it.
 */
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bvm_events::{EventLog, LoadError};

use crate::jsonl::PersistenceError;

/// Write the full event log to `path`, overwriting any prior contents.
/// The log is always dumped whole (not appended incrementally) because
/// `EventLog::dump` re-serializes every committed event, and a run's
/// log is immutable once appended (spec §3 "Ownership rules").
pub fn write_event_log(path: impl AsRef<Path>, log: &EventLog) -> Result<(), PersistenceError> {
    let path_ref = path.as_ref();
    let file = File::create(path_ref).map_err(|source| PersistenceError::Open {
        path: path_ref.display().to_string(),
        source,
    })?;
    log.dump(file).map_err(PersistenceError::Write)
}

/// Reconstruct an event log from `path`, re-validating the hash chain
/// as it loads (spec §4.2 "replaying the log... yields a byte-identical
/// spine trace").
pub fn load_event_log(path: impl AsRef<Path>) -> Result<EventLog, EventLogLoadError> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).map_err(|source| PersistenceError::Open {
        path: path_ref.display().to_string(),
        source,
    })?;
    EventLog::load(BufReader::new(file)).map_err(EventLogLoadError::Chain)
}

/// Failure modes reconstructing an event log artifact.
#[derive(Debug, thiserror::Error)]
pub enum EventLogLoadError {
    #[error(transparent)]
    File(#[from] PersistenceError),
    #[error("event log chain failed to re-validate: {0}")]
    Chain(#[source] LoadError),
}
