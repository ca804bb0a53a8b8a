/**
 * Purpose: persisted measurement records (spec §6 "Persisted artifacts:
 * measurement records").
 *
 * `bvm_measurement::Observation` is already the canonical, flat,
 * serializable record (spec §6); this module is the append-only JSONL
 * writer around it, one line per observation as it is produced.
 */
use bvm_measurement::Observation;

use crate::jsonl::{JsonlWriter, PersistenceError};

/// Append-only writer for the measurement-record artifact.
pub type MeasurementWriter = JsonlWriter<Observation>;

/// Open `path` for append, creating it if it does not yet exist.
pub fn open_measurements(path: impl AsRef<std::path::Path>) -> Result<MeasurementWriter, PersistenceError> {
    JsonlWriter::create_or_append(path)
}
