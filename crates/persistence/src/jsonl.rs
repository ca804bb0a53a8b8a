/**
 * Purpose: one generic append-only JSON-lines sink/source, shared by
 * every artifact writer in this crate (spec §6 "Layout is JSON-lines
 * per artifact type").
 *
 * Grounded on `bvm_events::EventLog::dump`/`load`'s own JSONL idiom,
 * generalized so the epistemic ledger and measurement records don't
 * each reinvent it.
 */
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, trace};

/// Failure modes writing or reading a JSON-lines artifact file.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("opening artifact file {path}: {source}")]
    Open { path: String, #[source] source: std::io::Error },
    #[error("writing artifact record: {0}")]
    Write(#[source] std::io::Error),
    #[error("reading artifact record: {0}")]
    Read(#[source] std::io::Error),
    #[error("decoding artifact record: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("encoding artifact record: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Append-only sink: one JSON object per line, flushed after every
/// record so a killed process loses at most the in-flight write, never
/// a previously-returned append.
pub struct JsonlWriter<T> {
    sink: BufWriter<File>,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Open `path` for append, creating it (and its record stream) if
    /// it does not yet exist.
    pub fn create_or_append(path: impl AsRef<Path>) -> Result<Self, PersistenceError> {
        let path_ref = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path_ref)
            .map_err(|source| PersistenceError::Open {
                path: path_ref.display().to_string(),
                source,
            })?;
        debug!(path = %path_ref.display(), "opened artifact file for append");
        Ok(Self {
            sink: BufWriter::new(file),
            _marker: PhantomData,
        })
    }

    /// Append one record as a single JSON line.
    pub fn append(&mut self, record: &T) -> Result<(), PersistenceError> {
        let line = serde_json::to_string(record).map_err(PersistenceError::Encode)?;
        writeln!(self.sink, "{line}").map_err(PersistenceError::Write)?;
        self.sink.flush().map_err(PersistenceError::Write)?;
        trace!(bytes = line.len(), "appended artifact record");
        Ok(())
    }
}

/// Ordered, restartable replay of a JSON-lines artifact file (spec §9
/// "Lazy, restartable sequences").
pub struct JsonlReader;

impl JsonlReader {
    /// Read every record from `path` in file order.
    pub fn read_all<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, PersistenceError> {
        let path_ref = path.as_ref();
        let file = File::open(path_ref).map_err(|source| PersistenceError::Open {
            path: path_ref.display().to_string(),
            source,
        })?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line.map_err(PersistenceError::Read)?;
            if line.trim().is_empty() {
                continue;
            }
            let record: T = serde_json::from_str(&line).map_err(PersistenceError::Decode)?;
            records.push(record);
        }
        Ok(records)
    }
}
