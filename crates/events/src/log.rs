/**
 * Purpose: Append-only, hash-chained log of events as they are applied to
 * the spine, in commit order (spec §4.2, §6 "Event log format").
 *
 * Invariants enforced:
 * - Events are only ever appended, never edited or removed.
 * - Each appended event's prev_hash matches the previous event's hash.
 * - commit_index is assigned by the log, strictly increasing from 0.
 *
 * What breaks if removed:
 * - No replayable record of what happened to the spine -> `(root_seed,
 *   event_log) -> observations` is no longer a reproducible function.
 */
use std::io::{self, BufRead, Write};

use crate::event::{Event, EventError};

/// Append-only sequence of events, in the order they were actually
/// applied to the spine.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
    head_hash: [u8; 32],
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            head_hash: [0u8; 32],
        }
    }

    /// Validate and append `event`, assigning its `commit_index`.
    ///
    /// Fails if the event's own schema is malformed or if its
    /// `prev_hash` does not match the current chain head.
    pub fn append(&mut self, mut event: Event) -> Result<u64, EventError> {
        event.validate()?;
        if !event.verify_hash_link(self.head_hash) {
            return Err(EventError::BrokenHashLink {
                event_id: event.event_id,
            });
        }
        event.commit_index = self.events.len() as u64;
        self.head_hash = event.hash;
        let commit_index = event.commit_index;
        self.events.push(event);
        Ok(commit_index)
    }

    /// Ordered replay iterator, in commit order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Number of committed events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Current chain head hash (all-zero for an empty log).
    pub fn head_hash(&self) -> [u8; 32] {
        self.head_hash
    }

    /// Hex-encoded prefix of the first `k` characters of the chain head
    /// hash, for provenance checks (spec §4.2 `hash_prefix(k)`).
    pub fn hash_prefix(&self, k: usize) -> String {
        let full = hex::encode(self.head_hash);
        full.chars().take(k).collect()
    }

    /// Serialize the full log as newline-delimited JSON.
    pub fn dump<W: Write>(&self, mut sink: W) -> io::Result<()> {
        for event in &self.events {
            let line = serde_json::to_string(event)?;
            writeln!(sink, "{line}")?;
        }
        Ok(())
    }

    /// Reconstruct a log from newline-delimited JSON, re-validating the
    /// hash chain as it loads.
    pub fn load<R: BufRead>(source: R) -> Result<Self, LoadError> {
        let mut log = EventLog::new();
        for line in source.lines() {
            let line = line.map_err(LoadError::Io)?;
            if line.trim().is_empty() {
                continue;
            }
            let event: Event = serde_json::from_str(&line).map_err(LoadError::Decode)?;
            log.append(event).map_err(LoadError::Chain)?;
        }
        Ok(log)
    }
}

/// Errors reconstructing an [`EventLog`] from a persisted artifact.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("reading event log: {0}")]
    Io(#[source] io::Error),
    #[error("decoding event: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("event log hash chain broken: {0}")]
    Chain(#[source] EventError),
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::io::Cursor;

    use super::*;
    use crate::event::priority;
    use crate::payload::{EventPayload, PlateCoordinate};

    fn seed_event(event_id: u64, prev_hash: [u8; 32]) -> Event {
        Event::new(
            event_id,
            0.0,
            priority::SEED,
            EventPayload::SeedVessel {
                vessel_id: "A1".to_string(),
                position: PlateCoordinate::new(0, 0),
                cell_line: "line-a".to_string(),
                initial_cells: 3000.0,
                initial_volume_ul: 200.0,
                initial_nutrients_mm: BTreeMap::new(),
            },
            BTreeMap::new(),
            prev_hash,
        )
    }

    #[test]
    fn append_chains_hashes_in_order() {
        let mut log = EventLog::new();
        let first = seed_event(0, [0u8; 32]);
        let first_hash = first.hash;
        log.append(first).unwrap();

        let second = seed_event(1, first_hash);
        log.append(second).unwrap();

        assert_eq!(log.len(), 2);
        assert_eq!(log.head_hash(), log.iter().last().unwrap().hash);
    }

    #[test]
    fn append_rejects_broken_chain_link() {
        let mut log = EventLog::new();
        log.append(seed_event(0, [0u8; 32])).unwrap();

        let disconnected = seed_event(1, [0xffu8; 32]);
        assert!(matches!(
            log.append(disconnected),
            Err(EventError::BrokenHashLink { .. })
        ));
    }

    #[test]
    fn dump_and_load_round_trips() {
        let mut log = EventLog::new();
        let first = seed_event(0, [0u8; 32]);
        let first_hash = first.hash;
        log.append(first).unwrap();
        log.append(seed_event(1, first_hash)).unwrap();

        let mut buf = Vec::new();
        log.dump(&mut buf).unwrap();

        let reloaded = EventLog::load(Cursor::new(buf)).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.head_hash(), log.head_hash());
    }
}
