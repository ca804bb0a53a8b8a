/**
 * Purpose: Canonical Event schema for the Concentration Spine's event log.
 *
 * Why this file exists:
 * - Event is the sole mechanism for state mutations against the spine.
 * - Provides immutable hash-chain linkage for replay verification.
 * - Enforces deterministic ordering (scheduled_time_h, priority, event_id)
 *   and schema validation ahead of the spine ever seeing the payload.
 *
 * Invariants enforced:
 * - Every Event's hash links to the previous event's hash (hash-chain).
 * - An Event cannot be mutated after construction.
 * - validate() rejects malformed payloads before they reach the spine.
 *
 * What breaks if removed:
 * - No deterministic ordering -> replay cannot reproduce a run.
 * - No hash-chain -> no tamper-evidence over the persisted log.
 *
 * What this file does NOT do:
 * - Does not apply events to the spine (that's `physics::InjectionManager`).
 * - Does not decide delivery order (that's `bvm-scheduler`).
 */
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::payload::EventPayload;

/// Fixed priority policy used by the scheduler's tie-break, spec §4.4.
/// Reproduced here (not just in the scheduler) because `Event::priority`
/// is usually constructed from this table rather than an arbitrary int.
pub mod priority {
    pub const SEED: i32 = 0;
    pub const WASHOUT: i32 = 10;
    pub const FEED: i32 = 20;
    pub const TREAT: i32 = 30;
}

/// Error raised validating a malformed event. Fatal for the offending
/// operation only; the run continues (spec §4.2, §7 "Schema violation").
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EventError {
    #[error("event {event_id}: dose_um must be non-negative, got {value}")]
    NegativeDose { event_id: u64, value: f64 },
    #[error("event {event_id}: initial_volume_ul must be positive, got {value}")]
    NonPositiveVolume { event_id: u64, value: f64 },
    #[error("event {event_id}: initial_cells must be non-negative, got {value}")]
    NegativeCellCount { event_id: u64, value: f64 },
    #[error("event {event_id}: nutrient concentration for {nutrient_id} must be non-negative, got {value}")]
    NegativeNutrient {
        event_id: u64,
        nutrient_id: String,
        value: f64,
    },
    #[error("event {event_id}: vessel_id must not be empty")]
    EmptyVesselId { event_id: u64 },
    #[error("event {event_id}: hash-chain link does not match expected predecessor")]
    BrokenHashLink { event_id: u64 },
}

/// A single immutable, totally-ordered operation against the spine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Monotonically assigned, assigned once and never reused.
    pub event_id: u64,
    pub scheduled_time_h: f64,
    pub priority: i32,
    pub payload: EventPayload,
    pub metadata: BTreeMap<String, String>,
    /// This event's own content hash.
    pub hash: [u8; 32],
    /// Hash of the event immediately preceding it in commit order.
    pub prev_hash: [u8; 32],
    /// Position in the committed log; assigned at `EventLog::append`.
    pub commit_index: u64,
}

impl Event {
    /// Construct a new event and compute its hash. `commit_index` is a
    /// placeholder until the event is actually appended to a log.
    pub fn new(
        event_id: u64,
        scheduled_time_h: f64,
        priority: i32,
        payload: EventPayload,
        metadata: BTreeMap<String, String>,
        prev_hash: [u8; 32],
    ) -> Self {
        let mut event = Self {
            event_id,
            scheduled_time_h,
            priority,
            payload,
            metadata,
            hash: [0u8; 32],
            prev_hash,
            commit_index: 0,
        };
        event.hash = event.compute_hash();
        event
    }

    /// Deterministic content hash over every field except `hash` itself
    /// and `commit_index` (which is a property of the log, not the
    /// event's identity).
    pub fn compute_hash(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        let _ = hasher.update(&self.event_id.to_le_bytes());
        let _ = hasher.update(&self.scheduled_time_h.to_le_bytes());
        let _ = hasher.update(&self.priority.to_le_bytes());

        let payload_bytes = serde_json::to_vec(&self.payload).unwrap_or_default();
        let _ = hasher.update(&payload_bytes);

        let metadata_bytes = serde_json::to_vec(&self.metadata).unwrap_or_default();
        let _ = hasher.update(&metadata_bytes);

        let _ = hasher.update(&self.prev_hash);
        *hasher.finalize().as_bytes()
    }

    /// Verifies this event's declared predecessor matches the hash the
    /// caller expects (i.e. the previous event actually committed).
    pub fn verify_hash_link(&self, expected_prev_hash: [u8; 32]) -> bool {
        self.prev_hash == expected_prev_hash
    }

    /// Structural schema validation, ahead of the spine seeing the
    /// payload. Does not check compound/nutrient ids against a run's
    /// chemistry registry; that check happens in the spine, which owns
    /// the registry.
    pub fn validate(&self) -> Result<(), EventError> {
        if self.payload.vessel_id().is_empty() {
            return Err(EventError::EmptyVesselId {
                event_id: self.event_id,
            });
        }

        match &self.payload {
            EventPayload::SeedVessel {
                initial_cells,
                initial_volume_ul,
                initial_nutrients_mm,
                ..
            } => {
                if *initial_cells < 0.0 {
                    return Err(EventError::NegativeCellCount {
                        event_id: self.event_id,
                        value: *initial_cells,
                    });
                }
                if *initial_volume_ul <= 0.0 {
                    return Err(EventError::NonPositiveVolume {
                        event_id: self.event_id,
                        value: *initial_volume_ul,
                    });
                }
                for (nutrient_id, value) in initial_nutrients_mm {
                    if *value < 0.0 {
                        return Err(EventError::NegativeNutrient {
                            event_id: self.event_id,
                            nutrient_id: nutrient_id.clone(),
                            value: *value,
                        });
                    }
                }
            }
            EventPayload::TreatCompound { dose_um, .. } => {
                if *dose_um < 0.0 {
                    return Err(EventError::NegativeDose {
                        event_id: self.event_id,
                        value: *dose_um,
                    });
                }
            }
            EventPayload::FeedVessel { nutrients_mm, .. } => {
                for (nutrient_id, value) in nutrients_mm {
                    if *value < 0.0 {
                        return Err(EventError::NegativeNutrient {
                            event_id: self.event_id,
                            nutrient_id: nutrient_id.clone(),
                            value: *value,
                        });
                    }
                }
            }
            EventPayload::WashoutCompound { .. } => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::PlateCoordinate;

    fn treat(event_id: u64, dose_um: f64, prev_hash: [u8; 32]) -> Event {
        Event::new(
            event_id,
            24.0,
            priority::TREAT,
            EventPayload::TreatCompound {
                vessel_id: "A1".to_string(),
                compound_id: "compound-x".to_string(),
                dose_um,
            },
            BTreeMap::new(),
            prev_hash,
        )
    }

    #[test]
    fn identical_events_hash_identically() {
        let a = treat(1, 10.0, [0u8; 32]);
        let b = treat(1, 10.0, [0u8; 32]);
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn differing_payload_changes_hash() {
        let a = treat(1, 10.0, [0u8; 32]);
        let b = treat(1, 20.0, [0u8; 32]);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn negative_dose_is_rejected() {
        let event = treat(1, -1.0, [0u8; 32]);
        assert!(matches!(
            event.validate(),
            Err(EventError::NegativeDose { .. })
        ));
    }

    #[test]
    fn seed_vessel_requires_positive_volume() {
        let event = Event::new(
            1,
            0.0,
            priority::SEED,
            EventPayload::SeedVessel {
                vessel_id: "A1".to_string(),
                position: PlateCoordinate::new(0, 0),
                cell_line: "line-a".to_string(),
                initial_cells: 3000.0,
                initial_volume_ul: 0.0,
                initial_nutrients_mm: BTreeMap::new(),
            },
            BTreeMap::new(),
            [0u8; 32],
        );
        assert!(matches!(
            event.validate(),
            Err(EventError::NonPositiveVolume { .. })
        ));
    }

    #[test]
    fn hash_link_verification() {
        let first = treat(1, 10.0, [0u8; 32]);
        let second = treat(2, 10.0, first.hash);
        assert!(second.verify_hash_link(first.hash));
        assert!(!second.verify_hash_link([1u8; 32]));
    }
}
