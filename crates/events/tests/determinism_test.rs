/**
 * Purpose: Integration tests for event-log determinism and replay.
 */
use std::collections::BTreeMap;

use bvm_events::{priority, Event, EventError, EventLog, EventPayload, PlateCoordinate};

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

fn seed(event_id: u64, prev_hash: [u8; 32]) -> Event {
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
fn event_hash_is_deterministic() {
    let event1 = treat(1, 10.0, [0u8; 32]);
    let event2 = treat(1, 10.0, [0u8; 32]);
    assert_eq!(event1.hash, event2.hash, "identical events must hash identically");
}

#[test]
fn hash_chain_linkage_is_verifiable() {
    let genesis = seed(0, [0u8; 32]);
    let next = treat(1, 10.0, genesis.hash);
    assert!(next.verify_hash_link(genesis.hash));
    assert!(!next.verify_hash_link([0xffu8; 32]));
}

#[test]
fn validation_rejects_negative_dose() {
    let invalid = treat(1, -5.0, [0u8; 32]);
    assert!(matches!(invalid.validate(), Err(EventError::NegativeDose { .. })));
}

#[test]
fn log_replay_reproduces_same_head_hash() {
    let mut log_a = EventLog::new();
    let genesis_a = seed(0, [0u8; 32]);
    let genesis_hash = genesis_a.hash;
    log_a.append(genesis_a).unwrap();
    log_a.append(treat(1, 10.0, genesis_hash)).unwrap();

    let mut log_b = EventLog::new();
    let genesis_b = seed(0, [0u8; 32]);
    log_b.append(genesis_b).unwrap();
    log_b.append(treat(1, 10.0, genesis_hash)).unwrap();

    assert_eq!(log_a.head_hash(), log_b.head_hash());
    assert_eq!(log_a.len(), log_b.len());
}

#[test]
fn log_append_assigns_increasing_commit_index() {
    let mut log = EventLog::new();
    let genesis = seed(0, [0u8; 32]);
    let genesis_hash = genesis.hash;
    let first_index = log.append(genesis).unwrap();
    let second_index = log.append(treat(1, 10.0, genesis_hash)).unwrap();

    assert_eq!(first_index, 0);
    assert_eq!(second_index, 1);
}
