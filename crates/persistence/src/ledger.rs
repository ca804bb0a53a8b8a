/**
 * Purpose: persisted epistemic ledger (spec §6 "Persisted artifacts:
 * epistemic ledger (claims and resolutions)").
 *
 * `bvm_epistemic::EpistemicController` deliberately does not retain a
 * history of resolved claims; it only keeps outstanding ones and the
 * running `debt_bits` total (spec §4.7 "per-action ledger" is about
 * pending claims, not a forensic log). The caller driving a run is the
 * one place that sees both a claim and its later resolution, so this
 * module gives it a record shape and a writer to append one line per
 * claim/resolution/provisional-outcome event as it happens.
 */
use serde::{Deserialize, Serialize};

use bvm_epistemic::{EntropySource, ProvisionalOutcome};

use crate::jsonl::{JsonlWriter, PersistenceError};

/// One line of the epistemic ledger artifact: either a claim being
/// registered, a claim being resolved, or a provisional penalty
/// settling (spec §4.7 `claim_action`/`resolve_action`/
/// `step_provisional`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind")]
pub enum EpistemicLedgerEntry {
    Claimed {
        action_id: u64,
        action_type: String,
        expected_gain_bits: f64,
        claimed_marginal_gain: f64,
        entropy_source: EntropySource,
        timestamp_h: f64,
    },
    Resolved {
        action_id: u64,
        realized_bits: f64,
        debt_bits_after: f64,
        timestamp_h: f64,
    },
    Provisional {
        outcome: ProvisionalOutcome,
        timestamp_h: f64,
    },
}

/// Append-only writer for the epistemic ledger artifact.
pub type EpistemicLedgerWriter = JsonlWriter<EpistemicLedgerEntry>;

/// Open `path` for append, creating it if it does not yet exist.
pub fn open_ledger(path: impl AsRef<std::path::Path>) -> Result<EpistemicLedgerWriter, PersistenceError> {
    JsonlWriter::create_or_append(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonl::JsonlReader;
    use std::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_path() -> std::path::PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!("bvm-persistence-test-ledger-{n}.jsonl"))
    }

    #[test]
    fn claim_and_resolution_round_trip() {
        let path = temp_path();
        let mut writer = open_ledger(&path).unwrap();
        writer
            .append(&EpistemicLedgerEntry::Claimed {
                action_id: 0,
                action_type: "cell_painting".to_string(),
                expected_gain_bits: 0.5,
                claimed_marginal_gain: 0.5,
                entropy_source: EntropySource::MeasurementNarrowing,
                timestamp_h: 0.0,
            })
            .unwrap();
        writer
            .append(&EpistemicLedgerEntry::Resolved {
                action_id: 0,
                realized_bits: 0.3,
                debt_bits_after: 0.2,
                timestamp_h: 24.0,
            })
            .unwrap();
        drop(writer);

        let entries: Vec<EpistemicLedgerEntry> = JsonlReader::read_all(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(matches!(entries[0], EpistemicLedgerEntry::Claimed { action_id: 0, .. }));
        assert!(matches!(entries[1], EpistemicLedgerEntry::Resolved { action_id: 0, .. }));
        let _ = std::fs::remove_file(&path);
    }
}
