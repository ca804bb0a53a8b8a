use serde::{Deserialize, Serialize};
use super::rng_stream::RngSubsystem;

/// Record of a single RNG draw for audit and replay-verification purposes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RngDrawRecord {
    /// Simulation time (hours) at which the draw occurred.
    pub time_h: f64,
    /// Role that made this draw.
    pub subsystem: RngSubsystem,
    /// Stream id within the role (primary stream, or a per-vessel split).
    pub stream_id: u64,
    /// Source call site, `"file:line"`, for debugging divergent replays.
    pub callsite: String,
    /// The raw value drawn.
    pub value: u64,
}

/// Complete audit log of every random draw made during a run.
///
/// Kept append-only; used to verify the RNG-guard contract in spec §4.1
/// (no subsystem consumes a stream outside its declared role) and to
/// support forensic inspection of a divergent replay.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RngAuditLog {
    records: Vec<RngDrawRecord>,
}

impl RngAuditLog {
    /// Create an empty audit log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a draw record.
    pub fn record_draw(
        &mut self,
        time_h: f64,
        subsystem: RngSubsystem,
        stream_id: u64,
        callsite: &str,
        value: u64,
    ) {
        self.records.push(RngDrawRecord {
            time_h,
            subsystem,
            stream_id,
            callsite: callsite.to_string(),
            value,
        });
    }

    /// All records, in draw order.
    pub fn records(&self) -> &[RngDrawRecord] {
        &self.records
    }

    /// Records for a single role.
    pub fn records_by_subsystem(&self, subsystem: RngSubsystem) -> Vec<&RngDrawRecord> {
        self.records
            .iter()
            .filter(|r| r.subsystem == subsystem)
            .collect()
    }

    /// Records for a single role+stream.
    pub fn records_by_stream(&self, subsystem: RngSubsystem, stream_id: u64) -> Vec<&RngDrawRecord> {
        self.records
            .iter()
            .filter(|r| r.subsystem == subsystem && r.stream_id == stream_id)
            .collect()
    }

    /// Number of recorded draws.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the log has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_filter_by_subsystem_and_stream() {
        let mut audit = RngAuditLog::new();
        audit.record_draw(0.0, RngSubsystem::Biology, 0, "biology.rs:10", 100);
        audit.record_draw(0.0, RngSubsystem::Biology, 1, "biology.rs:20", 200);
        audit.record_draw(6.0, RngSubsystem::Assay, 0, "assay.rs:5", 300);

        assert_eq!(audit.len(), 3);
        assert_eq!(audit.records_by_subsystem(RngSubsystem::Biology).len(), 2);
        assert_eq!(audit.records_by_stream(RngSubsystem::Biology, 1).len(), 1);
    }
}
