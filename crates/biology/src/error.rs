use thiserror::Error;

/// Biology step failure modes (spec §4.5, §7).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BiologyError {
    #[error("unknown cell line {cell_line} referenced by vessel {vessel_id}")]
    UnknownCellLine { vessel_id: String, cell_line: String },

    #[error("dt_h must be non-negative, got {dt_h}")]
    NegativeDt { dt_h: f64 },

    #[error(
        "invariant violation in vessel {vessel_id}: {detail} (fatal: cell_count={cell_count}, \
         viability={viability}, death_ledger_sum={death_ledger_sum})"
    )]
    InvariantViolation {
        vessel_id: String,
        detail: String,
        cell_count: f64,
        viability: f64,
        death_ledger_sum: f64,
    },

    #[error(transparent)]
    Spine(#[from] bvm_physics::SpineError),
}
