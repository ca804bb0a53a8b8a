use serde::{Deserialize, Serialize};

/// Tag distinguishing where a change in entropy came from (spec §4.7,
/// §9 "sum types, not inheritance", a closed tagged union, not a
/// subclass hierarchy).
///
/// `Prior` marks exploration that narrows an already-acknowledged
/// unknown and is never penalized (source-selectivity invariant, spec
/// §8). `MeasurementContradictory` marks a measurement that disagreed
/// with the prior belief rather than merely narrowing or leaving it
/// ambiguous, and is penalized at 1.5x on overclaim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntropySource {
    Prior,
    MeasurementNarrowing,
    MeasurementAmbiguous,
    MeasurementContradictory,
}

impl EntropySource {
    /// Multiplier applied to an overclaim charged against `debt_bits`
    /// when this source underlies the resolved claim (spec §4.7: "1.5x"
    /// for `CONTRADICTORY`; 1.0 for the other measurement sources).
    /// `Prior` never reaches this multiplier (see
    /// [`EntropySource::contributes_to_debt`]).
    pub fn overclaim_multiplier(&self) -> f64 {
        match self {
            EntropySource::Prior => 0.0,
            EntropySource::MeasurementNarrowing => 1.0,
            EntropySource::MeasurementAmbiguous => 1.0,
            EntropySource::MeasurementContradictory => 1.5,
        }
    }

    /// Whether a claim resolved under this source can ever add to
    /// `debt_bits` or the entropy penalty (spec §4.7 source-selectivity
    /// invariant: exploration labeled `PRIOR` never contributes to
    /// either).
    pub fn contributes_to_debt(&self) -> bool {
        !matches!(self, EntropySource::Prior)
    }
}

/// A recorded claim of expected information gain for one action,
/// pending resolution (spec §4.7 per-action ledger).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaimRecord {
    pub action_id: u64,
    pub action_type: String,
    /// The agent's a-priori estimate of the gain it expects, in bits.
    /// Informational; `resolve_action` checks `claimed_marginal_gain`,
    /// not this field, against the realized bits.
    pub expected_gain_bits: f64,
    /// Modalities (assay kinds, prior observations) the agent declares
    /// it is conditioning on, for forensic inspection of overclaims.
    pub prior_modalities: Vec<String>,
    /// The bits actually being claimed, checked against realized gain
    /// at resolution.
    pub claimed_marginal_gain: f64,
    /// Simulation time (hours) the claim was recorded.
    pub timestamp_h: f64,
}

/// A provisional penalty held in escrow pending its settlement horizon
/// (spec §4.7 "Provisional-penalty escrow").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProvisionalPenalty {
    pub action_id: u64,
    pub amount: f64,
    /// Cycles remaining before this penalty settles.
    pub remaining_horizon_steps: u32,
    /// Baseline entropy in effect when this penalty was escrowed, used
    /// to detect "entropy collapse" (spec §9 open question, resolved in
    /// DESIGN.md: refund if posterior entropy returns to at or below
    /// baseline at any point within the horizon).
    pub baseline_entropy_at_escrow: f64,
    /// Whether a collapse has been observed since escrow. Sticky: once
    /// true, it stays true even if entropy widens again before expiry.
    pub collapse_observed: bool,
}

/// Outcome of [`crate::ledger::EpistemicController::step_provisional`]
/// for one escrowed penalty whose horizon has expired.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ProvisionalOutcome {
    /// Horizon expired without an entropy collapse; the penalty is
    /// charged.
    Finalized { action_id: u64, amount: f64 },
    /// A collapse was observed within the horizon; the escrowed amount
    /// is returned to the agent rather than charged.
    Refunded { action_id: u64, amount: f64 },
}

/// Return value of [`crate::ledger::EpistemicController::compute_penalty`]
/// (spec §4.7).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Penalty {
    /// Linear in the entropy widening observed since the last prior
    /// reading (0 if entropy narrowed or held steady).
    pub entropy_penalty: f64,
    /// Multiplier `<= 1.0` applied to the agent's remaining planning
    /// horizon; shrinks below 1.0 only when posterior entropy exceeds
    /// `baseline_entropy`.
    pub horizon_multiplier: f64,
}
