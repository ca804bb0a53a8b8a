use serde::{Deserialize, Serialize};

/// Epistemic controller tunables (spec §9 `epistemic`): debt coefficient
/// `alpha`, penalty weights, and the default baseline entropy. A
/// reject-unknown-fields record, not a monkey-patchable global.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EpistemicConfig {
    /// Cost-inflation coefficient: `inflated = base * (1 + alpha * debt_bits)`
    /// (spec §4.7, worked example §8 scenario 5: `alpha = 0.1`).
    pub alpha: f64,
    /// Linear weight applied to entropy widening in
    /// [`crate::ledger::EpistemicController::compute_penalty`].
    pub entropy_penalty_weight: f64,
    /// Reference uncertainty level sampled/set once per run (spec §4.7
    /// `baseline_entropy`). Used as the default before the orchestrator
    /// sets one explicitly via `EpistemicController::new`.
    pub baseline_entropy_default: f64,
}

impl Default for EpistemicConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            entropy_penalty_weight: 1.0,
            baseline_entropy_default: 1.0,
        }
    }
}
