/**
 * Purpose: the "Quota/justification failure" error kind (spec §7):
 * refusing an expensive assay request that has not met the epistemic
 * controller's preconditions, with enough structured detail (spec §6
 * "All refusals carry... `violation_code`, numeric margins, suggested
 * resolutions") that an agent or operator can self-correct without
 * reading internals.
 *
 * `EpistemicController` deliberately does not decide this itself (see
 * `bvm_epistemic`'s crate docs); it only exposes `get_inflated_cost`.
 * This module is the orchestrator-level policy built on top of that
 * number: a request is justified only if its claimed marginal gain, in
 * bits, is worth at least `max_cost_per_bit` of inflated cost.
 */
use serde::{Deserialize, Serialize};

/// A recoverable refusal of a measurement request (spec §7 "Quota/
/// justification failure", §6 "structured refusal"). Unlike an
/// invariant violation this does not advance or corrupt any state; the
/// caller may retry with a smaller ask, or first resolve outstanding
/// claims to work down `debt_bits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRefusal {
    pub violation_code: &'static str,
    pub details: String,
    pub resolution_strategies: Vec<String>,
}

impl std::fmt::Display for MeasurementRefusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.violation_code, self.details)
    }
}

impl std::error::Error for MeasurementRefusal {}

/// Refuse `base_cost` worth of assay against `claimed_marginal_gain_bits`
/// once inflated by `inflated_cost` (spec §4.7 `get_inflated_cost`,
/// already debt-aware). Returns the inflated cost the caller owes if
/// the request is justified.
pub fn authorize(
    inflated_cost: f64,
    claimed_marginal_gain_bits: f64,
    max_cost_per_bit: f64,
) -> Result<f64, MeasurementRefusal> {
    if claimed_marginal_gain_bits <= 0.0 {
        return Err(MeasurementRefusal {
            violation_code: "NO_CLAIMED_GAIN",
            details: format!(
                "requested assay (inflated cost {inflated_cost:.3}) claims no positive marginal information gain"
            ),
            resolution_strategies: vec![
                "claim a positive expected_gain_bits before requesting this assay".to_string(),
                "fold this request into a cheaper, already-justified observation".to_string(),
            ],
        });
    }

    let cost_per_bit = inflated_cost / claimed_marginal_gain_bits;
    if cost_per_bit > max_cost_per_bit {
        let margin = cost_per_bit - max_cost_per_bit;
        return Err(MeasurementRefusal {
            violation_code: "COST_EXCEEDS_JUSTIFICATION",
            details: format!(
                "inflated cost {inflated_cost:.3} over claimed {claimed_marginal_gain_bits:.3} bits \
                 is {cost_per_bit:.3} cost/bit, exceeding the {max_cost_per_bit:.3} cap by {margin:.3}"
            ),
            resolution_strategies: vec![
                "resolve outstanding claims favorably to work down debt_bits before re-requesting".to_string(),
                "claim a larger, honestly justified expected_gain_bits".to_string(),
                "substitute a cheaper assay for this cycle".to_string(),
            ],
        });
    }

    Ok(inflated_cost)
}
