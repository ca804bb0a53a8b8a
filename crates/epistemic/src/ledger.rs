/**
 * Purpose: `EpistemicController`, the uncertainty-conservation ledger
 * (spec §4.7).
 *
 * Implements "uncertainty conservation" as an enforceable contract: an
 * agent that overclaims information gain accrues `debt_bits`, which
 * inflates the cost of future actions, and cannot undo that debt by
 * later underclaiming (asymmetric, spec §8 "epistemic asymmetry").
 *
 * What this file does NOT do:
 * - Does not decide what counts as "information" (that is the bridge
 *   between agent beliefs and bits; spec §1 treats belief
 *   representation as an external collaborator).
 * - Does not gate measurements itself; `apps/engine`/the orchestrator
 *   reads `get_inflated_cost` and refuses a request the agent has not
 *   earned (spec §7 "Quota/justification failure").
 */
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EpistemicConfig;
use crate::error::EpistemicError;
use crate::types::{ClaimRecord, EntropySource, Penalty, ProvisionalOutcome, ProvisionalPenalty};

/// Cumulative overclaim ledger and cost-inflation authority for one run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EpistemicController {
    config: EpistemicConfig,
    debt_bits: f64,
    baseline_entropy: f64,
    claims: BTreeMap<u64, ClaimRecord>,
    claim_sources: BTreeMap<u64, EntropySource>,
    provisional: Vec<ProvisionalPenalty>,
    last_prior_entropy: f64,
    last_posterior_entropy: f64,
}

impl EpistemicController {
    /// Start a fresh ledger. `baseline_entropy` is set once per run
    /// (spec §4.7); pass `None` to use `EpistemicConfig::baseline_entropy_default`.
    pub fn new(config: EpistemicConfig, baseline_entropy: Option<f64>) -> Self {
        let baseline_entropy = baseline_entropy.unwrap_or(config.baseline_entropy_default);
        Self {
            last_prior_entropy: baseline_entropy,
            last_posterior_entropy: baseline_entropy,
            baseline_entropy,
            config,
            debt_bits: 0.0,
            claims: BTreeMap::new(),
            claim_sources: BTreeMap::new(),
            provisional: Vec::new(),
        }
    }

    pub fn debt_bits(&self) -> f64 {
        self.debt_bits
    }

    pub fn baseline_entropy(&self) -> f64 {
        self.baseline_entropy
    }

    /// Record a claim of expected information gain for `action_id`
    /// (spec §4.7 `claim_action`).
    pub fn claim_action(
        &mut self,
        action_id: u64,
        action_type: impl Into<String>,
        expected_gain_bits: f64,
        prior_modalities: Vec<String>,
        claimed_marginal_gain: f64,
        entropy_source: EntropySource,
        timestamp_h: f64,
    ) -> Result<(), EpistemicError> {
        if self.claims.contains_key(&action_id) {
            return Err(EpistemicError::DuplicateClaim { action_id });
        }
        let _ = self.claims.insert(
            action_id,
            ClaimRecord {
                action_id,
                action_type: action_type.into(),
                expected_gain_bits,
                prior_modalities,
                claimed_marginal_gain,
                timestamp_h,
            },
        );
        debug!(action_id, claimed_marginal_gain, ?entropy_source, "claim recorded");
        let _ = self.claim_sources.insert(action_id, entropy_source);
        Ok(())
    }

    /// `base_cost * (1 + alpha * debt_bits)` (spec §4.7, worked example
    /// §8 scenario 5).
    pub fn get_inflated_cost(&self, base_cost: f64) -> f64 {
        base_cost * (1.0 + self.config.alpha * self.debt_bits)
    }

    /// Compute realized information gain in bits from a prior/posterior
    /// entropy pair, tagged by where the change came from (spec §4.7
    /// `measure_information_gain`).
    ///
    /// Updates the controller's running entropy readings, which feed
    /// [`EpistemicController::compute_penalty`] and the collapse check
    /// in [`EpistemicController::step_provisional`].
    pub fn measure_information_gain(
        &mut self,
        prior_entropy: f64,
        posterior_entropy: f64,
        entropy_source: EntropySource,
    ) -> Result<f64, EpistemicError> {
        if prior_entropy < 0.0 {
            return Err(EpistemicError::NegativePriorEntropy { value: prior_entropy });
        }
        if posterior_entropy < 0.0 {
            return Err(EpistemicError::NegativePosteriorEntropy { value: posterior_entropy });
        }

        self.last_prior_entropy = prior_entropy;
        self.last_posterior_entropy = posterior_entropy;
        for penalty in &mut self.provisional {
            if posterior_entropy <= penalty.baseline_entropy_at_escrow {
                penalty.collapse_observed = true;
            }
        }

        let raw_bits = prior_entropy - posterior_entropy;
        let realized = match entropy_source {
            EntropySource::Prior => 0.0,
            EntropySource::MeasurementNarrowing | EntropySource::MeasurementAmbiguous => raw_bits,
            EntropySource::MeasurementContradictory => raw_bits * entropy_source.overclaim_multiplier(),
        };
        Ok(realized)
    }

    /// Resolve an outstanding claim against `realized_bits` (spec §4.7
    /// `resolve_action`). If `claimed - realized > 0`, the shortfall is
    /// added to `debt_bits`; underclaims (`claimed - realized <= 0`)
    /// never subtract from it (spec §8 "epistemic asymmetry").
    pub fn resolve_action(&mut self, action_id: u64, realized_bits: f64) -> Result<(), EpistemicError> {
        let claim = self
            .claims
            .remove(&action_id)
            .ok_or(EpistemicError::UnknownActionId { action_id })?;
        let source = self
            .claim_sources
            .remove(&action_id)
            .unwrap_or(EntropySource::MeasurementNarrowing);

        if source.contributes_to_debt() {
            let overclaim = claim.claimed_marginal_gain - realized_bits;
            if overclaim > 0.0 {
                let charged = overclaim * source.overclaim_multiplier();
                self.debt_bits += charged;
                warn!(
                    action_id,
                    action_type = claim.action_type.as_str(),
                    overclaim,
                    charged,
                    debt_bits = self.debt_bits,
                    "claim overstated, debt accrues"
                );
            }
        }
        Ok(())
    }

    /// Linear entropy penalty plus a horizon-shrink multiplier derived
    /// from the controller's last recorded prior/posterior pair (spec
    /// §4.7 `compute_penalty`).
    pub fn compute_penalty(&self) -> Penalty {
        let widening = (self.last_posterior_entropy - self.last_prior_entropy).max(0.0);
        let entropy_penalty = self.config.entropy_penalty_weight * widening;
        let horizon_multiplier = if self.last_posterior_entropy > self.baseline_entropy {
            (self.baseline_entropy / self.last_posterior_entropy).clamp(0.0, 1.0)
        } else {
            1.0
        };
        Penalty {
            entropy_penalty,
            horizon_multiplier,
        }
    }

    /// Escrow a provisional penalty for `action_id`, settling after
    /// `horizon_steps` calls to [`EpistemicController::step_provisional`]
    /// (spec §4.7 `add_provisional_penalty`).
    pub fn add_provisional_penalty(&mut self, action_id: u64, amount: f64, horizon_steps: u32) {
        self.provisional.push(ProvisionalPenalty {
            action_id,
            amount,
            remaining_horizon_steps: horizon_steps,
            baseline_entropy_at_escrow: self.baseline_entropy,
            collapse_observed: false,
        });
    }

    /// Advance every escrowed penalty's horizon by one cycle. Penalties
    /// whose horizon reaches zero are removed and returned, finalized
    /// (charged) unless an entropy collapse was observed at any point
    /// during their horizon, in which case they are refunded (spec §9
    /// open question, resolved: refund on collapse observed within
    /// horizon, not on any later narrowing after expiry).
    pub fn step_provisional(&mut self) -> Vec<ProvisionalOutcome> {
        let mut outcomes = Vec::new();
        let mut remaining = Vec::with_capacity(self.provisional.len());
        for mut penalty in self.provisional.drain(..) {
            if penalty.remaining_horizon_steps == 0 {
                outcomes.push(Self::settle(&penalty));
                continue;
            }
            penalty.remaining_horizon_steps -= 1;
            if penalty.remaining_horizon_steps == 0 {
                outcomes.push(Self::settle(&penalty));
            } else {
                remaining.push(penalty);
            }
        }
        self.provisional = remaining;
        outcomes
    }

    fn settle(penalty: &ProvisionalPenalty) -> ProvisionalOutcome {
        if penalty.collapse_observed {
            ProvisionalOutcome::Refunded {
                action_id: penalty.action_id,
                amount: penalty.amount,
            }
        } else {
            ProvisionalOutcome::Finalized {
                action_id: penalty.action_id,
                amount: penalty.amount,
            }
        }
    }

    /// Number of claims still outstanding (not yet resolved).
    pub fn outstanding_claim_count(&self) -> usize {
        self.claims.len()
    }

    /// Number of penalties still in escrow.
    pub fn provisional_count(&self) -> usize {
        self.provisional.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> EpistemicController {
        EpistemicController::new(EpistemicConfig::default(), Some(1.0))
    }

    /// Spec §8 scenario 5: claim 0.5 bits three times, realize 0.3 each.
    /// After the third resolution, debt_bits = 0.6 and, with alpha = 0.1,
    /// get_inflated_cost(100) = 106.
    #[test]
    fn debt_inflation_matches_worked_example() {
        let mut ctl = controller();
        for i in 0..3u64 {
            ctl.claim_action(
                i,
                "cell_painting",
                0.5,
                vec!["prior".to_string()],
                0.5,
                EntropySource::MeasurementNarrowing,
                i as f64 * 6.0,
            )
            .unwrap();
            ctl.resolve_action(i, 0.3).unwrap();
        }
        assert!((ctl.debt_bits() - 0.6).abs() < 1e-9);
        assert!((ctl.get_inflated_cost(100.0) - 106.0).abs() < 1e-9);
    }

    #[test]
    fn underclaiming_never_reduces_debt() {
        let mut ctl = controller();
        ctl.claim_action(0, "assay", 1.0, vec![], 1.0, EntropySource::MeasurementNarrowing, 0.0)
            .unwrap();
        ctl.resolve_action(0, 0.2).unwrap();
        let debt_after_overclaim = ctl.debt_bits();
        assert!(debt_after_overclaim > 0.0);

        ctl.claim_action(1, "assay", 0.1, vec![], 0.1, EntropySource::MeasurementNarrowing, 1.0)
            .unwrap();
        ctl.resolve_action(1, 5.0).unwrap();
        assert_eq!(ctl.debt_bits(), debt_after_overclaim);
    }

    #[test]
    fn prior_source_never_contributes_to_debt() {
        let mut ctl = controller();
        ctl.claim_action(0, "exploration", 2.0, vec![], 2.0, EntropySource::Prior, 0.0)
            .unwrap();
        ctl.resolve_action(0, 0.0).unwrap();
        assert_eq!(ctl.debt_bits(), 0.0);
    }

    #[test]
    fn contradictory_source_is_penalized_at_one_point_five_x() {
        let mut ctl = controller();
        ctl.claim_action(
            0,
            "assay",
            1.0,
            vec![],
            1.0,
            EntropySource::MeasurementContradictory,
            0.0,
        )
        .unwrap();
        ctl.resolve_action(0, 0.0).unwrap();
        assert!((ctl.debt_bits() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn resolving_unknown_action_id_errors() {
        let mut ctl = controller();
        assert!(matches!(
            ctl.resolve_action(99, 0.0),
            Err(EpistemicError::UnknownActionId { action_id: 99 })
        ));
    }

    #[test]
    fn duplicate_claim_is_rejected() {
        let mut ctl = controller();
        ctl.claim_action(0, "assay", 1.0, vec![], 1.0, EntropySource::MeasurementNarrowing, 0.0)
            .unwrap();
        assert!(matches!(
            ctl.claim_action(0, "assay", 1.0, vec![], 1.0, EntropySource::MeasurementNarrowing, 0.0),
            Err(EpistemicError::DuplicateClaim { action_id: 0 })
        ));
    }

    #[test]
    fn negative_entropy_is_rejected() {
        let mut ctl = controller();
        assert!(matches!(
            ctl.measure_information_gain(-1.0, 0.5, EntropySource::MeasurementNarrowing),
            Err(EpistemicError::NegativePriorEntropy { .. })
        ));
        assert!(matches!(
            ctl.measure_information_gain(1.0, -0.5, EntropySource::MeasurementNarrowing),
            Err(EpistemicError::NegativePosteriorEntropy { .. })
        ));
    }

    #[test]
    fn debt_is_monotone_non_decreasing_across_any_resolution_sequence() {
        let mut ctl = controller();
        let realized = [0.0, 5.0, 0.0, 2.0, 0.0];
        let mut last_debt = 0.0;
        for (i, realized_bits) in realized.iter().enumerate() {
            let action_id = i as u64;
            ctl.claim_action(
                action_id,
                "assay",
                1.0,
                vec![],
                1.0,
                EntropySource::MeasurementNarrowing,
                i as f64,
            )
            .unwrap();
            ctl.resolve_action(action_id, *realized_bits).unwrap();
            assert!(ctl.debt_bits() >= last_debt);
            last_debt = ctl.debt_bits();
        }
    }

    #[test]
    fn compute_penalty_is_zero_when_entropy_narrows() {
        let mut ctl = controller();
        ctl.measure_information_gain(1.0, 0.2, EntropySource::MeasurementNarrowing).unwrap();
        let penalty = ctl.compute_penalty();
        assert_eq!(penalty.entropy_penalty, 0.0);
        assert_eq!(penalty.horizon_multiplier, 1.0);
    }

    #[test]
    fn compute_penalty_shrinks_horizon_when_entropy_exceeds_baseline() {
        let mut ctl = controller();
        ctl.measure_information_gain(1.0, 2.0, EntropySource::MeasurementContradictory).unwrap();
        let penalty = ctl.compute_penalty();
        assert!(penalty.entropy_penalty > 0.0);
        assert!(penalty.horizon_multiplier < 1.0);
    }

    #[test]
    fn provisional_penalty_refunds_on_collapse_within_horizon() {
        let mut ctl = controller();
        ctl.add_provisional_penalty(0, 50.0, 2);
        // Entropy collapses back to baseline before the horizon expires.
        ctl.measure_information_gain(2.0, 1.0, EntropySource::MeasurementNarrowing).unwrap();
        let outcomes = ctl.step_provisional();
        assert!(outcomes.is_empty());
        let outcomes = ctl.step_provisional();
        assert_eq!(outcomes, vec![ProvisionalOutcome::Refunded { action_id: 0, amount: 50.0 }]);
    }

    #[test]
    fn provisional_penalty_finalizes_without_collapse() {
        let mut ctl = controller();
        ctl.add_provisional_penalty(0, 50.0, 1);
        ctl.measure_information_gain(1.0, 2.0, EntropySource::MeasurementContradictory).unwrap();
        let outcomes = ctl.step_provisional();
        assert_eq!(outcomes, vec![ProvisionalOutcome::Finalized { action_id: 0, amount: 50.0 }]);
    }
}
