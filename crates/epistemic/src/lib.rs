//! The Epistemic Controller: a debt ledger that tracks each agent claim
//! about information gain, inflates future costs when claims are
//! overstated, and refuses measurements the agent has not earned the
//! right to ask for (spec §4.7).
//!
//! [`EpistemicController`] is the sole owner of `debt_bits` and the
//! outstanding-claim ledger. It does not itself decide what counts as
//! an expensive assay or what "earning the right to ask" means in
//! agent terms; the world orchestrator (`bvm-world`) reads
//! [`EpistemicController::get_inflated_cost`] and
//! [`EpistemicController::compute_penalty`] to make that call.

/// Closed entropy-source tag, claim/provisional-penalty records, and
/// the `compute_penalty` return type.
pub mod types;

/// Epistemic tunables: debt coefficient, penalty weight, baseline entropy.
pub mod config;

/// Epistemic controller failure modes.
pub mod error;

/// `EpistemicController`, the claim/resolve ledger itself.
pub mod ledger;

pub use config::EpistemicConfig;
pub use error::EpistemicError;
pub use ledger::EpistemicController;
pub use types::{ClaimRecord, EntropySource, Penalty, ProvisionalOutcome, ProvisionalPenalty};
