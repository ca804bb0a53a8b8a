/**
 * ROLE: BOUNDARY
 * PURPOSE: Deterministic math operations, ordered collections, and simulation time tracking
 * FAILURE MODES: OVERFLOW_ON_TIME_TICK (wrap at u64::MAX)
 * INVARIANTS:
 *   - No std::collections::HashMap or HashSet (breaks iteration-order determinism)
 *   - SimTime monotonically increases (never decreases)
 *   - All math operations are deterministic and reproducible across platforms
 *   - No system time dependencies (all time is simulation time, in hours)
 *
 * # Design Rationale
 *
 * This crate provides the two ambient layers every other crate in the
 * workspace builds on:
 *
 * 1. **SimTime** - a logical tick counter, independent of wall time
 * 2. **Collections** - BTreeMap/BTreeSet/Vec wrappers with deterministic
 *    iteration order
 * 3. **Math** - the handful of f64 primitives the biology and spine models
 *    need (clamp, lerp, the interval-integrated gate fraction, logistic
 *    sigmoid, a NaN/overflow-safe exp), kept deliberately small rather than
 *    a general numerics library.
 *
 * # Critical Invariants
 *
 * ## No System Time
 * Never use `std::time::Instant::now()` or `std::time::SystemTime`. All
 * temporal reasoning flows through the `time_h: f64` parameters threaded
 * through the biology and spine crates; `SimTime` exists only for discrete
 * tick bookkeeping where one is needed (e.g. replay step counts).
 *
 * ## No External Entropy
 * This crate draws no randomness of its own. All randomness in the
 * workspace flows through the `rng` crate's named streams.
 *
 * ## Ordered Collections Only
 * Never use `std::collections::HashMap` or `std::collections::HashSet` for
 * state that participates in the canonical hash chain. Use
 * [`DeterministicMap`] and [`DeterministicSet`] instead.
 */

use serde::{Deserialize, Serialize};

pub mod math;
pub mod collections;

pub use math::DeterministicMath;
pub use collections::{DeterministicMap, DeterministicSet, DeterministicVec};

/// Simulation time - logical clock independent of wall time.
///
/// # Design
///
/// `SimTime` represents discrete simulation ticks, not wall-clock time.
/// It starts at 0 at genesis and monotonically increases by 1 each tick.
/// Biological and spine time (`time_h: f64`, in hours) is the primary
/// clock used throughout the rest of the workspace; `SimTime` is a
/// secondary integer counter for code that needs a discrete step index
/// (snapshot cadence, replay progress) rather than a continuous hour
/// value.
///
/// # Invariants
///
/// - Starts at 0
/// - Only increases (never decreases or resets mid-run)
/// - Wraps at `u64::MAX`
/// - Serializable and deserializable
///
/// # Example
///
/// ```
/// use bvm_deterministic::SimTime;
///
/// let mut time = SimTime::zero();
/// assert_eq!(time.as_u64(), 0);
///
/// time.tick();
/// assert_eq!(time.as_u64(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTime(pub u64);

impl SimTime {
    /// Create a new SimTime at genesis (tick 0).
    pub fn zero() -> Self {
        SimTime(0)
    }

    /// Advance simulation time by one tick.
    ///
    /// Never panics; wraps at `u64::MAX`.
    pub fn tick(&mut self) {
        self.0 = self.0.wrapping_add(1);
    }

    /// Get the current tick number as a u64.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Create a SimTime from a u64 tick number.
    ///
    /// Use for restoring from a snapshot or replaying from a checkpoint.
    pub fn from_u64(t: u64) -> Self {
        SimTime(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_time() {
        let mut time = SimTime::zero();
        assert_eq!(time.as_u64(), 0);

        time.tick();
        assert_eq!(time.as_u64(), 1);

        time.tick();
        assert_eq!(time.as_u64(), 2);
    }

    #[test]
    fn sim_time_wraps_at_max() {
        let mut time = SimTime::from_u64(u64::MAX);
        time.tick();
        assert_eq!(time.as_u64(), 0);
    }
}
