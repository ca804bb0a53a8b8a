use super::rng_stream::RngSubsystem;
use thiserror::Error;

/// A consumption-site restriction on which RNG roles may be drawn from.
///
/// Callers that must not cross subsystem boundaries (e.g. a measurement
/// path that must never touch `rng_biology`) wrap their draws in a
/// [`RngGuard`] scoped to the roles they are allowed to use. This is the
/// enforcement mechanism behind spec §4.1's contract: "no stream may be
/// consumed by code outside its declared role".
#[derive(Debug, Clone, Copy)]
pub struct RngGuard {
    allowed: &'static [RngSubsystem],
    site: &'static str,
}

/// Error raised when a call site draws from an RNG role it is not
/// permitted to consume.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("RNG guard violation at {site}: {subsystem:?} is not permitted here")]
pub struct RngGuardViolation {
    /// The call site that attempted the draw.
    pub site: &'static str,
    /// The subsystem it attempted to draw from.
    pub subsystem: RngSubsystem,
}

impl RngGuard {
    /// Construct a guard scoped to `site`, permitting only `allowed` roles.
    pub const fn new(site: &'static str, allowed: &'static [RngSubsystem]) -> Self {
        Self { allowed, site }
    }

    /// Check that `subsystem` is permitted under this guard.
    pub fn check(&self, subsystem: RngSubsystem) -> Result<(), RngGuardViolation> {
        if self.allowed.contains(&subsystem) {
            Ok(())
        } else {
            Err(RngGuardViolation {
                site: self.site,
                subsystem,
            })
        }
    }
}

/// Guard for the measurement path: only `rng_assay` may be consumed.
pub const MEASUREMENT_GUARD: RngGuard = RngGuard::new("measurement", &[RngSubsystem::Assay]);

/// Guard for the biology step: `rng_biology` and `rng_treatment` only.
pub const BIOLOGY_GUARD: RngGuard = RngGuard::new(
    "biology_step",
    &[RngSubsystem::Biology, RngSubsystem::Treatment],
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurement_guard_rejects_biology_stream() {
        assert!(MEASUREMENT_GUARD.check(RngSubsystem::Assay).is_ok());
        assert!(MEASUREMENT_GUARD.check(RngSubsystem::Biology).is_err());
    }

    #[test]
    fn biology_guard_rejects_assay_stream() {
        assert!(BIOLOGY_GUARD.check(RngSubsystem::Biology).is_ok());
        assert!(BIOLOGY_GUARD.check(RngSubsystem::Treatment).is_ok());
        assert!(BIOLOGY_GUARD.check(RngSubsystem::Assay).is_err());
    }
}
