use thiserror::Error;

/// Tracks whether a biology step is currently "open" (between
/// `_step_begin()` and `_step_commit()`), per spec §4.4's guardrail:
/// instant-kill or other direct-state APIs must refuse to execute while
/// a step is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepGuard {
    open: bool,
}

/// Raised when a direct-state mutation is attempted while a step is open.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("direct-state mutation refused: a biology step is currently open")]
pub struct StepGuardError;

impl StepGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a step as open. Scoped-resource discipline (spec §9):
    /// callers must pair this with [`StepGuard::commit`] on every exit
    /// path, including an invariant-violation abort.
    pub fn begin(&mut self) {
        self.open = true;
    }

    /// Mark the step closed.
    pub fn commit(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Checked entry point for a direct-state API (e.g. an "instant
    /// kill" debug hook). Returns an error instead of running while a
    /// step is open.
    pub fn guard_direct_mutation(&self) -> Result<(), StepGuardError> {
        if self.open {
            Err(StepGuardError)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_mutation_refused_while_step_open() {
        let mut guard = StepGuard::new();
        assert!(guard.guard_direct_mutation().is_ok());
        guard.begin();
        assert!(guard.guard_direct_mutation().is_err());
        guard.commit();
        assert!(guard.guard_direct_mutation().is_ok());
    }
}
