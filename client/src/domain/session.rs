//! Process-wide authentication gate.
//!
//! Credential checks happen elsewhere; the gate only records that they
//! passed. There is no way back to unauthenticated.

use std::sync::atomic::{AtomicBool, Ordering};

/// Tracks whether the synchronizer may be invoked.
#[derive(Debug, Default)]
pub struct SessionGate {
    authenticated: AtomicBool,
}

impl SessionGate {
    /// Create a gate in the unauthenticated state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            authenticated: AtomicBool::new(false),
        }
    }

    /// Mark the session authenticated.
    ///
    /// Returns `true` only for the call that performed the transition, so the
    /// caller can trigger the initial load exactly once. Later calls are
    /// no-ops returning `false`.
    #[must_use = "the first caller owns the initial load"]
    pub fn authenticate(&self) -> bool {
        !self.authenticated.swap(true, Ordering::AcqRel)
    }

    /// Return the current state.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unauthenticated() {
        assert!(!SessionGate::new().is_authenticated());
    }

    #[test]
    fn only_the_first_call_transitions() {
        let gate = SessionGate::new();

        assert!(gate.authenticate());
        assert!(gate.is_authenticated());
        assert!(!gate.authenticate());
        assert!(gate.is_authenticated());
    }
}
