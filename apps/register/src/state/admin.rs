//! # Admin Gate
//!
//! Settings and catalog edits are behind the shop's admin code. The gate
//! is unlocked by `unlock_admin` and locked again on logout.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::AuthError;

#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    unlocked: Arc<AtomicBool>,
}

impl AdminGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unlock(&self) {
        self.unlocked.store(true, Ordering::SeqCst);
    }

    pub fn lock(&self) {
        self.unlocked.store(false, Ordering::SeqCst);
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked.load(Ordering::SeqCst)
    }

    /// Fails with `AdminLocked` unless the gate is open.
    pub fn require(&self) -> Result<(), AuthError> {
        if self.is_unlocked() {
            Ok(())
        } else {
            Err(AuthError::AdminLocked)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_starts_locked() {
        let gate = AdminGate::new();
        assert_eq!(gate.require(), Err(AuthError::AdminLocked));

        gate.unlock();
        assert!(gate.require().is_ok());

        gate.lock();
        assert!(!gate.is_unlocked());
    }
}
