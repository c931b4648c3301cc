//! # Session State
//!
//! The one order session of the register, behind a mutex.
//!
//! ## Locking Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  with_session / with_session_mut                                        │
//! │                                                                         │
//! │  lock ──► closure runs to completion ──► unlock                         │
//! │                                                                         │
//! │  • Closures are synchronous: never hold the lock across an .await      │
//! │  • Anything a print needs is cloned out before the lock is released    │
//! │  • A poisoned lock is recovered: OrderSession methods leave the        │
//! │    session unchanged on error, so the inner value is still consistent  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use tally_core::OrderSession;

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    session: Arc<Mutex<OrderSession>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the session.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&OrderSession) -> R,
    {
        let session = self.session.lock().unwrap_or_else(|p| p.into_inner());
        f(&session)
    }

    /// Executes a function with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut OrderSession) -> R,
    {
        let mut session = self.session.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut session)
    }
}
