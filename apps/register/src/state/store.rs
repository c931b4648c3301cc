//! # Store State
//!
//! Wraps the document store for command access.

use tally_store::Store;

/// Store handle shared by all commands.
///
/// `Store` holds a connection pool, so no extra locking is needed here.
#[derive(Debug, Clone)]
pub struct StoreState {
    store: Store,
}

impl StoreState {
    pub fn new(store: Store) -> Self {
        StoreState { store }
    }

    pub fn inner(&self) -> &Store {
        &self.store
    }
}
