//! Explicit store lifetime.
//!
//! # Responsibility
//! - Hold at most one `CounterStore` between `init` and `teardown`.
//! - Reject access outside that lifetime with a loud misuse error.
//!
//! # Invariants
//! - `init` never replaces a live store.
//! - Access before `init` or after `teardown` returns
//!   `StoreAccessError::NotInitialized` and logs at `error` level.

use crate::store::counter_store::CounterStore;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Misuse of the store lifetime. Indicates an integration bug, not a runtime
/// condition to recover from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAccessError {
    NotInitialized,
}

impl Display for StoreAccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInitialized => write!(
                f,
                "counter store accessed outside its lifetime; call init first"
            ),
        }
    }
}

impl Error for StoreAccessError {}

/// Owner of the store lifetime, passed to consumers instead of a global.
#[derive(Debug, Default)]
pub struct StoreContext {
    store: Option<CounterStore>,
}

impl StoreContext {
    /// Creates an uninitialized context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a seeded store unless one is already live.
    pub fn init(&mut self) {
        if self.store.is_some() {
            return;
        }
        self.store = Some(CounterStore::new());
        info!("event=store_init module=store status=ok");
    }

    /// Installs `store` unless one is already live.
    ///
    /// Returns `false` when a live store was kept.
    pub fn init_with(&mut self, store: CounterStore) -> bool {
        if self.store.is_some() {
            return false;
        }
        self.store = Some(store);
        info!("event=store_init module=store status=ok source=provided");
        true
    }

    /// Drops the live store. All state is discarded.
    pub fn teardown(&mut self) {
        if self.store.take().is_some() {
            info!("event=store_teardown module=store status=ok");
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.store.is_some()
    }

    /// Runs `f` with read access to the live store.
    pub fn with_store<T>(
        &self,
        f: impl FnOnce(&CounterStore) -> T,
    ) -> Result<T, StoreAccessError> {
        match self.store.as_ref() {
            Some(store) => Ok(f(store)),
            None => Err(not_initialized()),
        }
    }

    /// Runs `f` with write access to the live store.
    pub fn with_store_mut<T>(
        &mut self,
        f: impl FnOnce(&mut CounterStore) -> T,
    ) -> Result<T, StoreAccessError> {
        match self.store.as_mut() {
            Some(store) => Ok(f(store)),
            None => Err(not_initialized()),
        }
    }
}

fn not_initialized() -> StoreAccessError {
    error!("event=store_access module=store status=error reason=not_initialized");
    StoreAccessError::NotInitialized
}

#[cfg(test)]
mod tests {
    use super::{StoreAccessError, StoreContext};
    use crate::store::counter_store::CounterStore;

    #[test]
    fn access_before_init_is_rejected() {
        let context = StoreContext::new();
        let err = context
            .with_store(|store| store.len())
            .expect_err("uninitialized access must fail");
        assert_eq!(err, StoreAccessError::NotInitialized);
    }

    #[test]
    fn init_is_idempotent_and_keeps_state() {
        let mut context = StoreContext::new();
        context.init();
        context
            .with_store_mut(|store| store.increment_count())
            .expect("store should be live");
        context.init();
        assert!(!context.init_with(CounterStore::empty()));

        let count = context
            .with_store(|store| store.active_counter().map(|c| c.count))
            .expect("store should be live");
        assert_eq!(count, Some(1));
    }

    #[test]
    fn teardown_ends_the_lifetime() {
        let mut context = StoreContext::new();
        context.init();
        context.teardown();
        assert!(!context.is_initialized());
        assert!(context.with_store_mut(|store| store.reset_count()).is_err());
    }
}
