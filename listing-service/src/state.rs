//! Application state management

use std::sync::Arc;

use crate::{config::Config, store::StoreProvider};

/// Application state shared across handlers
///
/// Generic over the store provider so that tests can inject a
/// [`MemoryStore`](crate::store::MemoryStore) where production runs against
/// the REST backend.
pub struct AppState<P> {
    config: Arc<Config>,
    store: Arc<P>,
}

// Manual impl: `P` itself need not be `Clone`
impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            store: Arc::clone(&self.store),
        }
    }
}

impl<P: StoreProvider> AppState<P> {
    /// Create a new AppState from configuration and a store provider
    pub fn new(config: Config, store: P) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the store provider
    pub fn store(&self) -> &P {
        &self.store
    }
}

impl<P> std::fmt::Debug for AppState<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.config.service.name)
            .field("routes", &self.config.routes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_clone_shares_store() {
        let state = AppState::new(Config::default(), MemoryStore::new());
        let cloned = state.clone();
        assert!(std::ptr::eq(state.store(), cloned.store()));
        assert_eq!(cloned.config().service.port, state.config().service.port);
    }
}
