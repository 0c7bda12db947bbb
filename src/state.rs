//! Shared application state for request handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::GreetingStore;

/// Shared application state, cloneable across handlers via Arc-wrapped fields.
///
/// The store is constructed once at startup and shared read-only by every
/// request; handlers only see the [`GreetingStore`] capability.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn GreetingStore>,
}

impl AppState {
    /// Creates a new application state from the given configuration and store.
    pub fn new(config: AppConfig, store: Arc<dyn GreetingStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
