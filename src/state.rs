use std::sync::Arc;

use crate::config::{self, OwnershipPolicy, SecurityConfig};
use crate::database::store::Store;

/// Shared handles passed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub security: Arc<SecurityConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, security: SecurityConfig) -> Self {
        Self {
            store,
            security: Arc::new(security),
        }
    }

    /// State using the process-wide security configuration
    pub fn from_config(store: Arc<dyn Store>) -> Self {
        Self::new(store, config::config().security.clone())
    }

    pub fn policy(&self) -> OwnershipPolicy {
        self.security.ownership_policy
    }
}
