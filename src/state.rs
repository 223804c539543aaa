use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::UserStore;

/// Shared application state: configuration plus the store collaborator.
/// Cloned per request by the router; both members are behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn UserStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}
