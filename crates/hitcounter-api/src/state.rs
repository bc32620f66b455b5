use std::sync::Arc;

use hitcounter_core::HitStore;

/// Shared application state passed to the request handler.
#[derive(Clone)]
pub struct AppState {
    /// Hit storage, created once at startup.
    pub store: Arc<dyn HitStore>,
    /// Log every request's parameters and body.
    pub verbose: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn HitStore>, verbose: bool) -> Self {
        Self { store, verbose }
    }
}
