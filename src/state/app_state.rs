use std::sync::Arc;

use crate::transport::MatchRegistry;

/// Shared application state. No database: every match's authoritative
/// state lives in its own task, reached only through the registry.
pub struct AppState {
    pub matches: Arc<MatchRegistry>,
}

impl AppState {
    pub fn new(matches: Arc<MatchRegistry>) -> Self {
        AppState { matches }
    }
}
