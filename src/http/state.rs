use std::sync::Arc;

use crate::orchestrator::SessionOrchestrator;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SessionOrchestrator>,

    /// Whether 5xx bodies carry internal failure detail.
    pub expose_internal_errors: bool,
}

impl AppState {
    pub fn new(orchestrator: Arc<SessionOrchestrator>, expose_internal_errors: bool) -> Self {
        Self {
            orchestrator,
            expose_internal_errors,
        }
    }
}
