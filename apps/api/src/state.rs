use std::sync::Arc;

use crate::config::Config;
use crate::matching::pipeline::MatchPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Read-only after startup; each request runs its own pass through it.
    pub pipeline: Arc<MatchPipeline>,
}
