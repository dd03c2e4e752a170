use std::sync::Arc;

use crate::config::Config;
use crate::engine::BlurbEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Templates, blurb store and generation coordinator behind one facade.
    pub engine: Arc<BlurbEngine>,
    pub config: Config,
}
