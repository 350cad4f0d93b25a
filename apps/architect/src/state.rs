use std::sync::Arc;

use crate::session::runtime::SessionRuntime;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single in-process session and the model client that serves it.
    pub runtime: Arc<SessionRuntime>,
}
