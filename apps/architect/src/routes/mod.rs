pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::render::handlers as documents;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session API
        .route("/api/v1/session", get(session::handle_get_session))
        .route("/api/v1/session/reset", post(session::handle_reset))
        .route("/api/v1/session/resume", post(session::handle_upload_resume))
        .route(
            "/api/v1/session/resume/text",
            post(session::handle_paste_resume).put(session::handle_edit_resume),
        )
        .route("/api/v1/session/analyze", post(session::handle_analyze))
        .route(
            "/api/v1/session/improvement",
            post(session::handle_request_improvement),
        )
        .route(
            "/api/v1/session/improvement/answers",
            post(session::handle_submit_answers),
        )
        .route(
            "/api/v1/session/editor",
            post(session::handle_open_editor)
                .put(session::handle_update_editor)
                .delete(session::handle_close_editor),
        )
        .route("/api/v1/session/editor/revise", post(session::handle_revise))
        .route(
            "/api/v1/session/editor/save",
            post(session::handle_save_editor),
        )
        // Document API
        .route(
            "/api/v1/documents/overview",
            get(documents::handle_overview),
        )
        .route(
            "/api/v1/documents/:field/preview",
            get(documents::handle_preview),
        )
        .route(
            "/api/v1/documents/:field/text",
            get(documents::handle_plain_text),
        )
        .route(
            "/api/v1/documents/:field/export",
            get(documents::handle_export),
        )
        .with_state(state)
}
