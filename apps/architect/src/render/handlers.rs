//! Axum route handlers for document preview, plain text and export.

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
};

use crate::errors::AppError;
use crate::models::{AnalysisResult, DocumentField};
use crate::render::export::export_field;
use crate::render::markup;
use crate::state::AppState;

async fn current_analysis(state: &AppState) -> Result<AnalysisResult, AppError> {
    state
        .runtime
        .read(|session| session.analysis().cloned())
        .await
        .ok_or_else(|| {
            AppError::InputMissing("No analysis yet. Please run an analysis first.".to_string())
        })
}

/// GET /api/v1/documents/:field/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(field): Path<DocumentField>,
) -> Result<Html<String>, AppError> {
    let analysis = current_analysis(&state).await?;
    Ok(Html(analysis.document(field).to_markup()))
}

/// GET /api/v1/documents/:field/text
pub async fn handle_plain_text(
    State(state): State<AppState>,
    Path(field): Path<DocumentField>,
) -> Result<String, AppError> {
    let analysis = current_analysis(&state).await?;
    Ok(analysis.document(field).to_plain_text())
}

/// GET /api/v1/documents/:field/export
///
/// Rendered from the analysis already held in memory; no model call.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(field): Path<DocumentField>,
) -> Result<impl IntoResponse, AppError> {
    let analysis = current_analysis(&state).await?;
    let exported = export_field(&analysis, field);
    let disposition = format!("attachment; filename=\"{}\"", exported.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, exported.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        exported.body,
    ))
}

/// GET /api/v1/documents/overview
pub async fn handle_overview(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let analysis = current_analysis(&state).await?;
    Ok(Html(markup::overview(&analysis)))
}
