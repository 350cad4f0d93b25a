//! Axum route handlers for the session API.
//!
//! Every handler turns its request into one `Event` and returns the session
//! snapshot after it has been applied.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::models::{DocumentField, ImprovementAnswers};
use crate::session::{Event, SessionSnapshot};
use crate::state::AppState;

const UPLOAD_FIELD: &str = "resume";

#[derive(Debug, Deserialize)]
pub struct ResumeTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswersRequest {
    /// Keyed by 0-based question index. JSON object keys arrive as strings.
    #[serde(default)]
    pub answers: ImprovementAnswers,
}

#[derive(Debug, Deserialize)]
pub struct OpenEditorRequest {
    pub field: DocumentField,
}

#[derive(Debug, Deserialize)]
pub struct EditorTextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ReviseRequest {
    pub instruction: String,
}

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.runtime.snapshot().await)
}

/// POST /api/v1/session/reset
///
/// Always allowed, even while a request is in flight; its result is dropped.
pub async fn handle_reset(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.runtime.dispatch(Event::Reset).await?))
}

/// POST /api/v1/session/resume
///
/// Multipart upload with the file in the `resume` part (the first file part
/// is used if no part has that name). PDF, DOCX and TXT are accepted.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<SessionSnapshot>, AppError> {
    let mut upload: Option<(Option<String>, Option<String>, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let is_resume = field.name() == Some(UPLOAD_FIELD);
        if !is_resume && (upload.is_some() || field.file_name().is_none()) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read the upload: {e}")))?;
        upload = Some((file_name, content_type, data));
        if is_resume {
            break;
        }
    }

    let Some((file_name, content_type, data)) = upload else {
        return Err(AppError::InputMissing(
            "No file was uploaded. Please choose a resume file.".to_string(),
        ));
    };
    info!(
        "Extracting resume {:?} ({} bytes, {:?})",
        file_name,
        data.len(),
        content_type
    );

    let text = tokio::task::spawn_blocking(move || {
        extract_text(file_name.as_deref(), content_type.as_deref(), &data)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}")))??;

    Ok(Json(
        state.runtime.dispatch(Event::ResumeExtracted(text)).await?,
    ))
}

/// POST /api/v1/session/resume/text
///
/// Pasted-text alternative to the file upload.
pub async fn handle_paste_resume(
    State(state): State<AppState>,
    Json(req): Json<ResumeTextRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(
        state.runtime.dispatch(Event::ResumeExtracted(req.text)).await?,
    ))
}

/// PUT /api/v1/session/resume/text
///
/// Edits the working copy only; analysis always uses the uploaded original.
pub async fn handle_edit_resume(
    State(state): State<AppState>,
    Json(req): Json<ResumeTextRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(
        state.runtime.dispatch(Event::ResumeEdited(req.text)).await?,
    ))
}

/// POST /api/v1/session/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(
        state
            .runtime
            .dispatch(Event::JobDescriptionSubmitted(req.job_description))
            .await?,
    ))
}

/// POST /api/v1/session/improvement
pub async fn handle_request_improvement(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(
        state.runtime.dispatch(Event::ImprovementRequested).await?,
    ))
}

/// POST /api/v1/session/improvement/answers
pub async fn handle_submit_answers(
    State(state): State<AppState>,
    Json(req): Json<AnswersRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(
        state
            .runtime
            .dispatch(Event::AnswersSubmitted(req.answers))
            .await?,
    ))
}

/// POST /api/v1/session/editor
pub async fn handle_open_editor(
    State(state): State<AppState>,
    Json(req): Json<OpenEditorRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(
        state.runtime.dispatch(Event::EditorOpened(req.field)).await?,
    ))
}

/// PUT /api/v1/session/editor
pub async fn handle_update_editor(
    State(state): State<AppState>,
    Json(req): Json<EditorTextRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(
        state
            .runtime
            .dispatch(Event::EditorBufferChanged(req.text))
            .await?,
    ))
}

/// DELETE /api/v1/session/editor
pub async fn handle_close_editor(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.runtime.dispatch(Event::EditorClosed).await?))
}

/// POST /api/v1/session/editor/revise
pub async fn handle_revise(
    State(state): State<AppState>,
    Json(req): Json<ReviseRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(
        state
            .runtime
            .dispatch(Event::RevisionRequested(req.instruction))
            .await?,
    ))
}

/// POST /api/v1/session/editor/save
pub async fn handle_save_editor(
    State(state): State<AppState>,
) -> Result<Json<SessionSnapshot>, AppError> {
    Ok(Json(state.runtime.dispatch(Event::EditorSaved).await?))
}
