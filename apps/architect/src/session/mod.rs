//! Application state machine.
//!
//! `Session` owns the aggregate and every piece of page state. Transitions
//! are plain methods that mutate the session and, for the three
//! network-backed ones, hand back an [`Effect`] describing the call to make.
//! The effect's outcome comes back in as another [`Event`]; see
//! [`runtime::SessionRuntime`] for the loop that drives this.
//!
//! Each async slot (page, modal) carries a monotonic generation counter.
//! A completion is applied only if its token matches the slot's in-flight
//! generation; anything else is stale and dropped.

pub mod handlers;
pub mod runtime;

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::prompts::{compose, AnalysisOperation};
use crate::models::{AnalysisResult, DocumentField, ImprovementAnswers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Home,
    Analysis,
    Results,
    Improvement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// Analysis and regeneration.
    Page,
    /// AI-assisted revision inside the editor.
    Modal,
}

/// Identifies one request issued from one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken {
    pub slot: SlotKind,
    pub generation: u64,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    in_flight: Option<u64>,
}

impl Slot {
    fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    fn begin(&mut self, slot: SlotKind) -> Result<RequestToken, AppError> {
        if self.is_busy() {
            return Err(AppError::Busy);
        }
        self.generation += 1;
        self.in_flight = Some(self.generation);
        Ok(RequestToken {
            slot,
            generation: self.generation,
        })
    }

    /// Clears the busy flag if `token` is the current request.
    fn finish(&mut self, token: RequestToken) -> bool {
        if self.in_flight == Some(token.generation) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Orphans whatever is in flight.
    fn invalidate(&mut self) {
        self.generation += 1;
        self.in_flight = None;
    }
}

/// Inputs to the state machine.
#[derive(Debug)]
pub enum Event {
    ResumeExtracted(String),
    ResumeEdited(String),
    JobDescriptionSubmitted(String),
    AnalysisCompleted {
        token: RequestToken,
        operation: AnalysisOperation,
        outcome: Result<AnalysisResult, AppError>,
    },
    ImprovementRequested,
    AnswersSubmitted(ImprovementAnswers),
    EditorOpened(DocumentField),
    EditorBufferChanged(String),
    RevisionRequested(String),
    RevisionCompleted {
        token: RequestToken,
        outcome: Result<String, AppError>,
    },
    EditorSaved,
    EditorClosed,
    Reset,
}

/// A network call the caller must perform and report back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    GenerateAnalysis {
        token: RequestToken,
        operation: AnalysisOperation,
        prompt: String,
    },
    ReviseDocument {
        token: RequestToken,
        document: String,
        instruction: String,
    },
}

#[derive(Debug, Clone)]
struct Editor {
    field: DocumentField,
    buffer: String,
    error: Option<String>,
}

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    /// Sent to the model. Never edited.
    original_resume: Option<String>,
    /// What the user sees and may edit.
    working_resume: String,
    job_description: Option<String>,
    analysis: Option<AnalysisResult>,
    error: Option<String>,
    page: Slot,
    modal: Slot,
    editor: Option<Editor>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: Phase::Home,
            original_resume: None,
            working_resume: String::new(),
            job_description: None,
            analysis: None,
            error: None,
            page: Slot::default(),
            modal: Slot::default(),
            editor: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn apply(&mut self, event: Event) -> Result<Option<Effect>, AppError> {
        match event {
            Event::ResumeExtracted(text) => self.resume_extracted(text).map(|_| None),
            Event::ResumeEdited(text) => self.resume_edited(text).map(|_| None),
            Event::JobDescriptionSubmitted(jd) => self.submit_job_description(jd).map(Some),
            Event::AnalysisCompleted {
                token,
                operation,
                outcome,
            } => self.complete_analysis(token, operation, outcome).map(|_| None),
            Event::ImprovementRequested => self.request_improvement().map(|_| None),
            Event::AnswersSubmitted(answers) => self.submit_answers(answers).map(Some),
            Event::EditorOpened(field) => self.open_editor(field).map(|_| None),
            Event::EditorBufferChanged(text) => self.change_buffer(text).map(|_| None),
            Event::RevisionRequested(instruction) => self.request_revision(instruction).map(Some),
            Event::RevisionCompleted { token, outcome } => {
                self.complete_revision(token, outcome).map(|_| None)
            }
            Event::EditorSaved => self.save_editor().map(|_| None),
            Event::EditorClosed => {
                self.close_editor();
                Ok(None)
            }
            Event::Reset => {
                self.reset();
                Ok(None)
            }
        }
    }

    fn invalid(&self, action: &'static str) -> AppError {
        AppError::InvalidTransition {
            action,
            phase: self.phase,
        }
    }

    /// Records the message and sends the user back to the upload page.
    fn redirect_home(&mut self, message: &str) -> AppError {
        warn!("Redirecting to Home: {message}");
        self.page.invalidate();
        self.phase = Phase::Home;
        self.error = Some(message.to_string());
        AppError::InputMissing(message.to_string())
    }

    fn resume_extracted(&mut self, text: String) -> Result<(), AppError> {
        if self.phase != Phase::Home {
            return Err(self.invalid("upload a resume"));
        }
        if text.trim().is_empty() {
            return Err(AppError::InputMissing(
                "The resume is empty. Please upload a file or paste its text.".to_string(),
            ));
        }

        info!("Resume received ({} chars)", text.len());
        self.working_resume = text.clone();
        self.original_resume = Some(text);
        self.job_description = None;
        self.analysis = None;
        self.error = None;
        self.phase = Phase::Analysis;
        Ok(())
    }

    fn resume_edited(&mut self, text: String) -> Result<(), AppError> {
        if self.original_resume.is_none() {
            return Err(self.invalid("edit the resume"));
        }
        self.working_resume = text;
        Ok(())
    }

    fn submit_job_description(&mut self, job_description: String) -> Result<Effect, AppError> {
        if self.phase != Phase::Analysis {
            return Err(self.invalid("submit a job description"));
        }
        let Some(resume) = self.original_resume.as_deref() else {
            return Err(self.redirect_home("Resume is missing. Please go back and upload it."));
        };
        if self.page.is_busy() {
            return Err(AppError::Busy);
        }

        let operation = AnalysisOperation::InitialAnalysis;
        let prompt = compose(operation, resume, &job_description, None)?;
        let token = self.page.begin(SlotKind::Page)?;

        info!(generation = token.generation, "Starting {}", operation.label());
        self.job_description = Some(job_description);
        self.error = None;
        Ok(Effect::GenerateAnalysis {
            token,
            operation,
            prompt,
        })
    }

    fn complete_analysis(
        &mut self,
        token: RequestToken,
        operation: AnalysisOperation,
        outcome: Result<AnalysisResult, AppError>,
    ) -> Result<(), AppError> {
        if !self.page.finish(token) {
            warn!(
                slot = ?token.slot,
                generation = token.generation,
                current = self.page.generation,
                "Discarding stale {} completion",
                operation.label()
            );
            return Ok(());
        }

        match outcome {
            Ok(result) => {
                info!("{} applied", operation.label());
                self.analysis = Some(result);
                self.error = None;
                self.phase = Phase::Results;
                Ok(())
            }
            Err(e) => {
                // Phase and aggregate stay as they were.
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    fn request_improvement(&mut self) -> Result<(), AppError> {
        if self.phase != Phase::Results {
            return Err(self.invalid("request an improvement"));
        }
        if self.page.is_busy() {
            return Err(AppError::Busy);
        }
        if self.analysis.is_none() {
            return Err(self.redirect_home("No analysis found. Please start over."));
        }
        self.error = None;
        self.phase = Phase::Improvement;
        Ok(())
    }

    fn submit_answers(&mut self, answers: ImprovementAnswers) -> Result<Effect, AppError> {
        if self.phase != Phase::Improvement {
            return Err(self.invalid("submit answers"));
        }
        let (Some(resume), Some(job_description), Some(analysis)) = (
            self.original_resume.as_deref(),
            self.job_description.as_deref(),
            self.analysis.as_ref(),
        ) else {
            return Err(self.redirect_home(
                "Original data not found. Please start over from the home page.",
            ));
        };
        if self.page.is_busy() {
            return Err(AppError::Busy);
        }

        let question_count = analysis.clarifying_questions.len();
        let total = answers.len();
        let answers: ImprovementAnswers = answers
            .into_iter()
            .filter(|(index, text)| *index < question_count && !text.trim().is_empty())
            .collect();
        if answers.len() < total {
            warn!(
                "Dropped {} answers that were blank or matched no question",
                total - answers.len()
            );
        }

        let operation = AnalysisOperation::Regeneration;
        let prompt = compose(operation, resume, job_description, Some(&answers))?;
        let token = self.page.begin(SlotKind::Page)?;

        info!(
            generation = token.generation,
            answers = answers.len(),
            "Starting {}",
            operation.label()
        );
        self.error = None;
        self.phase = Phase::Results;
        Ok(Effect::GenerateAnalysis {
            token,
            operation,
            prompt,
        })
    }

    fn open_editor(&mut self, field: DocumentField) -> Result<(), AppError> {
        let Some(analysis) = self.analysis.as_ref() else {
            return Err(AppError::InputMissing(
                "There is no document to edit yet. Run an analysis first.".to_string(),
            ));
        };
        if self.modal.is_busy() {
            return Err(AppError::Busy);
        }

        let buffer = analysis.document(field).to_plain_text();
        self.modal.invalidate();
        self.editor = Some(Editor {
            field,
            buffer,
            error: None,
        });
        Ok(())
    }

    fn editor_mut(&mut self, action: &'static str) -> Result<&mut Editor, AppError> {
        let phase = self.phase;
        self.editor
            .as_mut()
            .ok_or(AppError::InvalidTransition { action, phase })
    }

    fn change_buffer(&mut self, text: String) -> Result<(), AppError> {
        if self.modal.is_busy() {
            return Err(AppError::Busy);
        }
        self.editor_mut("change the editor text")?.buffer = text;
        Ok(())
    }

    fn request_revision(&mut self, instruction: String) -> Result<Effect, AppError> {
        if self.editor.is_none() {
            return Err(self.invalid("revise a document"));
        }
        if instruction.trim().is_empty() {
            return Err(AppError::Validation(
                "Please describe how the document should change.".to_string(),
            ));
        }
        let token = self.modal.begin(SlotKind::Modal)?;
        let editor = self.editor_mut("revise a document")?;
        editor.error = None;

        info!(generation = token.generation, field = ?editor.field, "Starting free edit");
        Ok(Effect::ReviseDocument {
            token,
            document: editor.buffer.clone(),
            instruction,
        })
    }

    fn complete_revision(
        &mut self,
        token: RequestToken,
        outcome: Result<String, AppError>,
    ) -> Result<(), AppError> {
        if !self.modal.finish(token) {
            warn!(
                slot = ?token.slot,
                generation = token.generation,
                current = self.modal.generation,
                "Discarding stale free edit completion"
            );
            return Ok(());
        }
        let editor = self.editor_mut("apply a revision")?;

        match outcome {
            Ok(text) => {
                editor.buffer = text;
                Ok(())
            }
            Err(e) => {
                editor.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    fn save_editor(&mut self) -> Result<(), AppError> {
        // A regeneration in flight would replace the aggregate and drop the edit.
        if self.modal.is_busy() || self.page.is_busy() {
            return Err(AppError::Busy);
        }
        let Some(editor) = self.editor.take() else {
            return Err(self.invalid("save an edit"));
        };
        let Some(analysis) = self.analysis.as_ref() else {
            return Err(AppError::InputMissing(
                "The analysis is gone. Please start over.".to_string(),
            ));
        };

        info!(field = ?editor.field, "Saving manual edit");
        self.analysis = Some(analysis.with_plain_field(editor.field, editor.buffer));
        self.modal.invalidate();
        Ok(())
    }

    fn close_editor(&mut self) {
        self.editor = None;
        self.modal.invalidate();
    }

    fn reset(&mut self) {
        info!("Session reset");
        let mut page = std::mem::take(&mut self.page);
        let mut modal = std::mem::take(&mut self.modal);
        page.invalidate();
        modal.invalidate();
        *self = Session {
            page,
            modal,
            ..Session::default()
        };
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let busy = self.page.is_busy();
        SessionSnapshot {
            phase: self.phase(),
            busy,
            status: match (busy, self.phase) {
                (true, Phase::Analysis) => Some("Analyzing your resume..."),
                (true, Phase::Results) => Some("Regenerating with your feedback..."),
                _ => None,
            },
            error: self.error.clone(),
            resume_text: self.original_resume.as_ref().map(|_| self.working_resume.clone()),
            job_description: self.job_description.clone(),
            analysis: self.analysis.clone(),
            editor: self.editor.as_ref().map(|editor| EditorSnapshot {
                field: editor.field,
                title: editor.field.title(),
                buffer: editor.buffer.clone(),
                busy: self.modal.is_busy(),
                error: editor.error.clone(),
            }),
        }
    }
}

/// Read-only view of the session sent to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub busy: bool,
    pub status: Option<&'static str>,
    pub error: Option<String>,
    pub resume_text: Option<String>,
    pub job_description: Option<String>,
    pub analysis: Option<AnalysisResult>,
    pub editor: Option<EditorSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub field: DocumentField,
    pub title: &'static str,
    pub buffer: String,
    pub busy: bool,
    pub error: Option<String>,
}
