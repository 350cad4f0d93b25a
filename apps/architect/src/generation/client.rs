//! Schema-constrained generation client.
//!
//! Callers get either a fully validated `AnalysisResult` or a
//! `GenerationFailure`; a half-parsed aggregate never escapes this module.
//! Causes are kept apart for the logs and collapsed for the user.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::generation::prompts::compose_free_edit;
use crate::llm_client::schema::analysis_schema;
use crate::llm_client::{strip_json_fences, GenerationBackend, LlmError};
use crate::models::AnalysisResult;

/// The only message users see for a failed structured generation.
pub const GENERATION_RETRY_MESSAGE: &str = "Failed to get a valid response from the AI. \
    It might be experiencing high load. Please try again later.";

/// Top-level substructures a reply must carry to be usable at all.
const MANDATORY_FIELDS: [&str; 2] = ["revisedResume", "draftCoverLetter"];

#[derive(Debug, Error)]
pub enum GenerationFailure {
    #[error("generation call failed: {0}")]
    Backend(#[from] LlmError),

    #[error("reply is not valid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("reply is missing required structure '{0}'")]
    MissingStructure(&'static str),

    #[error("reply does not match the analysis shape: {0}")]
    Malformed(serde_json::Error),
}

impl GenerationFailure {
    /// Short cause tag for structured logs.
    pub fn cause(&self) -> &'static str {
        match self {
            GenerationFailure::Backend(_) => "backend",
            GenerationFailure::InvalidJson(_) => "invalid_json",
            GenerationFailure::MissingStructure(_) => "missing_structure",
            GenerationFailure::Malformed(_) => "malformed",
        }
    }

    pub fn user_message(&self) -> &'static str {
        GENERATION_RETRY_MESSAGE
    }
}

/// Wraps a `GenerationBackend` with the analysis schema and reply validation.
#[derive(Clone)]
pub struct AnalysisClient {
    backend: Arc<dyn GenerationBackend>,
    schema: Arc<Value>,
}

impl AnalysisClient {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Result<Self, serde_json::Error> {
        Ok(Self {
            backend,
            schema: Arc::new(analysis_schema()?),
        })
    }

    /// Runs a structured generation and validates the reply. No retries here;
    /// the backend handles transient transport faults, everything else is
    /// surfaced so the user can resubmit.
    pub async fn generate(&self, prompt: &str) -> Result<AnalysisResult, GenerationFailure> {
        let outcome = match self.backend.complete_structured(prompt, &self.schema).await {
            Ok(raw) => parse_analysis(&raw),
            Err(e) => Err(GenerationFailure::Backend(e)),
        };

        match &outcome {
            Ok(result) => info!(
                "Analysis generated: suitability={} quality={} questions={}",
                result.suitability_score,
                result.quality_score,
                result.clarifying_questions.len()
            ),
            Err(failure) => error!(cause = failure.cause(), "Structured generation failed: {failure}"),
        }
        outcome
    }

    /// Free-text revision of a single document. Failures propagate untranslated.
    pub async fn edit_text(&self, document: &str, instruction: &str) -> Result<String, LlmError> {
        let prompt = compose_free_edit(document, instruction);
        let revised = self.backend.complete_text(&prompt).await?;
        debug!("Free edit produced {} chars", revised.len());
        Ok(revised.trim().to_string())
    }
}

/// Validates a raw reply in three steps: syntax, mandatory structure, shape.
pub fn parse_analysis(raw: &str) -> Result<AnalysisResult, GenerationFailure> {
    let value: Value =
        serde_json::from_str(strip_json_fences(raw)).map_err(GenerationFailure::InvalidJson)?;

    for field in MANDATORY_FIELDS {
        match value.get(field) {
            Some(Value::Object(_)) | Some(Value::String(_)) => {}
            _ => return Err(GenerationFailure::MissingStructure(field)),
        }
    }

    serde_json::from_value(value).map_err(GenerationFailure::Malformed)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::{CoverLetterDocument, ResumeDocument};

    /// Backend that replays canned replies in order and records prompts.
    #[derive(Default)]
    pub struct ScriptedBackend {
        pub structured: Mutex<VecDeque<Result<String, LlmError>>>,
        pub text: Mutex<VecDeque<Result<String, LlmError>>>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        pub fn with_structured(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                structured: Mutex::new(replies.into()),
                ..Default::default()
            }
        }

        pub fn with_text(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                text: Mutex::new(replies.into()),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl GenerationBackend for ScriptedBackend {
        async fn complete_structured(&self, prompt: &str, _schema: &Value) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.structured
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }

        async fn complete_text(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.text
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    pub fn analysis_json(summary: &str) -> String {
        serde_json::json!({
            "suitabilityScore": 81,
            "scoreJustification": "Strong overlap with the stack.",
            "qualityScore": 70,
            "qualityScoreJustification": "Bullets lack metrics.",
            "hardSkills": ["Rust", "PostgreSQL"],
            "softSkills": ["Mentoring"],
            "clarifyingQuestions": ["How large was your team?", "What latency did you reach?"],
            "revisedResume": {
                "contactInfo": {"name": "Ada Lovelace", "email": "ada@example.com", "phone": "555-0100", "profileLink": "https://example.com/ada", "address": "London, UK"},
                "summary": summary,
                "experience": [{"title": "Engineer", "organization": "Analytical Engines", "location": "London", "dates": "1842-1843", "bullets": ["**Designed** the first algorithm"]}],
                "education": [],
                "projects": [],
                "publications": [],
                "skills": [{"category": "Technical", "skills": ["Mathematics", "**Rust**"]}]
            },
            "draftCoverLetter": {
                "contactInfo": {"name": "Ada Lovelace", "email": "ada@example.com", "phone": "555-0100", "profileLink": "", "address": "London, UK"},
                "date": "1 May 2025",
                "recipientName": "Hiring Manager",
                "recipientOrganization": "Babbage Ltd",
                "body": ["I am writing to apply.", "**I built** engines."],
                "closing": "Sincerely,"
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_generate_returns_validated_result() {
        let backend = Arc::new(ScriptedBackend::with_structured(vec![Ok(analysis_json("Hi"))]));
        let client = AnalysisClient::new(backend.clone()).unwrap();
        let result = client.generate("prompt").await.unwrap();
        assert_eq!(result.suitability_score, 81);
        assert!(matches!(result.revised_resume, ResumeDocument::Structured(_)));
        assert!(matches!(result.draft_cover_letter, CoverLetterDocument::Structured(_)));
        assert_eq!(backend.prompts.lock().unwrap().as_slice(), ["prompt".to_string()]);
    }

    #[tokio::test]
    async fn test_backend_error_is_generation_failure() {
        let backend = Arc::new(ScriptedBackend::with_structured(vec![Err(LlmError::Api {
            status: 529,
            message: "overloaded".to_string(),
        })]));
        let client = AnalysisClient::new(backend).unwrap();
        let failure = client.generate("prompt").await.unwrap_err();
        assert_eq!(failure.cause(), "backend");
        assert_eq!(failure.user_message(), GENERATION_RETRY_MESSAGE);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let failure = parse_analysis("{not json").unwrap_err();
        assert!(matches!(failure, GenerationFailure::InvalidJson(_)));
    }

    #[test]
    fn test_missing_cover_letter_is_rejected() {
        let mut value: Value = serde_json::from_str(&analysis_json("Hi")).unwrap();
        value.as_object_mut().unwrap().remove("draftCoverLetter");
        let failure = parse_analysis(&value.to_string()).unwrap_err();
        assert!(matches!(
            failure,
            GenerationFailure::MissingStructure("draftCoverLetter")
        ));
    }

    #[test]
    fn test_null_resume_is_rejected() {
        let mut value: Value = serde_json::from_str(&analysis_json("Hi")).unwrap();
        value["revisedResume"] = Value::Null;
        let failure = parse_analysis(&value.to_string()).unwrap_err();
        assert!(matches!(failure, GenerationFailure::MissingStructure("revisedResume")));
    }

    #[test]
    fn test_null_sections_do_not_discard_the_analysis() {
        let mut value: Value = serde_json::from_str(&analysis_json("Hi")).unwrap();
        value["revisedResume"]["publications"] = Value::Null;
        value["revisedResume"]["experience"][0]["bullets"] = Value::Null;
        value["revisedResume"]["contactInfo"]["phone"] = Value::Null;
        let result = parse_analysis(&value.to_string()).unwrap();
        let ResumeDocument::Structured(resume) = result.revised_resume else {
            panic!("resume should stay structured");
        };
        assert!(resume.publications.is_empty());
        assert!(resume.experience[0].bullets.is_empty());
        assert_eq!(resume.contact_info.phone, "");
        assert_eq!(resume.experience[0].title, "Engineer");
    }

    #[test]
    fn test_wrong_shape_is_malformed() {
        let mut value: Value = serde_json::from_str(&analysis_json("Hi")).unwrap();
        value["hardSkills"] = serde_json::json!("Rust, Go");
        let failure = parse_analysis(&value.to_string()).unwrap_err();
        assert_eq!(failure.cause(), "malformed");
    }

    #[test]
    fn test_fenced_reply_is_accepted() {
        let fenced = format!("```json\n{}\n```", analysis_json("Hi"));
        assert!(parse_analysis(&fenced).is_ok());
    }

    #[test]
    fn test_plain_string_documents_pass_validation() {
        let mut value: Value = serde_json::from_str(&analysis_json("Hi")).unwrap();
        value["revisedResume"] = serde_json::json!("Plain resume text");
        let result = parse_analysis(&value.to_string()).unwrap();
        assert_eq!(
            result.revised_resume,
            ResumeDocument::Plain("Plain resume text".to_string())
        );
    }

    #[tokio::test]
    async fn test_edit_text_trims_and_sends_free_edit_prompt() {
        let backend = Arc::new(ScriptedBackend::with_text(vec![Ok("  Revised.\n".to_string())]));
        let client = AnalysisClient::new(backend.clone()).unwrap();
        let revised = client.edit_text("Original.", "Shorten it").await.unwrap();
        assert_eq!(revised, "Revised.");
        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("Original."));
        assert!(prompts[0].contains("Shorten it"));
    }

    #[tokio::test]
    async fn test_edit_text_failure_propagates_untranslated() {
        let backend = Arc::new(ScriptedBackend::with_text(vec![Err(LlmError::Api {
            status: 400,
            message: "prompt too long".to_string(),
        })]));
        let client = AnalysisClient::new(backend).unwrap();
        let err = client.edit_text("doc", "x").await.unwrap_err();
        assert!(err.to_string().contains("prompt too long"));
    }
}
