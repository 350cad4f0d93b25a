use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::models::document::{
    null_as_default, CoverLetterDocument, ResumeDocument, StructuredCoverLetter, StructuredResume,
};

/// Answers to clarifying questions, keyed by the question's 0-based index.
///
/// Keys are sparse. `BTreeMap` keeps them in question order so prompt
/// rendering is deterministic.
pub type ImprovementAnswers = BTreeMap<usize, String>;

/// The root aggregate: scores, keywords, follow-up questions and both documents.
///
/// Created by an initial analysis, replaced wholesale by a regeneration and
/// field-patched by a manual edit save. The JSON schema handed to the LLM is
/// derived from this type; both documents are advertised as their structured
/// shapes since the plain variants only exist as fallbacks on our side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Percentage (0-100) of how well the resume matches the job description.
    #[serde(deserialize_with = "deserialize_score")]
    #[schemars(with = "u8")]
    pub suitability_score: u8,
    /// One-sentence justification for the suitability score.
    #[serde(default, deserialize_with = "null_as_default")]
    pub score_justification: String,
    /// Percentage (0-100) for resume quality: grammar, tone, conciseness, action verbs, quantified achievements, formatting.
    #[serde(deserialize_with = "deserialize_score")]
    #[schemars(with = "u8")]
    pub quality_score: u8,
    /// One-sentence justification for the quality score.
    #[serde(default, deserialize_with = "null_as_default")]
    pub quality_score_justification: String,
    /// Top 5-10 hard skills from the job description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hard_skills: Vec<String>,
    /// Top 5-10 soft skills from the job description.
    #[serde(default, deserialize_with = "null_as_default")]
    pub soft_skills: Vec<String>,
    /// Questions that would uncover quantifiable achievements or missing experience.
    #[serde(default, deserialize_with = "null_as_default")]
    pub clarifying_questions: Vec<String>,
    #[schemars(with = "StructuredResume")]
    pub revised_resume: ResumeDocument,
    #[schemars(with = "StructuredCoverLetter")]
    pub draft_cover_letter: CoverLetterDocument,
}

impl AnalysisResult {
    /// Returns a copy with one document replaced by plain text.
    ///
    /// The other document is carried over untouched. A structured document
    /// that gets edited stays plain from then on.
    pub fn with_plain_field(&self, field: DocumentField, text: String) -> Self {
        let mut next = self.clone();
        match field {
            DocumentField::Resume => next.revised_resume = ResumeDocument::Plain(text),
            DocumentField::CoverLetter => {
                next.draft_cover_letter = CoverLetterDocument::Plain(text)
            }
        }
        next
    }
}

/// Which document a manual edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentField {
    Resume,
    CoverLetter,
}

impl DocumentField {
    /// Human-facing title shown on the edit surface.
    pub fn title(self) -> &'static str {
        match self {
            DocumentField::Resume => "Resume",
            DocumentField::CoverLetter => "Cover Letter",
        }
    }

    /// Deterministic download name of the exported document.
    pub fn export_file_name(self) -> &'static str {
        match self {
            DocumentField::Resume => "Revised-Resume.doc",
            DocumentField::CoverLetter => "Cover-Letter.doc",
        }
    }
}

/// Accepts any JSON number and clamps it into 0..=100.
///
/// The model occasionally answers 105 or 87.5; neither is worth failing the
/// whole analysis over.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    Ok(clamp_score(raw))
}

pub fn clamp_score(raw: f64) -> u8 {
    if !raw.is_finite() {
        warn!("Score {raw} is not a finite number, using 0");
        return 0;
    }
    let rounded = raw.round();
    if !(0.0..=100.0).contains(&rounded) {
        warn!("Score {raw} outside 0-100, clamping");
    }
    rounded.clamp(0.0, 100.0) as u8
}
