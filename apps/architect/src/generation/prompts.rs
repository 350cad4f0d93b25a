//! Deterministic prompt assembly for every LLM operation.
//!
//! Pure functions of their inputs: the same resume, job description and
//! answers always yield a byte-identical prompt.

use crate::errors::AppError;
use crate::llm_client::prompts::EMPHASIS_INSTRUCTION;
use crate::models::ImprovementAnswers;

/// Structured operations. Free-text edits go through [`compose_free_edit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOperation {
    /// Full critique, scores, questions and first drafts.
    InitialAnalysis,
    /// Incorporate answers to clarifying questions and recompute everything.
    Regeneration,
}

impl AnalysisOperation {
    pub fn system_prompt(self) -> &'static str {
        match self {
            AnalysisOperation::InitialAnalysis => INITIAL_ANALYSIS_SYSTEM,
            AnalysisOperation::Regeneration => REGENERATION_SYSTEM,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AnalysisOperation::InitialAnalysis => "initial_analysis",
            AnalysisOperation::Regeneration => "regeneration",
        }
    }
}

pub const INITIAL_ANALYSIS_SYSTEM: &str = r#"You are an elite career coach. Your purpose is to help the user land the target job by critically re-engineering their application materials into structured output.

PERSONA:
- Critical and direct: feedback is sharp, honest and actionable.
- Analytical: every recommendation is grounded in the resume and the job description.
- Expert in resume design, keyword optimization and professional communication.

WORKFLOW:
1. Analyze the resume against the job description.
2. Scores:
   - Suitability score (0-100): alignment of skills and experience with the job requirements, justified in one sentence.
   - Quality score (0-100): grammar and spelling, professional tone, conciseness, action verbs, quantified achievements, consistent formatting, justified in one sentence.
3. Extract the top 5-10 hard skills and the top 5-10 soft skills from the job description.
4. Ask 2-3 targeted clarifying questions that would uncover quantifiable achievements or missing relevant experience.
5. Revised resume:
   - Make minimal, surgical changes.
   - Inject keywords naturally; rephrase bullets to be action-oriented and results-focused.
   - CRITICAL: highlight every single change with **bold** markdown.
6. Cover letter:
   - Concise and professional, referencing 1-2 specific experiences from the revised resume.
   - Leave a placeholder such as [State where you saw the advert] for the user to fill in.
   - Sign with the user's name taken from the resume."#;

pub const REGENERATION_SYSTEM: &str = r#"You are an elite career coach. The user has answered your clarifying questions. Regenerate the structured resume and cover letter incorporating the new information.

WORKFLOW:
1. Integrate the user's answers into the resume and the cover letter. The original resume is provided for context.
2. Re-evaluate the whole application; minor additional tweaks for flow and keyword optimization are allowed.
3. Recalculate the suitability and quality scores and update both justifications for the improved content.
4. If the answers open further opportunities, ask 1-2 new clarifying questions; otherwise return an empty list of clarifying questions.
5. Output the complete updated analysis, resume and cover letter. Highlight all new changes with **bold** markdown."#;

/// Composes the prompt for a structured operation.
///
/// Answers, when present and non-blank, are rendered as a 1-indexed list
/// that follows the original question order.
pub fn compose(
    operation: AnalysisOperation,
    resume_text: &str,
    job_description: &str,
    answers: Option<&ImprovementAnswers>,
) -> Result<String, AppError> {
    if resume_text.trim().is_empty() {
        return Err(AppError::InputMissing(
            "Resume is missing. Please go back and upload it.".to_string(),
        ));
    }
    if job_description.trim().is_empty() {
        return Err(AppError::InputMissing(
            "Job description is missing. Please paste the job description.".to_string(),
        ));
    }

    let mut prompt = format!(
        "{system}\n\nINPUT DATA:\n\nUSER_RESUME:\n```\n{resume_text}\n```\n\nJOB_DESCRIPTION:\n```\n{job_description}\n```",
        system = operation.system_prompt(),
    );

    if let Some(block) = answers.and_then(render_answers) {
        prompt.push_str("\n\nUSER_ANSWERS:\n```\n");
        prompt.push_str(&block);
        prompt.push_str("\n```");
    }

    prompt.push_str("\n\nTASK:\n");
    prompt.push_str(EMPHASIS_INSTRUCTION);
    Ok(prompt)
}

/// Renders answers as `N. text` lines; `None` when nothing was answered.
fn render_answers(answers: &ImprovementAnswers) -> Option<String> {
    let lines: Vec<String> = answers
        .iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(index, text)| format!("{}. {}", index + 1, text.trim()))
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Composes the free-edit prompt: one document, one instruction, plain-text reply.
pub fn compose_free_edit(document: &str, instruction: &str) -> String {
    format!(
        "INSTRUCTION: \"{instruction}\"\n\nDOCUMENT:\n---\n{document}\n---\n\nTASK:\n\
        Rewrite the document based on the instruction. \
        Output only the revised text, without any additional commentary.",
        instruction = instruction.trim(),
    )
}
