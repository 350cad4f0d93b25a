//! Dual-mode renderer and exporter.
//!
//! Every structured resume is walked through [`resume_sections`], so the
//! interactive markup, the plain-text flattening and the export share one
//! section order.

pub mod emphasis;
pub mod export;
pub mod handlers;
pub mod markup;
pub mod plain_text;

use tracing::warn;

use crate::models::{
    AnalysisResult, CoverLetterDocument, DocumentField, Education, Experience, ResumeDocument,
    SkillSet, StructuredResume,
};

/// A non-empty resume section, in render order.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<'a> {
    Summary(&'a str),
    Experience(Vec<&'a Experience>),
    Projects(Vec<&'a Experience>),
    Education(Vec<&'a Education>),
    Publications(Vec<&'a Experience>),
    Skills(Vec<&'a SkillSet>),
}

impl Section<'_> {
    pub fn heading(&self) -> &'static str {
        match self {
            Section::Summary(_) => "Summary",
            Section::Experience(_) => "Work Experience",
            Section::Projects(_) => "Projects",
            Section::Education(_) => "Education",
            Section::Publications(_) => "Publications",
            Section::Skills(_) => "Skills",
        }
    }
}

/// Sections of `resume` that have something to show, in the fixed order
/// summary, work experience, projects, education, publications, skills.
///
/// Blank entries are dropped (and logged); a section left with no entries is
/// omitted entirely so no empty heading is ever emitted.
pub fn resume_sections(resume: &StructuredResume) -> Vec<Section<'_>> {
    let mut sections = Vec::new();

    if !resume.summary.trim().is_empty() {
        sections.push(Section::Summary(resume.summary.trim()));
    }

    let experience = renderable(&resume.experience, Experience::is_blank, "experience");
    if !experience.is_empty() {
        sections.push(Section::Experience(experience));
    }

    let projects = renderable(&resume.projects, Experience::is_blank, "projects");
    if !projects.is_empty() {
        sections.push(Section::Projects(projects));
    }

    let education = renderable(&resume.education, Education::is_blank, "education");
    if !education.is_empty() {
        sections.push(Section::Education(education));
    }

    let publications = renderable(&resume.publications, Experience::is_blank, "publications");
    if !publications.is_empty() {
        sections.push(Section::Publications(publications));
    }

    let skills = renderable(
        &resume.skills,
        |set: &SkillSet| set.skills.iter().all(|s| s.trim().is_empty()),
        "skills",
    );
    if !skills.is_empty() {
        sections.push(Section::Skills(skills));
    }

    sections
}

fn renderable<'a, T>(entries: &'a [T], is_blank: impl Fn(&T) -> bool, section: &str) -> Vec<&'a T> {
    let kept: Vec<&T> = entries.iter().filter(|entry| !is_blank(*entry)).collect();
    if kept.len() < entries.len() {
        warn!(
            "Skipping {} blank {section} entries",
            entries.len() - kept.len()
        );
    }
    kept
}

/// Non-blank parts joined by `separator`.
pub(crate) fn join_present<'a>(parts: impl IntoIterator<Item = &'a str>, separator: &str) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The three output forms every document supports.
pub trait RenderDocument {
    /// Interactive HTML fragment with AI edits highlighted.
    fn to_markup(&self) -> String;
    /// Canonical plain text, used to seed the edit buffer.
    fn to_plain_text(&self) -> String;
    /// Self-contained HTML document for download.
    fn to_export_html(&self) -> String;
}

impl RenderDocument for ResumeDocument {
    fn to_markup(&self) -> String {
        markup::resume(self)
    }

    fn to_plain_text(&self) -> String {
        plain_text::resume(self)
    }

    fn to_export_html(&self) -> String {
        export::resume(self)
    }
}

impl RenderDocument for CoverLetterDocument {
    fn to_markup(&self) -> String {
        markup::cover_letter(self)
    }

    fn to_plain_text(&self) -> String {
        plain_text::cover_letter(self)
    }

    fn to_export_html(&self) -> String {
        export::cover_letter(self)
    }
}

impl AnalysisResult {
    pub fn document(&self, field: DocumentField) -> &dyn RenderDocument {
        match field {
            DocumentField::Resume => &self.revised_resume,
            DocumentField::CoverLetter => &self.draft_cover_letter,
        }
    }
}
