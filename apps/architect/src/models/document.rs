//! Typed shapes for resumes and cover letters.
//!
//! The same types drive three things: deserialization of LLM replies, the
//! response schema handed to the LLM (derived via `schemars`, see
//! `llm_client::schema`), and rendering. Field doc comments end up in the
//! schema as per-field guidance for the model, so keep them model-facing.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit `null` like a missing field.
///
/// Struct-level `#[serde(default)]` only covers absent keys; the model also
/// sends `"publications": null` for sections it has nothing for.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Contact block shared by the resume and the cover letter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfo {
    /// User's full name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// User's email address.
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    /// User's phone number.
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    /// URL of the user's professional profile (e.g. LinkedIn).
    #[serde(deserialize_with = "null_as_default")]
    pub profile_link: String,
    /// User's city and state/country.
    #[serde(deserialize_with = "null_as_default")]
    pub address: String,
}

/// A dated entry with bullets. Used for jobs, projects and publications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Experience {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Employer, university, journal or conference.
    #[serde(deserialize_with = "null_as_default")]
    pub organization: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dates: String,
    /// Bullet points starting with action verbs. Mark every changed span with **bold** markdown.
    #[serde(deserialize_with = "null_as_default")]
    pub bullets: Vec<String>,
}

impl Experience {
    /// An entry with no title, no organization and no bullets carries nothing to render.
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
            && self.organization.trim().is_empty()
            && self.bullets.iter().all(|b| b.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Education {
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dates: String,
    /// Details such as GPA or relevant modules. Mark every changed span with **bold** markdown.
    #[serde(deserialize_with = "null_as_default")]
    pub details: Vec<String>,
}

impl Education {
    pub fn is_blank(&self) -> bool {
        self.degree.trim().is_empty()
            && self.institution.trim().is_empty()
            && self.details.iter().all(|d| d.trim().is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillSet {
    /// e.g. "Technical Skills", "Soft Skills".
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    /// Skills in this category. Mark every changed span with **bold** markdown.
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
}

/// A resume broken into sections.
///
/// Every array defaults to empty when absent; an empty array means the
/// section is omitted from rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredResume {
    #[serde(deserialize_with = "null_as_default")]
    pub contact_info: ContactInfo,
    /// A 2-4 sentence professional summary tailored to the job.
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub publications: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<SkillSet>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StructuredCoverLetter {
    #[serde(deserialize_with = "null_as_default")]
    pub contact_info: ContactInfo,
    /// Today's date.
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    /// e.g. "Hiring Manager".
    #[serde(deserialize_with = "null_as_default")]
    pub recipient_name: String,
    /// Company name from the job description.
    #[serde(deserialize_with = "null_as_default")]
    pub recipient_organization: String,
    /// Paragraphs of the letter. Mark every changed span with **bold** markdown.
    #[serde(deserialize_with = "null_as_default")]
    pub body: Vec<String>,
    /// e.g. "Sincerely,".
    #[serde(deserialize_with = "null_as_default")]
    pub closing: String,
}

/// A resume is either structured or, after a manual edit or a degraded
/// reply, an opaque block of text.
///
/// Serialized untagged: an object for the structured variant, a bare string
/// for the plain one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResumeDocument {
    Structured(StructuredResume),
    Plain(String),
}

/// Cover-letter counterpart of [`ResumeDocument`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoverLetterDocument {
    Structured(StructuredCoverLetter),
    Plain(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_arrays_default_to_empty() {
        let json = serde_json::json!({
            "contactInfo": {"name": "Ada Lovelace"},
            "summary": "Analyst."
        });
        let resume: StructuredResume = serde_json::from_value(json).unwrap();
        assert_eq!(resume.contact_info.name, "Ada Lovelace");
        assert!(resume.experience.is_empty());
        assert!(resume.publications.is_empty());
        assert!(resume.skills.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = serde_json::json!({
            "title": "Engineer",
            "organization": "Acme",
            "bullets": ["Built things"],
            "favouriteColour": "green"
        });
        let exp: Experience = serde_json::from_value(json).unwrap();
        assert_eq!(exp.title, "Engineer");
        assert_eq!(exp.bullets, vec!["Built things".to_string()]);
    }

    #[test]
    fn test_resume_document_object_is_structured() {
        let json = serde_json::json!({"summary": "Hello"});
        let doc: ResumeDocument = serde_json::from_value(json).unwrap();
        assert!(matches!(doc, ResumeDocument::Structured(ref r) if r.summary == "Hello"));
    }

    #[test]
    fn test_resume_document_string_is_plain() {
        let doc: ResumeDocument = serde_json::from_str("\"Just text\"").unwrap();
        assert_eq!(doc, ResumeDocument::Plain("Just text".to_string()));
    }

    #[test]
    fn test_plain_cover_letter_serializes_as_bare_string() {
        let doc = CoverLetterDocument::Plain("Dear team".to_string());
        assert_eq!(serde_json::to_string(&doc).unwrap(), "\"Dear team\"");
    }

    #[test]
    fn test_null_sections_and_fields_become_defaults() {
        let json = serde_json::json!({
            "contactInfo": {"name": "Ada", "phone": null},
            "summary": null,
            "experience": [{"title": "Engineer", "bullets": null}],
            "publications": null,
            "skills": null
        });
        let resume: StructuredResume = serde_json::from_value(json).unwrap();
        assert_eq!(resume.contact_info.name, "Ada");
        assert_eq!(resume.contact_info.phone, "");
        assert_eq!(resume.summary, "");
        assert!(resume.experience[0].bullets.is_empty());
        assert!(resume.publications.is_empty());
        assert!(resume.skills.is_empty());
    }

    #[test]
    fn test_null_contact_info_keeps_document_structured() {
        let json = serde_json::json!({"contactInfo": null, "summary": "Hello"});
        let doc: ResumeDocument = serde_json::from_value(json).unwrap();
        assert!(matches!(doc, ResumeDocument::Structured(ref r) if r.contact_info == ContactInfo::default()));

        let json = serde_json::json!({"body": null, "closing": "Sincerely,"});
        let letter: CoverLetterDocument = serde_json::from_value(json).unwrap();
        assert!(matches!(letter, CoverLetterDocument::Structured(ref l) if l.body.is_empty()));
    }

    #[test]
    fn test_blank_experience_detection() {
        assert!(Experience::default().is_blank());
        let exp = Experience {
            bullets: vec!["Shipped v2".to_string()],
            ..Default::default()
        };
        assert!(!exp.is_blank());
    }
}
