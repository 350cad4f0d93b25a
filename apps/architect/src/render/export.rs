//! Standalone export documents.
//!
//! The output is a complete HTML page with inline styles and no external
//! references, served as `application/msword` so word processors open it.

use crate::models::{
    AnalysisResult, ContactInfo, CoverLetterDocument, DocumentField, ResumeDocument,
    StructuredCoverLetter, StructuredResume,
};
use crate::render::emphasis::{expand, EmphasisStyle};
use crate::render::{escape_html, join_present, resume_sections, Section};

pub const EXPORT_CONTENT_TYPE: &str = "application/msword";

const EXPORT_STYLE: &str = "\
body { font-family: 'Times New Roman', Times, serif; font-size: 12pt; line-height: 1.4; margin: 1in; color: #000; }
h1 { text-align: center; font-size: 20pt; margin: 0 0 4pt 0; }
.header-info { text-align: center; font-size: 10pt; margin: 0 0 12pt 0; }
h2 { font-size: 13pt; text-transform: uppercase; border-bottom: 1px solid #000; padding-bottom: 2pt; margin: 14pt 0 6pt 0; }
.entry { margin-bottom: 8pt; }
.entry-head { display: flex; justify-content: space-between; font-weight: bold; }
.entry-sub { font-style: italic; }
ul { margin: 2pt 0 0 18pt; padding: 0; }
p { margin: 0 0 10pt 0; }
.sender { text-align: right; }
.letter-body p { text-align: justify; }";

/// A rendered document ready to be sent as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

/// Builds the download for one field of the current analysis.
pub fn export_field(result: &AnalysisResult, field: DocumentField) -> ExportedDocument {
    ExportedDocument {
        file_name: field.export_file_name(),
        content_type: EXPORT_CONTENT_TYPE,
        body: result.document(field).to_export_html(),
    }
}

fn strong(text: &str) -> String {
    expand(text.trim(), EmphasisStyle::Strong)
}

fn page(title: &str, content: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
         <style>\n{EXPORT_STYLE}\n</style>\n</head>\n<body>\n{content}\n</body>\n</html>\n",
        escape_html(title)
    )
}

/// Plain documents keep their line structure; emphasis still becomes bold.
fn plain_body(text: &str) -> String {
    text.lines()
        .map(|line| expand(line, EmphasisStyle::Strong))
        .collect::<Vec<_>>()
        .join("<br>\n")
}

pub fn resume(document: &ResumeDocument) -> String {
    match document {
        ResumeDocument::Plain(text) => page("Resume", &plain_body(text)),
        ResumeDocument::Structured(resume) => page("Resume", &structured_resume(resume)),
    }
}

pub fn cover_letter(document: &CoverLetterDocument) -> String {
    match document {
        CoverLetterDocument::Plain(text) => page("Cover Letter", &plain_body(text)),
        CoverLetterDocument::Structured(letter) => {
            page("Cover Letter", &structured_cover_letter(letter))
        }
    }
}

fn header(contact: &ContactInfo) -> String {
    let info: Vec<String> = [
        &contact.email,
        &contact.phone,
        &contact.profile_link,
        &contact.address,
    ]
    .into_iter()
    .filter(|v| !v.trim().is_empty())
    .map(|v| strong(v))
    .collect();

    let mut html = String::new();
    if !contact.name.trim().is_empty() {
        html.push_str(&format!("<h1>{}</h1>\n", strong(&contact.name)));
    }
    if !info.is_empty() {
        html.push_str(&format!("<p class=\"header-info\">{}</p>\n", info.join(" | ")));
    }
    html
}

fn entry(title: &str, dates: &str, subtitle: &str, bullets: &[String]) -> String {
    let mut html = format!(
        "<div class=\"entry\"><div class=\"entry-head\"><span>{}</span><span>{}</span></div>",
        strong(title),
        strong(dates)
    );
    if !subtitle.is_empty() {
        html.push_str(&format!("<div class=\"entry-sub\">{}</div>", strong(subtitle)));
    }
    let items: String = bullets
        .iter()
        .filter(|b| !b.trim().is_empty())
        .map(|b| format!("<li>{}</li>", strong(b)))
        .collect();
    if !items.is_empty() {
        html.push_str(&format!("<ul>{items}</ul>"));
    }
    html.push_str("</div>\n");
    html
}

fn structured_resume(resume: &StructuredResume) -> String {
    let mut html = header(&resume.contact_info);

    for section in resume_sections(resume) {
        html.push_str(&format!("<h2>{}</h2>\n", section.heading()));
        match &section {
            Section::Summary(summary) => {
                html.push_str(&format!("<p>{}</p>\n", strong(summary)));
            }
            Section::Experience(entries) => {
                for e in entries {
                    let place = join_present([e.organization.as_str(), e.location.as_str()], ", ");
                    html.push_str(&entry(&e.title, &e.dates, &place, &e.bullets));
                }
            }
            Section::Projects(entries) => {
                for p in entries {
                    html.push_str(&entry(&p.title, &p.dates, "", &p.bullets));
                }
            }
            Section::Education(entries) => {
                for e in entries {
                    html.push_str(&entry(&e.degree, &e.dates, e.institution.trim(), &e.details));
                }
            }
            Section::Publications(entries) => {
                for p in entries {
                    html.push_str(&entry(&p.title, &p.dates, p.organization.trim(), &p.bullets));
                }
            }
            Section::Skills(sets) => {
                for set in sets {
                    let skills = set
                        .skills
                        .iter()
                        .filter(|s| !s.trim().is_empty())
                        .map(|s| strong(s))
                        .collect::<Vec<_>>()
                        .join(", ");
                    if set.category.trim().is_empty() {
                        html.push_str(&format!("<p>{skills}</p>\n"));
                    } else {
                        html.push_str(&format!(
                            "<p><b>{}:</b> {skills}</p>\n",
                            strong(&set.category)
                        ));
                    }
                }
            }
        }
    }
    html
}

fn structured_cover_letter(letter: &StructuredCoverLetter) -> String {
    let contact = &letter.contact_info;
    let mut html = String::new();

    let sender: Vec<String> = [&contact.name, &contact.address, &contact.email, &contact.phone]
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .map(|v| strong(v))
        .collect();
    if !sender.is_empty() {
        html.push_str(&format!("<p class=\"sender\">{}</p>\n", sender.join("<br>")));
    }
    if !letter.date.trim().is_empty() {
        html.push_str(&format!("<p>{}</p>\n", strong(&letter.date)));
    }
    let recipient: Vec<String> = [&letter.recipient_name, &letter.recipient_organization]
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .map(|v| strong(v))
        .collect();
    if !recipient.is_empty() {
        html.push_str(&format!("<p>{}</p>\n", recipient.join("<br>")));
    }

    let salutation = match letter.recipient_name.trim() {
        "" => "Hiring Manager",
        name => name,
    };
    html.push_str(&format!("<p>Dear {},</p>\n<div class=\"letter-body\">\n", strong(salutation)));
    for paragraph in letter.body.iter().filter(|p| !p.trim().is_empty()) {
        html.push_str(&format!("<p>{}</p>\n", strong(paragraph)));
    }
    html.push_str("</div>\n");

    let signoff: Vec<String> = [&letter.closing, &contact.name]
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .map(|v| strong(v))
        .collect();
    if !signoff.is_empty() {
        html.push_str(&format!("<p>{}</p>\n", signoff.join("<br>")));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::client::{parse_analysis, tests::analysis_json};
    use crate::render::tests::full_resume;

    #[test]
    fn test_empty_publications_emit_no_heading() {
        let mut resume = full_resume();
        resume.publications.clear();
        let html = super::resume(&ResumeDocument::Structured(resume));
        assert!(!html.contains("Publications"));
        assert!(html.contains("<h2>Skills</h2>"));
    }

    #[test]
    fn test_null_publications_emit_no_heading() {
        let mut json = serde_json::to_value(full_resume()).unwrap();
        json["publications"] = serde_json::Value::Null;
        let document: ResumeDocument = serde_json::from_value(json).unwrap();
        assert!(matches!(document, ResumeDocument::Structured(_)));

        let html = super::resume(&document);
        assert!(!html.contains("Publications"));
        assert!(html.contains("<h2>Projects</h2>"));
        assert!(!crate::render::markup::resume(&document).contains("Publications"));
    }

    #[test]
    fn test_export_is_self_contained_serif_document() {
        let html = super::resume(&ResumeDocument::Structured(full_resume()));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("serif"));
        assert!(html.contains("<h1>Ada Lovelace</h1>"));
        assert!(!html.contains("<link"));
        assert!(!html.contains("<script"));
    }

    #[test]
    fn test_emphasis_becomes_strong() {
        let html = super::resume(&ResumeDocument::Structured(full_resume()));
        assert!(html.contains("<strong>Designed</strong> the first algorithm"));
        assert!(!html.contains("<mark"));
        assert!(!html.contains("**"));
    }

    #[test]
    fn test_plain_document_exports_line_breaks() {
        let html = super::cover_letter(&CoverLetterDocument::Plain(
            "Dear team,\n**Hired** me & you".to_string(),
        ));
        assert!(html.contains("Dear team,<br>\n<strong>Hired</strong> me &amp; you"));
    }

    #[test]
    fn test_export_field_names_and_content_type() {
        let result = parse_analysis(&analysis_json("Hi")).unwrap();
        let exported = export_field(&result, DocumentField::CoverLetter);
        assert_eq!(exported.file_name, "Cover-Letter.doc");
        assert_eq!(exported.content_type, "application/msword");
        assert!(exported.body.contains("<title>Cover Letter</title>"));

        let exported = export_field(&result, DocumentField::Resume);
        assert_eq!(exported.file_name, "Revised-Resume.doc");
    }
}
