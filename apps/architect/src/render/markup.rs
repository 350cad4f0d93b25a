//! Interactive HTML fragments for the results page.

use crate::models::{
    AnalysisResult, ContactInfo, CoverLetterDocument, ResumeDocument, StructuredCoverLetter,
    StructuredResume,
};
use crate::render::emphasis::{expand, EmphasisStyle};
use crate::render::{escape_html, join_present, resume_sections, Section};

fn em(text: &str) -> String {
    expand(text.trim(), EmphasisStyle::Highlight)
}

fn preformatted(text: &str) -> String {
    format!("<pre class=\"document-plain\">{}</pre>", escape_html(text))
}

pub fn resume(document: &ResumeDocument) -> String {
    match document {
        ResumeDocument::Plain(text) => preformatted(text),
        ResumeDocument::Structured(resume) => structured_resume(resume),
    }
}

pub fn cover_letter(document: &CoverLetterDocument) -> String {
    match document {
        CoverLetterDocument::Plain(text) => preformatted(text),
        CoverLetterDocument::Structured(letter) => structured_cover_letter(letter),
    }
}

fn structured_resume(resume: &StructuredResume) -> String {
    let mut html = String::from("<article class=\"document resume\">");
    html.push_str(&contact_block(&resume.contact_info));

    for section in resume_sections(resume) {
        html.push_str("<section><h4>");
        html.push_str(section.heading());
        html.push_str("</h4>");
        html.push_str(&section_body(&section));
        html.push_str("</section>");
    }

    html.push_str("</article>");
    html
}

fn contact_block(contact: &ContactInfo) -> String {
    let mut html = String::from("<header class=\"contact\">");
    if !contact.name.trim().is_empty() {
        html.push_str(&format!("<h3>{}</h3>", em(&contact.name)));
    }

    let mut details: Vec<String> = [&contact.email, &contact.phone]
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .map(|v| em(v))
        .collect();
    let link = contact.profile_link.trim();
    if !link.is_empty() {
        details.push(format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Profile</a>",
            escape_html(link)
        ));
    }
    if !details.is_empty() {
        html.push_str(&format!("<p>{}</p>", details.join(" | ")));
    }
    if !contact.address.trim().is_empty() {
        html.push_str(&format!("<p>{}</p>", em(&contact.address)));
    }
    html.push_str("</header>");
    html
}

fn entry(title: &str, dates: &str, subtitle: &str, bullets: &[String]) -> String {
    let mut html = String::from("<div class=\"entry\"><div class=\"entry-head\">");
    html.push_str(&format!("<strong>{}</strong>", em(title)));
    if !dates.trim().is_empty() {
        html.push_str(&format!("<span class=\"dates\">{}</span>", em(dates)));
    }
    html.push_str("</div>");
    if !subtitle.is_empty() {
        html.push_str(&format!("<div class=\"entry-sub\">{}</div>", em(subtitle)));
    }
    html.push_str(&bullet_list(bullets));
    html.push_str("</div>");
    html
}

fn bullet_list(items: &[String]) -> String {
    let items: Vec<String> = items
        .iter()
        .filter(|b| !b.trim().is_empty())
        .map(|b| format!("<li>{}</li>", em(b)))
        .collect();
    if items.is_empty() {
        String::new()
    } else {
        format!("<ul>{}</ul>", items.concat())
    }
}

fn section_body(section: &Section<'_>) -> String {
    match section {
        Section::Summary(summary) => format!("<p>{}</p>", em(summary)),
        Section::Experience(entries) => entries
            .iter()
            .map(|e| {
                let place = join_present([e.organization.as_str(), e.location.as_str()], ", ");
                entry(&e.title, &e.dates, &place, &e.bullets)
            })
            .collect(),
        Section::Projects(entries) => entries
            .iter()
            .map(|p| entry(&p.title, &p.dates, "", &p.bullets))
            .collect(),
        Section::Education(entries) => entries
            .iter()
            .map(|e| entry(&e.degree, &e.dates, e.institution.trim(), &e.details))
            .collect(),
        Section::Publications(entries) => entries
            .iter()
            .map(|p| entry(&p.title, &p.dates, p.organization.trim(), &p.bullets))
            .collect(),
        Section::Skills(sets) => {
            let rows: String = sets
                .iter()
                .map(|set| {
                    let skills = set
                        .skills
                        .iter()
                        .filter(|s| !s.trim().is_empty())
                        .map(|s| em(s))
                        .collect::<Vec<_>>()
                        .join(", ");
                    if set.category.trim().is_empty() {
                        format!("<p>{skills}</p>")
                    } else {
                        format!("<p><strong>{}:</strong> {skills}</p>", em(&set.category))
                    }
                })
                .collect();
            rows
        }
    }
}

fn structured_cover_letter(letter: &StructuredCoverLetter) -> String {
    let contact = &letter.contact_info;
    let mut html = String::from("<article class=\"document cover-letter\">");

    let sender: Vec<String> = [&contact.name, &contact.address, &contact.email, &contact.phone]
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .map(|v| em(v))
        .collect();
    if !sender.is_empty() {
        html.push_str(&format!(
            "<div class=\"sender\" style=\"text-align: right\">{}</div>",
            sender.join("<br>")
        ));
    }
    if !letter.date.trim().is_empty() {
        html.push_str(&format!("<p class=\"date\">{}</p>", em(&letter.date)));
    }

    let recipient: Vec<String> = [&letter.recipient_name, &letter.recipient_organization]
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .map(|v| em(v))
        .collect();
    if !recipient.is_empty() {
        html.push_str(&format!("<div class=\"recipient\">{}</div>", recipient.join("<br>")));
    }

    let salutation = match letter.recipient_name.trim() {
        "" => "Hiring Manager",
        name => name,
    };
    html.push_str(&format!("<p><strong>Dear {},</strong></p>", em(salutation)));

    for paragraph in letter.body.iter().filter(|p| !p.trim().is_empty()) {
        html.push_str(&format!(
            "<p style=\"text-align: justify\">{}</p>",
            em(paragraph)
        ));
    }

    let signoff: Vec<String> = [&letter.closing, &contact.name]
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .map(|v| em(v))
        .collect();
    if !signoff.is_empty() {
        html.push_str(&format!("<p class=\"closing\">{}</p>", signoff.join("<br>")));
    }

    html.push_str("</article>");
    html
}

/// Scores, justifications, keyword chips and, when questions exist, a next-steps prompt.
pub fn overview(result: &AnalysisResult) -> String {
    let mut html = String::from("<section class=\"overview\">");

    for (label, score, justification) in [
        (
            "Suitability Score",
            result.suitability_score,
            &result.score_justification,
        ),
        (
            "Quality Score",
            result.quality_score,
            &result.quality_score_justification,
        ),
    ] {
        html.push_str(&format!(
            "<div class=\"score\"><h4>{label}</h4><span class=\"score-value\">{score}%</span><p>{}</p></div>",
            escape_html(justification.trim())
        ));
    }

    for (label, keywords) in [
        ("Hard Skills", &result.hard_skills),
        ("Soft Skills", &result.soft_skills),
    ] {
        let chips: String = keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .map(|k| format!("<li class=\"chip\">{}</li>", escape_html(k.trim())))
            .collect();
        html.push_str(&format!(
            "<div class=\"keywords\"><h4>{label}</h4><ul class=\"chips\">{chips}</ul></div>"
        ));
    }

    if !result.clarifying_questions.is_empty() {
        html.push_str(
            "<div class=\"next-steps\"><h4>Next steps</h4>\
             <p>Answer a few questions so the AI can strengthen your application.</p></div>",
        );
    }

    html.push_str("</section>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::client::{parse_analysis, tests::analysis_json};
    use crate::render::plain_text;
    use crate::render::tests::full_resume;

    fn headings(html: &str) -> Vec<String> {
        html.split("<h4>")
            .skip(1)
            .filter_map(|rest| rest.split("</h4>").next())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_flattened_text_keeps_markup_section_order() {
        let mut resume = full_resume();
        for variant in 0..3 {
            match variant {
                1 => resume.publications.clear(),
                2 => resume.projects.clear(),
                _ => {}
            }
            let document = ResumeDocument::Structured(resume.clone());
            let html = super::resume(&document);
            let text = plain_text::resume(&document);

            let from_markup: Vec<String> = headings(&html).iter().map(|h| h.to_uppercase()).collect();
            let lines: Vec<&str> = text.lines().collect();
            let from_text: Vec<String> = lines
                .windows(2)
                .filter(|pair| pair[1].starts_with("-----"))
                .map(|pair| pair[0].to_string())
                .collect();
            assert_eq!(from_markup, from_text);
        }
    }

    #[test]
    fn test_emphasis_is_highlighted_and_text_escaped() {
        let mut resume = full_resume();
        resume.summary = "Built <script> **fast** APIs".to_string();
        let html = super::resume(&ResumeDocument::Structured(resume));
        assert!(html.contains("Built &lt;script&gt; <mark class=\"ai-edit\">fast</mark> APIs"));
        assert!(!html.contains("<script>"));
        assert!(!html.contains("**"));
    }

    #[test]
    fn test_profile_link_is_labelled_anchor() {
        let html = super::resume(&ResumeDocument::Structured(full_resume()));
        assert!(html.contains(
            "<a href=\"https://example.com/ada\" target=\"_blank\" rel=\"noopener noreferrer\">Profile</a>"
        ));
    }

    #[test]
    fn test_plain_document_is_preformatted() {
        let html = super::resume(&ResumeDocument::Plain("Line <1>\n**Line 2**".to_string()));
        assert_eq!(
            html,
            "<pre class=\"document-plain\">Line &lt;1&gt;\n**Line 2**</pre>"
        );
    }

    #[test]
    fn test_cover_letter_markup() {
        let result = parse_analysis(&analysis_json("Hi")).unwrap();
        let html = super::cover_letter(&result.draft_cover_letter);
        assert!(html.contains("<p><strong>Dear Hiring Manager,</strong></p>"));
        assert!(html.contains("<mark class=\"ai-edit\">I built</mark> engines."));
        assert!(html.contains("Sincerely,<br>Ada Lovelace"));
        assert!(html.contains("text-align: right"));
    }

    #[test]
    fn test_overview_next_steps_only_with_questions() {
        let mut result = parse_analysis(&analysis_json("Hi")).unwrap();
        let html = overview(&result);
        assert!(html.contains("<span class=\"score-value\">81%</span>"));
        assert!(html.contains("<li class=\"chip\">Rust</li>"));
        assert!(html.contains("Next steps"));

        result.clarifying_questions.clear();
        assert!(!overview(&result).contains("Next steps"));
    }
}
