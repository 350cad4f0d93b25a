//! Plain-text flattening.
//!
//! Emphasis delimiters are kept as-is so an edited document still carries the
//! `**` markers the renderers understand.

use crate::models::{
    ContactInfo, CoverLetterDocument, ResumeDocument, StructuredCoverLetter, StructuredResume,
};
use crate::render::{join_present, resume_sections, Section};

const UNDERLINE: &str = "-----------------";

pub fn resume(document: &ResumeDocument) -> String {
    match document {
        ResumeDocument::Plain(text) => text.clone(),
        ResumeDocument::Structured(resume) => structured_resume(resume),
    }
}

pub fn cover_letter(document: &CoverLetterDocument) -> String {
    match document {
        CoverLetterDocument::Plain(text) => text.clone(),
        CoverLetterDocument::Structured(letter) => structured_cover_letter(letter),
    }
}

fn structured_resume(resume: &StructuredResume) -> String {
    let mut blocks = Vec::new();

    let header = contact_header(&resume.contact_info);
    if !header.is_empty() {
        blocks.push(header);
    }

    for section in resume_sections(resume) {
        let mut block = format!("{}\n{UNDERLINE}", section.heading().to_uppercase());
        for line in section_lines(&section) {
            block.push('\n');
            block.push_str(&line);
        }
        blocks.push(block);
    }

    blocks.join("\n\n")
}

fn contact_header(contact: &ContactInfo) -> String {
    let details = join_present(
        [
            contact.email.as_str(),
            contact.phone.as_str(),
            contact.profile_link.as_str(),
        ],
        " | ",
    );
    join_present(
        [contact.name.as_str(), details.as_str(), contact.address.as_str()],
        "\n",
    )
}

fn section_lines(section: &Section<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    match section {
        Section::Summary(summary) => lines.push(summary.to_string()),
        Section::Experience(entries) => {
            for exp in entries {
                let place = join_present([exp.organization.as_str(), exp.location.as_str()], ", ");
                let mut line = format!("* {}", exp.title.trim());
                if !place.is_empty() {
                    line.push_str(&format!(" at {place}"));
                }
                push_dates(&mut line, &exp.dates);
                lines.push(line);
                push_bullets(&mut lines, &exp.bullets);
            }
        }
        Section::Projects(entries) => {
            for project in entries {
                let mut line = format!("* {}", project.title.trim());
                push_dates(&mut line, &project.dates);
                lines.push(line);
                push_bullets(&mut lines, &project.bullets);
            }
        }
        Section::Education(entries) => {
            for edu in entries {
                let mut line = format!(
                    "* {}",
                    join_present([edu.degree.as_str(), edu.institution.as_str()], ", ")
                );
                push_dates(&mut line, &edu.dates);
                lines.push(line);
                push_bullets(&mut lines, &edu.details);
            }
        }
        Section::Publications(entries) => {
            for publication in entries {
                let mut line = format!(
                    "* {}",
                    join_present(
                        [publication.title.as_str(), publication.organization.as_str()],
                        " - "
                    )
                );
                push_dates(&mut line, &publication.dates);
                lines.push(line);
                push_bullets(&mut lines, &publication.bullets);
            }
        }
        Section::Skills(sets) => {
            for set in sets {
                let skills = join_present(set.skills.iter().map(String::as_str), ", ");
                if set.category.trim().is_empty() {
                    lines.push(skills);
                } else {
                    lines.push(format!("{}: {skills}", set.category.trim()));
                }
            }
        }
    }
    lines
}

fn push_dates(line: &mut String, dates: &str) {
    if !dates.trim().is_empty() {
        line.push_str(&format!(" ({})", dates.trim()));
    }
}

fn push_bullets(lines: &mut Vec<String>, bullets: &[String]) {
    lines.extend(
        bullets
            .iter()
            .filter(|b| !b.trim().is_empty())
            .map(|b| format!("  - {}", b.trim())),
    );
}

fn structured_cover_letter(letter: &StructuredCoverLetter) -> String {
    let contact = &letter.contact_info;
    let mut blocks = vec![
        join_present([contact.name.as_str(), contact.address.as_str()], "\n"),
        letter.date.trim().to_string(),
        join_present(
            [
                letter.recipient_name.as_str(),
                letter.recipient_organization.as_str(),
            ],
            "\n",
        ),
    ];

    let recipient = letter.recipient_name.trim();
    blocks.push(if recipient.is_empty() {
        "Dear Hiring Manager,".to_string()
    } else {
        format!("Dear {recipient},")
    });

    blocks.extend(letter.body.iter().map(|p| p.trim().to_string()));
    blocks.push(join_present(
        [letter.closing.as_str(), contact.name.as_str()],
        "\n",
    ));

    blocks.retain(|b| !b.is_empty());
    blocks.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::full_resume;

    #[test]
    fn test_plain_documents_pass_through_unchanged() {
        let text = "  My resume\n**kept** as-is  ";
        assert_eq!(resume(&ResumeDocument::Plain(text.to_string())), text);
        assert_eq!(
            cover_letter(&CoverLetterDocument::Plain(text.to_string())),
            text
        );
    }

    #[test]
    fn test_structured_resume_flattening() {
        let text = resume(&ResumeDocument::Structured(full_resume()));
        let expected = "\
Ada Lovelace
ada@example.com | 555-0100 | https://example.com/ada
London, UK

SUMMARY
-----------------
**Analytical** engineer.

WORK EXPERIENCE
-----------------
* Engineer at Analytical Engines, London (1842-1843)
  - **Designed** the first algorithm

PROJECTS
-----------------
* Note G (1843)
  - Computed Bernoulli numbers

EDUCATION
-----------------
* Mathematics, Private tutoring (1830s)
  - Studied under De Morgan

PUBLICATIONS
-----------------
* Sketch of the Analytical Engine - Taylor's Scientific Memoirs (1843)

SKILLS
-----------------
Technical: Mathematics, **Rust**";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_cover_letter_flattening() {
        let letter = StructuredCoverLetter {
            contact_info: ContactInfo {
                name: "Ada Lovelace".to_string(),
                address: "London, UK".to_string(),
                ..Default::default()
            },
            date: "1 May 2025".to_string(),
            recipient_name: "Hiring Manager".to_string(),
            recipient_organization: "Babbage Ltd".to_string(),
            body: vec!["I am writing to apply.".to_string(), "**I built** engines.".to_string()],
            closing: "Sincerely,".to_string(),
        };
        let text = cover_letter(&CoverLetterDocument::Structured(letter));
        assert_eq!(
            text,
            "Ada Lovelace\nLondon, UK\n\n1 May 2025\n\nHiring Manager\nBabbage Ltd\n\n\
             Dear Hiring Manager,\n\nI am writing to apply.\n\n**I built** engines.\n\n\
             Sincerely,\nAda Lovelace"
        );
    }
}
