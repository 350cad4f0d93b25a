//! File-text extraction: turns an uploaded resume into plain text.
//!
//! PDF goes through `pdf-extract`, DOCX is unzipped and its
//! `word/document.xml` paragraphs are read with `quick-xml`, plain text is
//! decoded as UTF-8. All of it is CPU-bound; callers run it inside
//! `tokio::task::spawn_blocking`.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const TEXT_MIME: &str = "text/plain";
const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type '{0}'. Please upload a PDF, DOCX, or TXT file.")]
    UnsupportedFormat(String),

    #[error("Could not extract text from the file. It might be empty or scanned as an image.")]
    EmptyExtraction,

    #[error("Could not read the file: {0}")]
    Unreadable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Docx,
    PlainText,
}

/// Detects the format from the MIME type first, the file extension second.
pub fn detect_kind(
    file_name: Option<&str>,
    content_type: Option<&str>,
) -> Result<FileKind, ExtractionError> {
    let mime = content_type
        .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());
    match mime.as_deref() {
        Some(PDF_MIME) => return Ok(FileKind::Pdf),
        Some(DOCX_MIME) => return Ok(FileKind::Docx),
        Some(TEXT_MIME) => return Ok(FileKind::PlainText),
        _ => {}
    }

    let name = file_name.unwrap_or_default().to_ascii_lowercase();
    if name.ends_with(".pdf") {
        Ok(FileKind::Pdf)
    } else if name.ends_with(".docx") {
        Ok(FileKind::Docx)
    } else if name.ends_with(".txt") {
        Ok(FileKind::PlainText)
    } else {
        Err(ExtractionError::UnsupportedFormat(
            mime.or(file_name.map(str::to_string))
                .unwrap_or_else(|| "unknown".to_string()),
        ))
    }
}

/// Extracts the text of an uploaded file. Whitespace-only output is an error.
pub fn extract_text(
    file_name: Option<&str>,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<String, ExtractionError> {
    let text = match detect_kind(file_name, content_type)? {
        FileKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| ExtractionError::Unreadable(e.to_string()))?,
        FileKind::Docx => extract_docx(bytes)?,
        FileKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };

    if text.trim().is_empty() {
        return Err(ExtractionError::EmptyExtraction);
    }
    Ok(text)
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;

    docx_paragraphs(&xml).map(|paragraphs| paragraphs.join("\n"))
}

/// Collects the text runs of each `<w:p>` paragraph.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = true,
                b"w:tab" => current.push('\t'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:tab" => current.push('\t'),
                b"w:br" => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::Unreadable(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractionError::Unreadable(e.to_string())),
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn docx_with(body: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCX_BODY_PART, zip::write::FileOptions::default())
            .unwrap();
        writer.write_all(body.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_detect_by_mime_then_extension() {
        assert_eq!(detect_kind(None, Some("application/pdf")).unwrap(), FileKind::Pdf);
        assert_eq!(
            detect_kind(Some("cv.DOCX"), Some("application/octet-stream")).unwrap(),
            FileKind::Docx
        );
        assert_eq!(
            detect_kind(Some("cv"), Some("text/plain; charset=utf-8")).unwrap(),
            FileKind::PlainText
        );
    }

    #[test]
    fn test_unsupported_format() {
        let err = detect_kind(Some("photo.png"), Some("image/png")).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(ref t) if t == "image/png"));
    }

    #[test]
    fn test_plain_text_extraction() {
        let text = extract_text(Some("cv.txt"), None, b"Ada Lovelace\nEngineer").unwrap();
        assert_eq!(text, "Ada Lovelace\nEngineer");
    }

    #[test]
    fn test_whitespace_only_is_empty_extraction() {
        let err = extract_text(Some("cv.txt"), None, b"  \n\t ").unwrap_err();
        assert!(matches!(err, ExtractionError::EmptyExtraction));
    }

    #[test]
    fn test_docx_paragraphs_are_joined() {
        let xml = r#"<w:document><w:body>
            <w:p><w:r><w:t>Ada</w:t></w:r><w:r><w:t xml:space="preserve"> Lovelace</w:t></w:r></w:p>
            <w:p><w:r><w:t>Fish &amp; Chips</w:t><w:tab/><w:t>2024</w:t></w:r></w:p>
        </w:body></w:document>"#;
        let text = extract_text(Some("cv.docx"), None, &docx_with(xml)).unwrap();
        assert_eq!(text, "Ada Lovelace\nFish & Chips\t2024");
    }

    #[test]
    fn test_corrupt_docx_is_unreadable() {
        let err = extract_text(Some("cv.docx"), None, b"not a zip").unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(_)));
    }
}
