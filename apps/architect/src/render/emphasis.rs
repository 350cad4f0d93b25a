//! Emphasis expander for the `**text**` convention.
//!
//! A delimited span must close on the same line; an unmatched `**` is kept
//! as literal text.

use crate::render::escape_html;

const DELIMITER: &str = "**";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub emphasized: bool,
}

/// How emphasized spans are written out as HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmphasisStyle {
    /// Interactive view: highlighted so AI changes stand out.
    Highlight,
    /// Exported document: a native bold span.
    Strong,
}

/// Splits `text` into plain and emphasized spans, delimiters removed.
pub fn split_emphasis(text: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut plain_start = 0;
    let mut cursor = 0;

    while let Some(rel_open) = text[cursor..].find(DELIMITER) {
        let open = cursor + rel_open;
        let inner_start = open + DELIMITER.len();
        match text[inner_start..].find(DELIMITER) {
            Some(rel_close) if !text[inner_start..inner_start + rel_close].contains('\n') => {
                let close = inner_start + rel_close;
                if plain_start < open {
                    spans.push(Span {
                        text: &text[plain_start..open],
                        emphasized: false,
                    });
                }
                spans.push(Span {
                    text: &text[inner_start..close],
                    emphasized: true,
                });
                cursor = close + DELIMITER.len();
                plain_start = cursor;
            }
            _ => cursor = inner_start,
        }
    }

    if plain_start < text.len() {
        spans.push(Span {
            text: &text[plain_start..],
            emphasized: false,
        });
    }
    spans
}

/// Escapes `text` for HTML and wraps each emphasized span per `style`.
pub fn expand(text: &str, style: EmphasisStyle) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    for span in split_emphasis(text) {
        let escaped = escape_html(span.text);
        match (span.emphasized, style) {
            (false, _) => out.push_str(&escaped),
            (true, EmphasisStyle::Highlight) => {
                out.push_str("<mark class=\"ai-edit\">");
                out.push_str(&escaped);
                out.push_str("</mark>");
            }
            (true, EmphasisStyle::Strong) => {
                out.push_str("<strong>");
                out.push_str(&escaped);
                out.push_str("</strong>");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emphasized_count(text: &str) -> usize {
        split_emphasis(text).iter().filter(|s| s.emphasized).count()
    }

    fn concatenated(text: &str) -> String {
        split_emphasis(text).iter().map(|s| s.text).collect()
    }

    #[test]
    fn test_balanced_pairs_yield_one_span_each_and_preserve_content() {
        let cases = [
            ("plain text", 0),
            ("**all bold**", 1),
            ("Led **5** engineers to **ship** v2", 2),
            ("**a****b**", 2),
            ("start **x** middle **y** end **z**", 3),
            ("", 0),
        ];
        for (text, pairs) in cases {
            assert_eq!(emphasized_count(text), pairs, "{text:?}");
            assert_eq!(concatenated(text), text.replace("**", ""), "{text:?}");
        }
    }

    #[test]
    fn test_spans_alternate_in_order() {
        let spans = split_emphasis("Built **fast** APIs");
        assert_eq!(
            spans,
            vec![
                Span { text: "Built ", emphasized: false },
                Span { text: "fast", emphasized: true },
                Span { text: " APIs", emphasized: false },
            ]
        );
    }

    #[test]
    fn test_unmatched_delimiter_is_literal() {
        let spans = split_emphasis("Rating: 5** stars");
        assert_eq!(spans.len(), 1);
        assert!(!spans[0].emphasized);
        assert_eq!(spans[0].text, "Rating: 5** stars");
    }

    #[test]
    fn test_emphasis_does_not_span_lines() {
        let spans = split_emphasis("**e** and **b\nc**");
        assert_eq!(spans.iter().filter(|s| s.emphasized).count(), 1);
        assert_eq!(spans[0], Span { text: "e", emphasized: true });
        assert_eq!(spans.last().unwrap().text, " and **b\nc**");
    }

    #[test]
    fn test_multibyte_text_is_split_on_char_boundaries() {
        let spans = split_emphasis("Café **naïve** résumé");
        assert_eq!(spans[1], Span { text: "naïve", emphasized: true });
    }

    #[test]
    fn test_expand_styles_and_escapes() {
        assert_eq!(
            expand("Use **<b>** & more", EmphasisStyle::Strong),
            "Use <strong>&lt;b&gt;</strong> &amp; more"
        );
        assert_eq!(
            expand("**New**", EmphasisStyle::Highlight),
            "<mark class=\"ai-edit\">New</mark>"
        );
    }
}
