//! # Term Highlighter Module
//!
//! ## Purpose
//! Pure text-annotation utility that marks every occurrence of the search
//! query inside a text field, for emphasis in whatever surface renders the
//! result list.
//!
//! ## Input/Output Specification
//! - **Input**: Raw source text and the submitted query string
//! - **Output**: Ordered segments covering the whole input, each tagged
//!   matched or plain
//! - **Matching**: Case-insensitive, global, literal substring
//!
//! The query is always treated as a literal: regex metacharacters are
//! escaped before the pattern is built, so `res.`, `a+b` or `(` never
//! produce malformed patterns or wildcard matches. Matching is
//! Unicode-aware and never splits a multi-byte sequence; Hebrew and other
//! RTL text pass through intact. Highlighting is always applied to raw
//! source text, never to an already-segmented output.

use regex::RegexBuilder;

/// One span of annotated text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text outside any query match
    Plain(String),
    /// A case-insensitive occurrence of the query, in its original casing
    Matched(String),
}

impl Segment {
    /// The underlying text of the segment
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain(t) | Segment::Matched(t) => t,
        }
    }

    /// Whether this segment is a query match
    pub fn is_match(&self) -> bool {
        matches!(self, Segment::Matched(_))
    }
}

/// Split `text` into plain and matched segments for the given query.
///
/// An empty query yields the text unchanged as a single plain segment.
pub fn highlight(text: &str, query: &str) -> Vec<Segment> {
    if query.is_empty() {
        return vec![Segment::Plain(text.to_string())];
    }

    let pattern = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            // Escaped literals only fail on pathological pattern sizes;
            // degrade to an unhighlighted rendition rather than erroring.
            tracing::warn!("highlight pattern rejected: {}", e);
            return vec![Segment::Plain(text.to_string())];
        }
    };

    let mut segments = Vec::new();
    let mut cursor = 0;
    for m in pattern.find_iter(text) {
        if m.start() > cursor {
            segments.push(Segment::Plain(text[cursor..m.start()].to_string()));
        }
        segments.push(Segment::Matched(m.as_str().to_string()));
        cursor = m.end();
    }
    if cursor < text.len() || segments.is_empty() {
        segments.push(Segment::Plain(text[cursor..].to_string()));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn joined(segments: &[Segment]) -> String {
        segments.iter().map(Segment::text).collect()
    }

    #[test]
    fn test_empty_query_returns_text_unchanged() {
        let segments = highlight("Smith v. Jones", "");
        assert_eq!(segments, vec![Segment::Plain("Smith v. Jones".to_string())]);
    }

    #[test]
    fn test_case_insensitive_match() {
        let segments = highlight("Smith v. Jones", "smith");
        assert_eq!(
            segments,
            vec![
                Segment::Matched("Smith".to_string()),
                Segment::Plain(" v. Jones".to_string()),
            ]
        );
    }

    #[test]
    fn test_global_match_preserves_original_casing() {
        let segments = highlight("Tax law and TAX policy", "tax");
        let matched: Vec<&str> = segments
            .iter()
            .filter(|s| s.is_match())
            .map(|s| s.text())
            .collect();
        assert_eq!(matched, vec!["Tax", "TAX"]);
        assert_eq!(joined(&segments), "Tax law and TAX policy");
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let segments = highlight("see sec. 12(a) of the act", "12(a)");
        assert!(segments.iter().any(|s| s.is_match()));
        // A bare dot must not act as a wildcard
        let segments = highlight("rest arrest", "r.st");
        assert!(segments.iter().all(|s| !s.is_match()));
    }

    #[test]
    fn test_hebrew_text_is_not_corrupted() {
        let text = "פסק דין בעניין חופש העיסוק";
        let segments = highlight(text, "חופש");
        assert_eq!(joined(&segments), text);
        assert!(segments.iter().any(|s| s.is_match() && s.text() == "חופש"));
    }

    #[test]
    fn test_no_match_yields_single_plain_segment() {
        let segments = highlight("headline", "zzz");
        assert_eq!(segments, vec![Segment::Plain("headline".to_string())]);
    }

    #[test]
    fn test_segments_cover_entire_input() {
        let text = "aaa bbb aaa";
        assert_eq!(joined(&highlight(text, "aaa")), text);
        assert_eq!(joined(&highlight(text, "bbb")), text);
    }
}
