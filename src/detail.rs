//! # Detail Resolution & Summarization Controller
//!
//! ## Purpose
//! Owns the per-case detail lifecycle: fetching the full document content
//! when a result row is activated, optionally requesting an on-demand
//! summary, and tracking independent state for each. The selected case is
//! an owned optional value with an explicit open/close lifecycle; it is
//! never shared back into the raw result list.
//!
//! ## State Machines
//! - Detail: `Idle → Resolving → {Resolved | ResolvedFallback}`
//! - Summary: `NoSummary → Summarizing → {Summarized | SummaryFailed}`
//!
//! ## Failure policy
//! A failed content fetch degrades silently to the summary-level record
//! (`ResolvedFallback`); it is not a user-visible error. A failed
//! summarization is visible but scoped to the detail view and never touches
//! the underlying case data.
//!
//! Like the query dispatcher, every request is a begin/finish event pair
//! with a per-lifecycle sequence number; completions for a superseded or
//! dismissed selection are discarded silently.

use crate::api::{CaseLawBackend, DocumentContent};
use crate::errors::Result;
use crate::highlight::{highlight, Segment};
use crate::CaseResult;
use tracing::{debug, info, warn};

/// Detail-resolution state for the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailState {
    /// No case is open
    #[default]
    Idle,
    /// Content fetch in flight
    Resolving,
    /// Full content merged over the summary-level record
    Resolved,
    /// Content fetch failed; showing the summary-level record unchanged
    ResolvedFallback,
}

/// Summarization state for the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryState {
    /// No summary requested yet
    #[default]
    NoSummary,
    /// Summarization request in flight
    Summarizing,
    /// Summary text available
    Summarized,
    /// Summarization failed; error message stored, no summary text
    SummaryFailed,
}

/// Ticket for one in-flight content fetch
#[derive(Debug, Clone)]
pub struct DetailTicket {
    seq: u64,
    /// Source-document identifier the fetch is keyed by
    pub doc_id: String,
}

/// Ticket for one in-flight summarization request
#[derive(Debug, Clone)]
pub struct SummaryTicket {
    seq: u64,
    /// Source-document identifier the request is keyed by
    pub doc_id: String,
}

/// Preferred rendition of the full content, most specific first
#[derive(Debug, PartialEq, Eq)]
pub enum ContentView<'a> {
    /// Externally hosted document view
    External(&'a str),
    /// Inline trusted-HTML content
    InlineHtml(&'a str),
    /// Plain text, term-highlighted
    Excerpt(Vec<Segment>),
}

/// The case currently open in detail view, with its two state machines
#[derive(Default)]
pub struct DetailSession {
    case: Option<CaseResult>,
    detail_state: DetailState,
    summary: Option<String>,
    summary_error: Option<String>,
    summary_state: SummaryState,
    detail_seq: u64,
    summary_seq: u64,
}

impl DetailSession {
    /// A controller with nothing selected
    pub fn new() -> Self {
        Self::default()
    }

    /// Activate a result row.
    ///
    /// The selection initially equals the summary-level record; summary
    /// state and any prior error are reset unconditionally.
    pub fn open(&mut self, case: CaseResult) -> DetailTicket {
        let doc_id = case.doc_id.clone();
        self.case = Some(case);
        self.detail_state = DetailState::Resolving;
        self.summary = None;
        self.summary_error = None;
        self.summary_state = SummaryState::NoSummary;
        self.detail_seq += 1;
        self.summary_seq += 1;

        debug!(seq = self.detail_seq, doc_id = %doc_id, "detail resolution started");
        DetailTicket {
            seq: self.detail_seq,
            doc_id,
        }
    }

    /// Apply a content-fetch completion.
    ///
    /// On success the fetched fields are merged over the selection, fetched
    /// fields winning on conflict. On failure the summary-level record is
    /// kept unchanged; the degradation is silent.
    pub fn finish_open(&mut self, ticket: DetailTicket, outcome: Result<DocumentContent>) {
        if ticket.seq != self.detail_seq {
            debug!(
                stale = ticket.seq,
                current = self.detail_seq,
                "discarding stale detail completion"
            );
            return;
        }
        let Some(case) = self.case.as_mut() else {
            return;
        };

        match outcome {
            Ok(doc) => {
                case.absorb(doc);
                self.detail_state = DetailState::Resolved;
                self.summary_state = SummaryState::NoSummary;
                info!(doc_id = %ticket.doc_id, "detail resolved");
            }
            Err(e) => {
                self.detail_state = DetailState::ResolvedFallback;
                debug!(
                    doc_id = %ticket.doc_id,
                    category = e.category(),
                    "content fetch failed, falling back to summary-level record: {}", e
                );
            }
        }
    }

    /// Begin a summarization request.
    ///
    /// Only valid once the detail fetch has settled (resolved or fallback);
    /// returns `None` otherwise. Clears any prior summary and error.
    pub fn begin_summarize(&mut self) -> Option<SummaryTicket> {
        if !matches!(
            self.detail_state,
            DetailState::Resolved | DetailState::ResolvedFallback
        ) {
            return None;
        }
        let doc_id = self.case.as_ref()?.doc_id.clone();

        self.summary = None;
        self.summary_error = None;
        self.summary_state = SummaryState::Summarizing;
        self.summary_seq += 1;

        debug!(seq = self.summary_seq, doc_id = %doc_id, "summarization requested");
        Some(SummaryTicket {
            seq: self.summary_seq,
            doc_id,
        })
    }

    /// Apply a summarization completion.
    pub fn finish_summarize(&mut self, ticket: SummaryTicket, outcome: Result<String>) {
        if ticket.seq != self.summary_seq {
            debug!(
                stale = ticket.seq,
                current = self.summary_seq,
                "discarding stale summary completion"
            );
            return;
        }

        match outcome {
            Ok(summary) => {
                self.summary = Some(summary);
                self.summary_state = SummaryState::Summarized;
                info!(doc_id = %ticket.doc_id, "summary stored");
            }
            Err(e) => {
                self.summary_error = Some(e.to_string());
                self.summary_state = SummaryState::SummaryFailed;
                warn!(doc_id = %ticket.doc_id, category = e.category(), "summarization failed: {}", e);
            }
        }
    }

    /// Open a case and wait for its content fetch to settle.
    pub async fn resolve(&mut self, backend: &dyn CaseLawBackend, case: CaseResult) {
        let ticket = self.open(case);
        let outcome = backend.fetch_document(&ticket.doc_id).await;
        self.finish_open(ticket, outcome);
    }

    /// Request a summary and wait for it to settle.
    pub async fn summarize(&mut self, backend: &dyn CaseLawBackend) {
        let Some(ticket) = self.begin_summarize() else {
            return;
        };
        let outcome = backend.summarize(&ticket.doc_id).await;
        self.finish_summarize(ticket, outcome);
    }

    /// Dismiss the detail view, clearing the selection, summary text and
    /// summary error unconditionally.
    pub fn dismiss(&mut self) {
        self.case = None;
        self.detail_state = DetailState::Idle;
        self.summary = None;
        self.summary_error = None;
        self.summary_state = SummaryState::NoSummary;
        // In-flight completions for the dismissed selection must not apply
        self.detail_seq += 1;
        self.summary_seq += 1;
    }

    /// The preferred rendition of the open case's content:
    /// external document view, then inline HTML, then highlighted text.
    pub fn content_view(&self, query: &str) -> Option<ContentView<'_>> {
        let case = self.case.as_ref()?;
        if let Some(url) = case.file_url.as_deref() {
            return Some(ContentView::External(url));
        }
        if let Some(html) = case.html_content.as_deref() {
            return Some(ContentView::InlineHtml(html));
        }
        let text = case.content.as_deref().unwrap_or(&case.chunk);
        Some(ContentView::Excerpt(highlight(text, query)))
    }

    /// The case currently open, if any
    pub fn case(&self) -> Option<&CaseResult> {
        self.case.as_ref()
    }

    /// Current detail-resolution state
    pub fn detail_state(&self) -> DetailState {
        self.detail_state
    }

    /// Current summarization state
    pub fn summary_state(&self) -> SummaryState {
        self.summary_state
    }

    /// Stored summary text, when summarization succeeded
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// User-facing summarization error, when it failed
    pub fn summary_error(&self) -> Option<&str> {
        self.summary_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClientError;

    fn sample_case() -> CaseResult {
        CaseResult {
            id: "1".to_string(),
            doc_id: "doc-1".to_string(),
            chunk: "matched excerpt".to_string(),
            headline: "summary headline".to_string(),
            judgement_type: "civil".to_string(),
            court: Some("shalom".to_string()),
            ..CaseResult::default()
        }
    }

    fn transport_err() -> ClientError {
        ClientError::Transport {
            details: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_open_enters_resolving_and_resets_summary() {
        let mut session = DetailSession::new();
        let _ = session.open(sample_case());
        assert_eq!(session.detail_state(), DetailState::Resolving);
        assert_eq!(session.summary_state(), SummaryState::NoSummary);
        assert_eq!(session.case().unwrap().doc_id, "doc-1");
    }

    #[test]
    fn test_successful_resolution_merges_fetched_fields() {
        let mut session = DetailSession::new();
        let ticket = session.open(sample_case());
        session.finish_open(
            ticket,
            Ok(DocumentContent {
                content: Some("full judgement text".to_string()),
                headline: Some("resolved headline".to_string()),
                ..DocumentContent::default()
            }),
        );

        assert_eq!(session.detail_state(), DetailState::Resolved);
        let case = session.case().unwrap();
        assert_eq!(case.content.as_deref(), Some("full judgement text"));
        assert_eq!(case.headline, "resolved headline");
        // Fields absent from the fetch keep their summary-level values
        assert_eq!(case.court.as_deref(), Some("shalom"));
    }

    #[test]
    fn test_failed_resolution_falls_back_silently() {
        let mut session = DetailSession::new();
        let ticket = session.open(sample_case());
        session.finish_open(ticket, Err(transport_err()));

        assert_eq!(session.detail_state(), DetailState::ResolvedFallback);
        let case = session.case().unwrap();
        assert_eq!(case.headline, "summary headline");
        assert_eq!(case.content, None);
        // The degradation carries no user-visible error
        assert_eq!(session.summary_error(), None);
    }

    #[test]
    fn test_summarize_requires_settled_detail() {
        let mut session = DetailSession::new();
        assert!(session.begin_summarize().is_none(), "idle");

        let _ = session.open(sample_case());
        assert!(session.begin_summarize().is_none(), "still resolving");
    }

    #[test]
    fn test_summarize_success_and_failure() {
        let mut session = DetailSession::new();
        let ticket = session.open(sample_case());
        session.finish_open(ticket, Ok(DocumentContent::default()));

        let ticket = session.begin_summarize().unwrap();
        assert_eq!(session.summary_state(), SummaryState::Summarizing);
        session.finish_summarize(ticket, Ok("the court held that ...".to_string()));
        assert_eq!(session.summary_state(), SummaryState::Summarized);
        assert_eq!(session.summary(), Some("the court held that ..."));

        // A repeat request clears the prior summary before completing
        let ticket = session.begin_summarize().unwrap();
        assert_eq!(session.summary(), None);
        session.finish_summarize(
            ticket,
            Err(ClientError::Application {
                message: "Document not found".to_string(),
            }),
        );
        assert_eq!(session.summary_state(), SummaryState::SummaryFailed);
        assert_eq!(session.summary(), None);
        assert_eq!(session.summary_error(), Some("Document not found"));
        // Case data is untouched by summarization failures
        assert_eq!(session.case().unwrap().doc_id, "doc-1");
    }

    #[test]
    fn test_summarize_allowed_after_fallback() {
        let mut session = DetailSession::new();
        let ticket = session.open(sample_case());
        session.finish_open(ticket, Err(transport_err()));
        assert!(session.begin_summarize().is_some());
    }

    #[test]
    fn test_dismiss_clears_everything() {
        let mut session = DetailSession::new();
        let ticket = session.open(sample_case());
        session.finish_open(ticket, Ok(DocumentContent::default()));
        let ticket = session.begin_summarize().unwrap();
        session.finish_summarize(ticket, Ok("summary".to_string()));

        session.dismiss();
        assert_eq!(session.detail_state(), DetailState::Idle);
        assert_eq!(session.summary_state(), SummaryState::NoSummary);
        assert!(session.case().is_none());
        assert_eq!(session.summary(), None);
        assert_eq!(session.summary_error(), None);
    }

    #[test]
    fn test_stale_detail_completion_is_discarded() {
        let mut session = DetailSession::new();
        let first = session.open(sample_case());

        let mut second_case = sample_case();
        second_case.doc_id = "doc-2".to_string();
        let second = session.open(second_case);

        // The first selection's fetch resolves late
        session.finish_open(
            first,
            Ok(DocumentContent {
                content: Some("first case text".to_string()),
                ..DocumentContent::default()
            }),
        );
        assert_eq!(session.detail_state(), DetailState::Resolving);
        assert_eq!(session.case().unwrap().content, None);

        session.finish_open(second, Ok(DocumentContent::default()));
        assert_eq!(session.detail_state(), DetailState::Resolved);
    }

    #[test]
    fn test_completion_after_dismiss_is_discarded() {
        let mut session = DetailSession::new();
        let ticket = session.open(sample_case());
        session.dismiss();
        session.finish_open(ticket, Ok(DocumentContent::default()));
        assert_eq!(session.detail_state(), DetailState::Idle);
        assert!(session.case().is_none());
    }

    #[test]
    fn test_content_view_preference_order() {
        let mut session = DetailSession::new();
        let mut case = sample_case();
        case.content = Some("plain text".to_string());
        case.html_content = Some("<p>html</p>".to_string());
        case.file_url = Some("https://files/doc-1.pdf".to_string());
        let ticket = session.open(case);
        session.finish_open(ticket, Ok(DocumentContent::default()));

        match session.content_view("text").unwrap() {
            ContentView::External(url) => assert_eq!(url, "https://files/doc-1.pdf"),
            other => panic!("expected external view, got {:?}", other),
        }
    }

    #[test]
    fn test_content_view_falls_back_to_highlighted_excerpt() {
        let mut session = DetailSession::new();
        let ticket = session.open(sample_case());
        session.finish_open(ticket, Err(transport_err()));

        match session.content_view("matched").unwrap() {
            ContentView::Excerpt(segments) => {
                assert!(segments.iter().any(|s| s.is_match()));
            }
            other => panic!("expected excerpt view, got {:?}", other),
        }
    }
}
