//! # Query Dispatcher Module
//!
//! ## Purpose
//! Owns the search lifecycle: query submission, loading/error state, the raw
//! result set, the facet selection and the disclosure window. Everything the
//! result-list surface renders is derived from this session.
//!
//! ## Input/Output Specification
//! - **Input**: Query submissions, facet toggles, "load more" requests,
//!   search completions
//! - **Output**: A `ResultView` — the filtered, paginated prefix of the raw
//!   result list plus its counts
//! - **Failure policy**: A failed search stores a user-facing message and
//!   leaves previously displayed results untouched
//!
//! Each submission is a begin/finish event pair around the network
//! suspension point. Tickets carry a monotonically increasing sequence
//! number; a completion is applied only when its ticket is still the newest
//! issued, so a stale response arriving after a newer submission is
//! discarded silently.

use crate::api::{CaseLawBackend, SearchMode, SearchOutcome};
use crate::errors::Result;
use crate::filter::{filter_results, FilterSelection};
use crate::highlight::{highlight, Segment};
use crate::pager::Pager;
use crate::CaseResult;
use tracing::{debug, info, warn};

/// Ticket for one in-flight search request
#[derive(Debug, Clone)]
pub struct SearchTicket {
    seq: u64,
    /// The trimmed query this request carries
    pub query: String,
    /// The ranking mode this request targets
    pub mode: SearchMode,
}

/// Derived view over the session: the exposed prefix of the filtered list
#[derive(Debug)]
pub struct ResultView<'a> {
    /// Visible result rows, in original server rank order
    pub items: Vec<&'a CaseResult>,
    /// Count of results passing the active facet predicates
    pub filtered_count: usize,
    /// Whether a "load more" affordance should be offered
    pub has_more: bool,
}

/// Search session state
#[derive(Default)]
pub struct SearchSession {
    query: String,
    results: Vec<CaseResult>,
    total: usize,
    has_searched: bool,
    loading: bool,
    error: Option<String>,
    filters: FilterSelection,
    pager: Pager,
    seq: u64,
}

impl SearchSession {
    /// A session with no results and an unrestricted filter selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a search submission.
    ///
    /// Returns `None` without touching any state when the query trims to
    /// empty. Otherwise stores the trimmed query, enters the loading state,
    /// clears any prior error and issues a ticket for the request.
    pub fn begin_search(&mut self, query: &str, mode: SearchMode) -> Option<SearchTicket> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }

        self.query = trimmed.to_string();
        self.loading = true;
        self.error = None;
        self.seq += 1;

        debug!(seq = self.seq, query = %self.query, "search submitted");
        Some(SearchTicket {
            seq: self.seq,
            query: self.query.clone(),
            mode,
        })
    }

    /// Apply a search completion.
    ///
    /// Stale tickets (superseded by a newer submission) are discarded
    /// silently. On success the raw result set and total are replaced and
    /// the disclosure window resets; on failure the message is stored and
    /// previously displayed results stay untouched.
    pub fn finish_search(&mut self, ticket: SearchTicket, outcome: Result<SearchOutcome>) {
        if ticket.seq != self.seq {
            debug!(
                stale = ticket.seq,
                current = self.seq,
                "discarding stale search completion"
            );
            return;
        }

        self.loading = false;
        match outcome {
            Ok(outcome) => {
                info!(
                    results = outcome.results.len(),
                    total = outcome.total,
                    "search completed"
                );
                self.results = outcome.results;
                self.total = outcome.total;
                self.has_searched = true;
                self.pager.reset();
            }
            Err(e) => {
                warn!(category = e.category(), "search failed: {}", e);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Submit a query and wait for its completion.
    pub async fn submit(&mut self, backend: &dyn CaseLawBackend, query: &str) {
        self.submit_with_mode(backend, query, SearchMode::Lexical)
            .await
    }

    /// Submit a query against the chosen ranking mode.
    pub async fn submit_with_mode(
        &mut self,
        backend: &dyn CaseLawBackend,
        query: &str,
        mode: SearchMode,
    ) {
        let Some(ticket) = self.begin_search(query, mode) else {
            return;
        };
        let outcome = backend.search(ticket.mode, &ticket.query).await;
        self.finish_search(ticket, outcome);
    }

    /// Toggle a year facet; resets the disclosure window.
    pub fn toggle_year(&mut self, year: &str) {
        self.filters.toggle_year(year);
        self.pager.reset();
    }

    /// Toggle the court facet; resets the disclosure window.
    pub fn toggle_court(&mut self, court: &str) {
        self.filters.toggle_court(court);
        self.pager.reset();
    }

    /// Toggle the topic facet; resets the disclosure window.
    pub fn toggle_topic(&mut self, topic: &str) {
        self.filters.toggle_topic(topic);
        self.pager.reset();
    }

    /// Toggle the district facet; resets the disclosure window.
    pub fn toggle_district(&mut self, district: &str) {
        self.filters.toggle_district(district);
        self.pager.reset();
    }

    /// Clear every facet; resets the disclosure window.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.pager.reset();
    }

    /// Disclose one more page of the filtered list.
    pub fn load_more(&mut self) -> bool {
        let filtered_len = filter_results(&self.results, &self.filters).len();
        self.pager.load_more(filtered_len)
    }

    /// Derive the current result view: filtered subsequence, truncated to
    /// the visible prefix. Recomputed on every call, never cached.
    pub fn view(&self) -> ResultView<'_> {
        let filtered = filter_results(&self.results, &self.filters);
        let filtered_count = filtered.len();
        let visible = self.pager.visible_in(filtered_count);
        ResultView {
            items: filtered.into_iter().take(visible).collect(),
            filtered_count,
            has_more: self.pager.has_more(filtered_count),
        }
    }

    /// Annotate a text field of an exposed item with the submitted query.
    pub fn highlight_field(&self, text: &str) -> Vec<Segment> {
        highlight(text, &self.query)
    }

    /// The active trimmed query
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The raw, unfiltered result list
    pub fn results(&self) -> &[CaseResult] {
        &self.results
    }

    /// Server-reported total for the last successful search
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether any search has completed successfully
    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// Whether a submission is awaiting completion
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The user-facing message of the last failed search, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Read-only access to the active facet selection
    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClientError;

    fn outcome(n: usize, year: u32) -> SearchOutcome {
        let results = (0..n)
            .map(|i| CaseResult {
                id: format!("{}-{}", year, i),
                doc_id: format!("doc-{}-{}", year, i),
                chunk: format!("excerpt {}", i),
                decision_date: Some(format!("1.1.{}", year)),
                judgement_type: "civil".to_string(),
                ..CaseResult::default()
            })
            .collect::<Vec<_>>();
        let total = results.len();
        SearchOutcome { results, total }
    }

    #[test]
    fn test_blank_query_is_rejected_without_state_change() {
        let mut session = SearchSession::new();
        assert!(session.begin_search("   ", SearchMode::Lexical).is_none());
        assert!(!session.is_loading());
        assert!(!session.has_searched());
    }

    #[test]
    fn test_successful_search_populates_session() {
        let mut session = SearchSession::new();
        let ticket = session.begin_search("  damages  ", SearchMode::Lexical).unwrap();
        assert_eq!(ticket.query, "damages");
        assert!(session.is_loading());

        session.finish_search(ticket, Ok(outcome(25, 2020)));
        assert!(!session.is_loading());
        assert!(session.has_searched());
        assert_eq!(session.total(), 25);
        assert_eq!(session.view().items.len(), 10);
    }

    #[test]
    fn test_failed_search_keeps_previous_results() {
        let mut session = SearchSession::new();
        let ticket = session.begin_search("damages", SearchMode::Lexical).unwrap();
        session.finish_search(ticket, Ok(outcome(5, 2021)));

        let ticket = session.begin_search("negligence", SearchMode::Lexical).unwrap();
        assert!(session.error().is_none());
        session.finish_search(
            ticket,
            Err(ClientError::Server {
                status: 500,
                body: "boom".to_string(),
            }),
        );

        assert!(!session.is_loading());
        assert!(session.error().unwrap().contains("500"));
        assert_eq!(session.results().len(), 5, "prior results must survive");
    }

    #[test]
    fn test_stale_completion_is_discarded() {
        let mut session = SearchSession::new();
        let first = session.begin_search("first", SearchMode::Lexical).unwrap();
        let second = session.begin_search("second", SearchMode::Lexical).unwrap();

        // The older response resolves after the newer submission
        session.finish_search(first, Ok(outcome(3, 2019)));
        assert!(session.is_loading(), "stale completion must not apply");
        assert_eq!(session.results().len(), 0);

        session.finish_search(second, Ok(outcome(7, 2020)));
        assert!(!session.is_loading());
        assert_eq!(session.results().len(), 7);
    }

    #[test]
    fn test_new_search_resets_disclosure_window() {
        let mut session = SearchSession::new();
        let ticket = session.begin_search("q", SearchMode::Lexical).unwrap();
        session.finish_search(ticket, Ok(outcome(30, 2020)));
        session.load_more();
        assert_eq!(session.view().items.len(), 20);

        let ticket = session.begin_search("q2", SearchMode::Lexical).unwrap();
        session.finish_search(ticket, Ok(outcome(30, 2021)));
        assert_eq!(session.view().items.len(), 10);
    }

    #[test]
    fn test_facet_change_resets_pagination() {
        let mut session = SearchSession::new();
        let ticket = session.begin_search("q", SearchMode::Lexical).unwrap();
        session.finish_search(ticket, Ok(outcome(30, 2020)));
        session.load_more();
        assert_eq!(session.view().items.len(), 20);

        session.toggle_year("2020");
        assert_eq!(session.view().items.len(), 10);
        session.clear_filters();
        assert_eq!(session.view().items.len(), 10);
    }

    #[test]
    fn test_filtered_count_is_view_length_source() {
        let mut session = SearchSession::new();
        let ticket = session.begin_search("q", SearchMode::Lexical).unwrap();

        let mut results = outcome(10, 2019).results;
        results.extend(outcome(8, 2020).results);
        results.extend(outcome(7, 2021).results);
        let total = results.len();
        session.finish_search(ticket, Ok(SearchOutcome { results, total }));

        // Scenario: 25 cases over {2019, 2020, 2021}; select {2020, 2021}
        session.toggle_year("2020");
        session.toggle_year("2021");
        let view = session.view();
        assert_eq!(view.filtered_count, 15);
        assert_eq!(view.items.len(), 10);
        assert!(view.has_more);

        assert!(session.load_more());
        let view = session.view();
        assert_eq!(view.items.len(), 15);
        assert!(!view.has_more);

        session.clear_filters();
        let view = session.view();
        assert_eq!(view.filtered_count, 25);
        assert_eq!(view.items.len(), 10);
    }

    #[test]
    fn test_view_preserves_rank_order() {
        let mut session = SearchSession::new();
        let ticket = session.begin_search("q", SearchMode::Lexical).unwrap();
        session.finish_search(ticket, Ok(outcome(12, 2020)));

        let view = session.view();
        let ids: Vec<&str> = view.items.iter().map(|c| c.id.as_str()).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("2020-{}", i)).collect();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_highlight_field_uses_submitted_query() {
        let mut session = SearchSession::new();
        let ticket = session.begin_search("smith", SearchMode::Lexical).unwrap();
        session.finish_search(ticket, Ok(outcome(1, 2020)));

        let segments = session.highlight_field("Smith v. Jones");
        assert!(segments.iter().any(|s| s.is_match()));
    }
}
