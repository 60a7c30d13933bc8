//! # Case-Law Search Browsing Client
//!
//! ## Overview
//! This library implements the result-set lifecycle engine of a browsing
//! client for a remote legal case-law search service: free-text queries are
//! submitted to a lexical/semantic search endpoint, the returned result set
//! is narrowed with facet filters (year, court, document type, district),
//! paginated locally, term-highlighted, and individual cases can be resolved
//! in full and summarized on demand.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `api`: HTTP client for the three remote JSON endpoints
//! - `session`: Query dispatcher owning the search lifecycle and result list
//! - `filter`: Facet filter engine and the canonical filter selection type
//! - `pager`: Incremental disclosure ("load more") window over filtered results
//! - `highlight`: Case-insensitive literal term highlighter
//! - `detail`: Per-case detail resolution and summarization controller
//! - `config`: Configuration management, including the facet catalog
//! - `errors`: Centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: Free-text queries, facet selections, case activations
//! - **Output**: Filtered, paginated, highlighted result views and resolved
//!   case details with optional summaries
//! - **Remote contract**: JSON-over-HTTP POST against a fixed base location
//!
//! ## Usage
//! ```rust,no_run
//! use lawsearch_client::{api::ApiClient, config::Config, session::SearchSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config.toml")?;
//!     let client = ApiClient::new(&config)?;
//!     let mut session = SearchSession::new();
//!     session.submit(&client, "freedom of occupation").await;
//!     println!("{} results", session.view().filtered_count);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod config;
pub mod detail;
pub mod errors;
pub mod filter;
pub mod highlight;
pub mod pager;
pub mod session;

// Re-exports for convenience
pub use config::Config;
pub use errors::{ClientError, Result};
pub use filter::FilterSelection;
pub use session::SearchSession;

use serde::{Deserialize, Serialize};

/// One retrieved case record as returned by the search endpoints.
///
/// `id` and `doc_id` are assigned by the server and stay stable across
/// re-filtering; they are never regenerated by the client. Everything
/// beyond the matched excerpt may be absent until detail resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Search-hit identifier
    #[serde(default)]
    pub id: String,
    /// Source-document identifier, the key for detail resolution
    #[serde(default)]
    pub doc_id: String,
    /// Matched text excerpt
    #[serde(default)]
    pub chunk: String,
    /// Full case text, absent until resolved
    #[serde(default)]
    pub content: Option<String>,
    /// Case headline
    #[serde(default)]
    pub headline: String,
    /// Document type / topic
    #[serde(default)]
    pub judgement_type: String,
    /// Jurisdiction district
    #[serde(default)]
    pub district: Option<String>,
    /// Court name
    #[serde(default)]
    pub court: Option<String>,
    /// Presiding judge(s)
    #[serde(default)]
    pub judges: Option<String>,
    /// Free-form localized decision date; the year is the trailing 4-digit run
    #[serde(default)]
    pub decision_date: Option<String>,
    /// Lexical relevance score, passed through unmodified
    #[serde(default)]
    pub lexical_score: Option<f64>,
    /// Semantic relevance score, passed through unmodified
    #[serde(default)]
    pub semantic_score: Option<f64>,
    /// Reciprocal-rank-fusion score, passed through unmodified
    #[serde(default)]
    pub rrf_score: Option<f64>,
    /// Trusted HTML rendition of the full document, populated by resolution
    #[serde(default)]
    pub html_content: Option<String>,
    /// Externally hosted document URL, populated by resolution
    #[serde(default)]
    pub file_url: Option<String>,
}

/// Truncate text to at most `max_chars` characters for display, appending
/// an ellipsis when shortened. Never splits a multi-byte sequence.
pub fn truncate_for_display(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}
