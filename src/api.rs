//! # Remote API Client Module
//!
//! ## Purpose
//! HTTP client for the three JSON endpoints of the case-law search service:
//! lexical/semantic search, full-document retrieval, and on-demand
//! summarization. All endpoints are POST with `application/json` bodies
//! against a fixed base location.
//!
//! ## Input/Output Specification
//! - **Input**: Query strings and source-document identifiers
//! - **Output**: Deserialized result lists, document content, summaries
//! - **Failure mapping**: transport errors and non-2xx statuses become
//!   `ClientError::Transport` / `ClientError::Server`; a summarization
//!   response with `success: false` becomes `ClientError::Application`
//!
//! The search response envelope is accepted in both shapes the service
//! emits: a bare result array, or an object with `results` and an optional
//! `total`. No authentication, pagination parameters or rate-limit headers
//! are part of the contract; the client paginates locally.

use crate::config::Config;
use crate::errors::{ClientError, Result};
use crate::CaseResult;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Which ranking the search endpoint applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Keyword match ranking
    #[default]
    Lexical,
    /// Embedding similarity ranking
    Semantic,
}

impl SearchMode {
    fn path(self) -> &'static str {
        match self {
            SearchMode::Lexical => "/api/lexical_search",
            SearchMode::Semantic => "/api/semantic_search",
        }
    }
}

impl std::str::FromStr for SearchMode {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "lexical" => Ok(SearchMode::Lexical),
            "semantic" => Ok(SearchMode::Semantic),
            other => Err(ClientError::Config {
                message: format!("unknown search mode '{}'", other),
            }),
        }
    }
}

/// Search request payload
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
}

/// Document / summarization request payload
#[derive(Debug, Serialize)]
struct DocRequest<'a> {
    doc_id: &'a str,
}

/// Search response in any of the shapes the service emits: a wrapped
/// result list, a bare array, or a well-formed error object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchEnvelope {
    Wrapped {
        results: Vec<CaseResult>,
        #[serde(default)]
        total: Option<usize>,
    },
    Bare(Vec<CaseResult>),
    Failed {
        error: String,
    },
}

/// Normalized search outcome
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Result list in server rank order
    pub results: Vec<CaseResult>,
    /// Server-reported total, falling back to the list length
    pub total: usize,
}

impl SearchEnvelope {
    fn into_outcome(self) -> Result<SearchOutcome> {
        match self {
            SearchEnvelope::Wrapped { results, total } => {
                let total = total.unwrap_or(results.len());
                Ok(SearchOutcome { results, total })
            }
            SearchEnvelope::Bare(results) => {
                let total = results.len();
                Ok(SearchOutcome { results, total })
            }
            SearchEnvelope::Failed { error } => {
                Err(ClientError::Application { message: error })
            }
        }
    }
}

/// Full-document fields returned by `/api/get_file_content`.
///
/// Every field is optional: absent fields never erase what the search hit
/// already carried.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentContent {
    /// Explicit failure message for a well-formed 200 response
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub html_content: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub judges: Option<String>,
    #[serde(default)]
    pub decision_date: Option<String>,
    #[serde(default)]
    pub judgement_type: Option<String>,
}

impl CaseResult {
    /// Merge fetched document fields over this summary-level record.
    /// Fetched fields win on conflict; absent fields leave the record alone.
    pub fn absorb(&mut self, doc: DocumentContent) {
        if let Some(content) = doc.content {
            self.content = Some(content);
        }
        if let Some(html) = doc.html_content {
            self.html_content = Some(html);
        }
        if let Some(url) = doc.file_url {
            self.file_url = Some(url);
        }
        if let Some(headline) = doc.headline {
            self.headline = headline;
        }
        if let Some(court) = doc.court {
            self.court = Some(court);
        }
        if let Some(judges) = doc.judges {
            self.judges = Some(judges);
        }
        if let Some(date) = doc.decision_date {
            self.decision_date = Some(date);
        }
        if let Some(kind) = doc.judgement_type {
            self.judgement_type = kind;
        }
    }
}

/// Summarization response payload
#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Seam between the lifecycle controllers and the remote service, so tests
/// can substitute an in-memory backend.
#[async_trait]
pub trait CaseLawBackend: Send + Sync {
    /// Run a search in the given mode
    async fn search(&self, mode: SearchMode, query: &str) -> Result<SearchOutcome>;
    /// Fetch the full content of one document
    async fn fetch_document(&self, doc_id: &str) -> Result<DocumentContent>;
    /// Request an on-demand summary of one document
    async fn summarize(&self, doc_id: &str) -> Result<String>;
}

/// HTTP client for the search service
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_seconds))
            .user_agent("lawsearch-client/0.1")
            .build()
            .map_err(|e| ClientError::Transport {
                details: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Server {
                status: status.as_u16(),
                body: crate::truncate_for_display(&body, 200),
            });
        }

        let payload = response.json::<T>().await?;
        Ok(payload)
    }
}

#[async_trait]
impl CaseLawBackend for ApiClient {
    async fn search(&self, mode: SearchMode, query: &str) -> Result<SearchOutcome> {
        let envelope: SearchEnvelope = self
            .post(mode.path(), &SearchRequest { query })
            .await?;
        envelope.into_outcome()
    }

    async fn fetch_document(&self, doc_id: &str) -> Result<DocumentContent> {
        let doc: DocumentContent = self
            .post("/api/get_file_content", &DocRequest { doc_id })
            .await?;
        if let Some(message) = doc.error {
            return Err(ClientError::Application { message });
        }
        Ok(doc)
    }

    async fn summarize(&self, doc_id: &str) -> Result<String> {
        let response: SummarizeResponse = self
            .post("/api/summarize_document", &DocRequest { doc_id })
            .await?;

        if !response.success {
            return Err(ClientError::Application {
                message: response
                    .error
                    .unwrap_or_else(|| "summarization failed".to_string()),
            });
        }

        Ok(response.summary.unwrap_or_default())
    }
}
