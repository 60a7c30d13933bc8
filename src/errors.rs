//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the case-law browsing client, covering the
//! three failure classes the remote endpoints can produce plus local
//! configuration problems.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from HTTP calls, payload decoding and config loading
//! - **Output**: Structured error types with context, suitable for user-facing display
//! - **Error Categories**: Transport, Server, Application, Configuration
//!
//! ## Key Features
//! - One error class per propagation policy: transport and server failures are
//!   raised by the HTTP layer, application failures by well-formed responses
//!   carrying an explicit failure flag (summarization)
//! - Automatic conversion from `reqwest` errors
//! - Category accessor for structured logging

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, ClientError>;

/// Error types for the case-law browsing client
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network unreachable, request aborted, or malformed response body
    #[error("transport error: {details}")]
    Transport { details: String },

    /// Endpoint responded with a non-2xx status
    #[error("server returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// Well-formed response carrying an explicit failure flag
    #[error("{message}")]
    Application { message: String },

    /// Configuration loading or validation errors
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl ClientError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ClientError::Transport { .. } => "transport",
            ClientError::Server { .. } => "server",
            ClientError::Application { .. } => "application",
            ClientError::Config { .. } => "configuration",
        }
    }

    /// Whether a user-initiated repeat of the same action may succeed.
    /// No automatic retries are performed anywhere in the client.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ClientError::Transport { .. } | ClientError::Server { .. }
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport {
            details: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Transport {
            details: format!("malformed response body: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        let e = ClientError::Server {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(e.category(), "server");
        assert!(e.is_recoverable());

        let e = ClientError::Application {
            message: "Document not found".to_string(),
        };
        assert_eq!(e.category(), "application");
        assert!(!e.is_recoverable());
    }

    #[test]
    fn test_display_is_user_facing() {
        let e = ClientError::Application {
            message: "summarization failed".to_string(),
        };
        assert_eq!(e.to_string(), "summarization failed");
    }
}
