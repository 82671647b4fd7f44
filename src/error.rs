//! Error types for the bahn.de gateway and the surrounding tooling.
//!
//! Every gateway operation returns a classified [`ApiError`]: the TUI stores
//! these per panel and renders them inline, the CLI prints them and exits
//! non-zero. Variants carry enough context to be useful as a one-line
//! message without a backtrace.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Classified failure of a gateway operation.
///
/// HTTP statuses map onto dedicated variants: 404 → [`ApiError::NotFound`],
/// 400 → [`ApiError::InvalidRequest`], 5xx → [`ApiError::Server`]; every
/// other non-200 status becomes [`ApiError::Status`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Client-side shape violation (empty query, unparseable station token).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Transport-level failure: connection refused, DNS, TLS.
    #[error("network error: {0}")]
    Network(String),

    /// The per-call deadline elapsed before a response arrived.
    #[error("request timed out")]
    Timeout,

    /// The resource does not exist upstream (unknown journey id, HTTP 404).
    #[error("not found ({endpoint})")]
    NotFound { endpoint: String },

    /// Upstream 5xx.
    #[error("server error {status} ({endpoint})")]
    Server { status: u16, endpoint: String },

    /// Any other non-200 status.
    #[error("API error {status} ({endpoint})")]
    Status { status: u16, endpoint: String },

    /// Well-formed HTTP response with a body we could not decode.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-200 HTTP status for `endpoint`.
    pub fn from_status(status: u16, endpoint: &str) -> Self {
        match status {
            404 => ApiError::NotFound {
                endpoint: endpoint.to_string(),
            },
            400 => ApiError::InvalidRequest(format!("rejected by {endpoint}")),
            s if s >= 500 => ApiError::Server {
                status: s,
                endpoint: endpoint.to_string(),
            },
            s => ApiError::Status {
                status: s,
                endpoint: endpoint.to_string(),
            },
        }
    }

    /// Classify a transport error from the HTTP client.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err.to_string())
        }
    }
}
