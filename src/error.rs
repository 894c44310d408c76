//! Error types for the TronGrid client
//!
//! Every public API returns `Result<T, Error>`. Variants are grouped by the
//! failure class callers act on; see [`ErrorKind`].

use thiserror::Error;

/// The main error type for the TronGrid client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Cancellation
    // ============================================================================
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Rate limiter failed: {0}")]
    RateLimited(#[source] Box<Error>),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Service rejected request: {message}")]
    ServiceRejected { message: String },

    #[error("No data in response: {context}")]
    NoData { context: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Cancelled by the caller's token or timed out
    CancelledOrTimedOut,
    /// Connection, DNS, IO or non-2xx status
    Transport,
    /// Malformed or schema-mismatched body
    Decode,
    /// Well-formed body that reported `success: false`
    ServiceRejected,
    /// Anything else (limiter, config, empty payload)
    Other,
}

impl Error {
    /// Create a service rejection error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::ServiceRejected {
            message: message.into(),
        }
    }

    /// Create a no-data error
    pub fn no_data(context: impl Into<String>) -> Self {
        Self::NoData {
            context: context.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Cancelled | Error::Timeout { .. } => ErrorKind::CancelledOrTimedOut,
            Error::Http(e) if e.is_timeout() => ErrorKind::CancelledOrTimedOut,
            Error::Http(e) if e.is_decode() => ErrorKind::Decode,
            Error::Http(_) | Error::HttpStatus { .. } | Error::InvalidUrl(_) => {
                ErrorKind::Transport
            }
            Error::Decode(_) => ErrorKind::Decode,
            Error::ServiceRejected { .. } => ErrorKind::ServiceRejected,
            Error::RateLimited(inner) => match inner.kind() {
                ErrorKind::CancelledOrTimedOut => ErrorKind::CancelledOrTimedOut,
                _ => ErrorKind::Other,
            },
            Error::NoData { .. } | Error::Config { .. } => ErrorKind::Other,
        }
    }

    /// Check if this error came from cancellation or a timeout
    pub fn is_cancelled_or_timed_out(&self) -> bool {
        self.kind() == ErrorKind::CancelledOrTimedOut
    }

    /// Check if a caller-side retry could plausibly succeed
    ///
    /// The client itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the TronGrid client
pub type Result<T> = std::result::Result<T, Error>;
