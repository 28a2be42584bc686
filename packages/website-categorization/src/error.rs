//! Error types for the Website Categorization client.

use thiserror::Error;

use crate::types::RawResponse;

/// Result type for Website Categorization client operations.
pub type Result<T> = std::result::Result<T, CategorizationError>;

/// Boxed source error produced by a transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Website Categorization client errors.
///
/// Detection order for a single call is: argument, transport, read, then
/// parse/status/API depending on the endpoint.
#[derive(Debug, Error)]
pub enum CategorizationError {
    /// A required argument was missing or invalid. Nothing was sent.
    #[error("invalid argument: \"{name}\" {message}")]
    InvalidArgument {
        name: &'static str,
        message: &'static str,
    },

    /// Configuration error (missing API key, invalid base URL)
    #[error("configuration error: {0}")]
    Config(String),

    /// The request never completed (connection refused, timeout, TLS)
    #[error("cannot execute request: {0}")]
    Transport(#[source] BoxError),

    /// Headers arrived but the body could not be read in full
    #[error("cannot read response: {source}")]
    Read {
        status: u16,
        #[source]
        source: BoxError,
    },

    /// The body was read but does not match the expected schema
    #[error("cannot parse response: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        response: Box<RawResponse>,
    },

    /// A well-formed envelope reported a failure
    #[error("API error: [{code}] {message}")]
    Api { code: i64, message: String },

    /// Non-2xx status without a structured error body
    #[error("API failed with status code: {status}")]
    Status {
        status: u16,
        response: Box<RawResponse>,
    },
}

impl CategorizationError {
    /// The raw response that accompanied this error, when one was kept.
    ///
    /// API errors deliberately carry no raw response.
    pub fn raw_response(&self) -> Option<&RawResponse> {
        match self {
            Self::Parse { response, .. } | Self::Status { response, .. } => Some(response),
            _ => None,
        }
    }

    /// HTTP status code, when the server got far enough to send one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Read { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Parse { response, .. } => Some(response.status),
            _ => None,
        }
    }
}
