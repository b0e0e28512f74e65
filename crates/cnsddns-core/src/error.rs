//! Error types for cnsddns
//!
//! Every failure inside a poll tick surfaces as one of these variants. The
//! poller logs it and moves on to the next tick; only [`Error::Config`] is
//! fatal, and only at startup.

use thiserror::Error;

/// Result type alias for cnsddns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cnsddns
#[derive(Error, Debug)]
pub enum Error {
    /// Transport or read failure while discovering the current IP
    #[error("external IP fetch failed: {0}")]
    IpFetch(String),

    /// The signing algorithm identifier is not one we can compute
    #[error("unsupported signature algorithm: {0}")]
    UnsupportedSignatureAlgorithm(String),

    /// The provider answered with a non-zero status code in its envelope
    #[error("provider error ({action}): code {code}: {message}")]
    Provider {
        /// API action that failed (e.g. "RecordList")
        action: String,
        /// Status code from the response envelope
        code: i64,
        /// Message from the response envelope
        message: String,
    },

    /// The provider's JSON did not have the expected shape
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Transport failure calling the push endpoint
    #[error("notification failed: {0}")]
    Notification(String),

    /// Local state file open/read/write/sync failure
    #[error("state persistence failed: {0}")]
    Persistence(String),

    /// Invalid or incomplete configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport failure talking to the DNS provider
    #[error("HTTP error: {0}")]
    Http(String),
}

impl Error {
    /// Create an IP fetch error
    pub fn ip_fetch(msg: impl Into<String>) -> Self {
        Self::IpFetch(msg.into())
    }

    /// Create an unsupported signature algorithm error
    pub fn unsupported_algorithm(algorithm: impl Into<String>) -> Self {
        Self::UnsupportedSignatureAlgorithm(algorithm.into())
    }

    /// Create a provider envelope error
    pub fn provider(action: impl Into<String>, code: i64, message: impl Into<String>) -> Self {
        Self::Provider {
            action: action.into(),
            code,
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}
