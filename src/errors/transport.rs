//! Error types for outbound HTTP calls.

use std::time::Duration;

/// Errors from HTTP requests made to block explorers and chain list sources.
///
/// URLs stored in these errors are stripped of their query string so API
/// keys never end up in logs.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The remote answered with a non-200 status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Redacted request URL
        url: String,
        /// The HTTP status code
        status: u16,
    },

    /// The request did not complete within the configured timeout.
    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout {
        /// Redacted request URL
        url: String,
        /// The timeout that elapsed
        timeout: Duration,
    },

    /// Connection or protocol failure before a response was received.
    #[error("Request to {url} failed")]
    Request {
        /// Redacted request URL
        url: String,
        /// The underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The response body could not be decoded as JSON.
    #[error("Invalid JSON body from {url}")]
    Body {
        /// Redacted request URL
        url: String,
        /// The underlying decode error
        #[source]
        source: reqwest::Error,
    },
}

impl TransportError {
    /// Classifies a `reqwest` send error as a timeout or a generic failure.
    pub fn from_send(url: &str, timeout: Duration, source: reqwest::Error) -> Self {
        let url = redact_url(url);
        if source.is_timeout() {
            TransportError::Timeout { url, timeout }
        } else {
            TransportError::Request { url, source }
        }
    }

    /// Helper to create a `Body` error.
    pub fn body(url: &str, source: reqwest::Error) -> Self {
        TransportError::Body {
            url: redact_url(url),
            source,
        }
    }

    /// Helper to create a `Status` error.
    pub fn status(url: &str, status: u16) -> Self {
        TransportError::Status {
            url: redact_url(url),
            status,
        }
    }
}

/// Drops the query string and fragment of a URL.
pub(crate) fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => raw.split(&['?', '#'][..]).next().unwrap_or_default().to_string(),
    }
}
