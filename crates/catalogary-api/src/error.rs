use thiserror::Error;

/// Top-level error type for the `catalogary-api` crate.
///
/// Covers every failure mode across both API families: transport, HTTP error
/// statuses, credential setup, and the shape checks performed while unpacking
/// positional descriptors during aggregation.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS or client-builder error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// A header name or value could not be encoded.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    // ── Authentication ──────────────────────────────────────────────
    /// Credential setup failed (token exchange, cookie injection, ...).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── HTTP status ─────────────────────────────────────────────────
    /// Error status with a diagnostic assembled from the response body.
    #[error("HTTP {status} for {url}: {message}")]
    Http {
        status: u16,
        url: String,
        message: String,
    },

    /// Error status whose body carried no usable diagnostic.
    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// A call parameter was out of range before anything was sent.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// A positional descriptor array did not have the expected shape.
    #[error("Malformed {kind} descriptor '{key}': {reason}")]
    Descriptor {
        kind: &'static str,
        key: String,
        reason: String,
    },

    /// A payload was not the JSON shape an aggregation needs.
    #[error("Unexpected payload from '{resource}': expected {expected}")]
    UnexpectedShape {
        resource: String,
        expected: &'static str,
    },

    /// A required field was missing from a payload.
    #[error("Missing field '{field}' in {resource}")]
    MissingField {
        resource: &'static str,
        field: &'static str,
    },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if this is a transient error worth retrying by the caller.
    ///
    /// The crate itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } | Self::HttpStatus { status, .. } => {
                *status == 429 || (500..600).contains(status)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_http_errors() {
        let err = Error::Http {
            status: 404,
            url: "https://example.test/x".into(),
            message: "not found".into(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.is_not_found());
        assert!(!err.is_transient());
    }

    #[test]
    fn server_errors_are_transient() {
        let err = Error::HttpStatus {
            status: 503,
            url: "https://example.test/x".into(),
        };
        assert!(err.is_transient());
        assert!(!err.is_not_found());
    }

    #[test]
    fn descriptor_error_names_the_key() {
        let err = Error::Descriptor {
            kind: "station",
            key: "DEBB021".into(),
            reason: "expected at least 9 fields, got 4".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("station"));
        assert!(msg.contains("DEBB021"));
    }
}
