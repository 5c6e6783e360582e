//! Error types for management-API operations.
//!
//! Every fatal condition bubbles up to the invocation boundary as an
//! [`Error`]; nothing is swallowed or retried inside the library. A caller
//! wanting resilience re-runs the whole reconciliation, which every
//! operation is designed to tolerate.

use std::fmt;

/// Result type alias for management-API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the management API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required input is missing for the selected operation.
    ///
    /// Detected before any network call is made (e.g. no config entity on
    /// the create path, no API id on update/remove, no plan id on delete).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// The management API answered with a non-success status.
    ///
    /// Anything outside 200/201/204 aborts the invocation; the raw response
    /// body is the error message.
    #[error("HTTP {status}: {body}")]
    Http {
        /// Status code returned by the server.
        status: u16,
        /// Raw response body, surfaced verbatim.
        body: String,
    },

    /// The request never produced a response (connect failure, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// An ownership-transfer user filter matched zero or several users.
    #[error("ownership transfer expects exactly one matching user, found {matches}")]
    AmbiguousOwner {
        /// Number of users the filter matched.
        matches: usize,
    },

    /// A response that must carry structured data could not be decoded.
    ///
    /// Only raised where a field is required to continue (a created
    /// resource's id, the exchanged token, typed search results). Free-form
    /// bodies that fail to decode are kept as raw text instead.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Create a precondition error.
    pub fn precondition(message: impl fmt::Display) -> Self {
        Self::Precondition(message.to_string())
    }

    /// Create an invalid-response error.
    pub fn invalid_response(message: impl fmt::Display) -> Self {
        Self::InvalidResponse(message.to_string())
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        // Status codes never reach here: the agent is configured to hand
        // non-2xx responses back as responses. Whatever remains is
        // socket-level.
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_display() {
        let err = Error::precondition("api creation requires a config entity");
        assert_eq!(
            err.to_string(),
            "precondition failed: api creation requires a config entity"
        );
    }

    #[test]
    fn test_http_display_carries_raw_body() {
        let err = Error::Http {
            status: 400,
            body: "context path already exists".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("400"));
        assert!(display.contains("context path already exists"));
    }

    #[test]
    fn test_ambiguous_owner_display() {
        let err = Error::AmbiguousOwner { matches: 2 };
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn test_from_serde_json_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse_err.into();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }
}
