//! Per-invocation result accumulator.
//!
//! One [`RunReport`] is created per reconciliation invocation and threaded
//! `&mut` through every component that talks to the management API. It is
//! the only shared mutable state of an invocation and must never be reused
//! across invocations.

use serde::Serialize;
use serde_json::Value;

use crate::transport::Method;

/// One request/response pair, immutable once appended to the call log.
#[derive(Debug, Clone, Serialize)]
pub struct CallRecord {
    /// Full request URL.
    pub url: String,
    /// HTTP method used.
    pub http_method: Method,
    /// Status code returned by the server.
    pub http_status: u16,
    /// JSON body sent, if any.
    pub request_body: Option<Value>,
    /// Decoded response body; raw text (as a JSON string) when the body of
    /// a successful response is not valid JSON.
    pub response_body: Option<Value>,
}

/// Accumulated outcome of one reconciliation invocation.
///
/// Serialized as the invocation's result document:
/// `{ changed, api_id, state, token, responses }`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Whether any mutating call was issued.
    pub changed: bool,
    /// Id of the API the invocation operated on (created or declared).
    pub api_id: String,
    /// Final observed target state (`STARTED`, `STOPPED`, `absent`), when a
    /// lifecycle step ran.
    pub state: String,
    /// Gateway token obtained by a token exchange, when one was performed.
    pub token: String,
    /// Ordered log of every call made, including failed ones.
    pub responses: Vec<CallRecord>,
}

impl RunReport {
    /// Create an empty report for a new invocation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call record to the log.
    pub fn record(&mut self, record: CallRecord) {
        self.responses.push(record);
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.responses.len()
    }
}
