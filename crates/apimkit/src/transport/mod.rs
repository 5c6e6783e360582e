//! HTTP transport abstraction.
//!
//! The transport issues exactly one HTTP request and reports the status and
//! raw body back; it knows nothing about success policies, call logging or
//! auth strategy — those live in [`crate::client::Gateway`]. The primary
//! implementation is [`agent::AgentTransport`].
//!
//! # Testing
//!
//! Use [`MockTransport`] to drive the client without network access:
//!
//! ```
//! use apimkit::transport::{HttpTransport, Method, MockTransport};
//!
//! let mock = MockTransport::new();
//! mock.enqueue(201, r#"{"id":"1234"}"#);
//!
//! let response = mock
//!     .execute(&apimkit::transport::HttpRequest {
//!         method: Method::Post,
//!         url: "https://manage.example.com/management/apis".to_string(),
//!         headers: vec![],
//!         body: None,
//!     })
//!     .unwrap();
//! assert_eq!(response.status, 201);
//! assert_eq!(mock.requests().len(), 1);
//! ```

pub mod agent;

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::error::Result;

pub use agent::AgentTransport;

/// HTTP methods used against the management API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// Fetch a resource.
    Get,
    /// Create a resource or trigger an action.
    Post,
    /// Replace a resource.
    Put,
    /// Delete a resource.
    Delete,
}

impl Method {
    /// Wire name of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One request handed to the transport, fully assembled.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Headers to send, in order.
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body, when the call carries one.
    pub body: Option<String>,
}

/// Status and raw body of a completed request.
///
/// The transport performs no status interpretation; non-2xx responses are
/// returned here like any other.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body text (possibly empty).
    pub body: String,
}

/// Transport trait: issue one HTTP request, synchronously.
///
/// Implementations fail only on transport-level problems (connect failure,
/// timeout); a response with any status is a successful execution.
pub trait HttpTransport: Send + Sync {
    /// Execute the request and return the raw response.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Mock transport for testing without network access.
///
/// Responses are served from a scripted queue (an empty queue yields
/// `200` with an empty body) and every executed request is recorded for
/// later assertions. Clones share the same queue and log, so tests can keep
/// a handle after handing the transport to a gateway.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<VecDeque<HttpResponse>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    /// Create a new empty mock transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with a raw body.
    pub fn enqueue(&self, status: u16, body: impl Into<String>) {
        let mut responses = self.responses.lock().unwrap();
        responses.push_back(HttpResponse {
            status,
            body: body.into(),
        });
    }

    /// Queue a response with a JSON body.
    pub fn enqueue_json(&self, status: u16, body: &serde_json::Value) {
        self.enqueue(status, body.to_string());
    }

    /// All requests executed so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `(method, url)` pairs of every request executed so far.
    #[must_use]
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.method, r.url.clone()))
            .collect()
    }
}

impl HttpTransport for MockTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let response = self.responses.lock().unwrap().pop_front();
        Ok(response.unwrap_or(HttpResponse {
            status: 200,
            body: String::new(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: Method, url: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: url.to_string(),
            headers: vec![],
            body: None,
        }
    }

    #[test]
    fn test_method_as_str() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_mock_serves_responses_in_order() {
        let mock = MockTransport::new();
        mock.enqueue(200, "first");
        mock.enqueue(404, "second");

        let first = mock.execute(&request(Method::Get, "/a")).unwrap();
        let second = mock.execute(&request(Method::Get, "/b")).unwrap();
        assert_eq!((first.status, first.body.as_str()), (200, "first"));
        assert_eq!((second.status, second.body.as_str()), (404, "second"));
    }

    #[test]
    fn test_mock_defaults_to_empty_success() {
        let mock = MockTransport::new();
        let response = mock.execute(&request(Method::Post, "/c")).unwrap();
        assert_eq!(response.status, 200);
        assert!(response.body.is_empty());
    }

    #[test]
    fn test_mock_records_requests_across_clones() {
        let mock = MockTransport::new();
        let clone = mock.clone();
        clone.execute(&request(Method::Put, "/d")).unwrap();

        let calls = mock.calls();
        assert_eq!(calls, vec![(Method::Put, "/d".to_string())]);
    }
}
