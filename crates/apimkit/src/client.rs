//! Gateway client: URL assembly, auth headers, success policy, call log.
//!
//! [`Gateway`] wraps a transport with everything every management-API call
//! has in common: the fixed `/management` base path, the JSON content type,
//! exactly one auth header, the 200/201/204 success policy, and recording
//! each call into the invocation's [`RunReport`].

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::report::{CallRecord, RunReport};
use crate::transport::{AgentTransport, HttpRequest, HttpTransport, Method};

/// Fixed base path of the management API, prefixed to every endpoint.
pub const API_PATH: &str = "/management";

/// Statuses treated as success; anything else aborts the invocation.
const SUCCESS_STATUSES: [u16; 3] = [200, 201, 204];

/// Authentication strategy for management-API calls.
///
/// Exactly one `Authorization` header is sent per request; the variant
/// decides which.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Basic authentication with a username and password.
    Basic {
        /// Account username.
        username: String,
        /// Account password.
        password: String,
    },
    /// A pre-obtained gateway token.
    Bearer {
        /// Gateway JWT token.
        token: String,
    },
}

impl Credentials {
    /// Basic-auth credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Bearer-token credentials.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Value of the `Authorization` header for this strategy.
    fn authorization(&self) -> String {
        match self {
            Self::Bearer { token } => format!("Bearer {token}"),
            Self::Basic { username, password } => {
                let encoded = BASE64.encode(format!("{username}:{password}"));
                format!("Basic {encoded}")
            }
        }
    }
}

/// Client for one management API server.
///
/// Holds the base URL, the credential strategy and the transport; stateless
/// otherwise. All invocation state lives in the [`RunReport`] passed into
/// [`request`](Self::request).
pub struct Gateway {
    base_url: String,
    credentials: Credentials,
    transport: Box<dyn HttpTransport>,
}

impl Gateway {
    /// Create a gateway backed by the default ureq transport.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Credentials) -> Self {
        Self::with_transport(base_url, credentials, Box::new(AgentTransport::new()))
    }

    /// Create a gateway with a custom transport (useful for testing).
    #[must_use]
    pub fn with_transport(
        base_url: impl Into<String>,
        credentials: Credentials,
        transport: Box<dyn HttpTransport>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            credentials,
            transport,
        }
    }

    /// Rebuild the gateway with new credentials, keeping the transport.
    ///
    /// Used after a token exchange so the rest of the invocation runs with
    /// the gateway-issued token.
    #[must_use]
    pub fn with_credentials(self, credentials: Credentials) -> Self {
        Self {
            credentials,
            ..self
        }
    }

    /// Base URL of the management server.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue one call against the management API.
    ///
    /// The endpoint already carries the [`API_PATH`] prefix; the base URL is
    /// prepended here. Success (200/201/204) appends a [`CallRecord`] to the
    /// report and returns it, with the body decoded as JSON when possible
    /// and kept as raw text otherwise. Any other status appends the record
    /// documenting the attempted request, then returns [`Error::Http`] with
    /// the raw response body as the message.
    pub fn request(
        &self,
        report: &mut RunReport,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<CallRecord> {
        let url = format!("{}{}", self.base_url, endpoint);
        log::debug!("{method} {url}");

        let request = HttpRequest {
            method,
            url: url.clone(),
            headers: vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("Authorization".to_string(), self.credentials.authorization()),
            ],
            body: body.map(|payload| payload.to_string()),
        };

        let response = self.transport.execute(&request)?;

        let mut record = CallRecord {
            url,
            http_method: method,
            http_status: response.status,
            request_body: body.cloned(),
            response_body: None,
        };

        if !SUCCESS_STATUSES.contains(&response.status) {
            report.record(record);
            return Err(Error::Http {
                status: response.status,
                body: response.body,
            });
        }

        if !response.body.is_empty() {
            record.response_body = Some(
                serde_json::from_str(&response.body)
                    .unwrap_or_else(|_| Value::String(response.body)),
            );
        }

        report.record(record.clone());
        Ok(record)
    }
}
