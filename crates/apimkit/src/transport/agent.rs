//! ureq-backed transport.
//!
//! One synchronous agent per gateway, with a bounded global timeout.
//! Non-2xx statuses are handed back as ordinary responses so the client can
//! apply its own success policy and keep the raw body as the error message.

use std::time::Duration;

use crate::error::{Error, Result};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method};

/// Bounded wait per call; exceeding it is a transport failure, not a
/// retryable timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP transport backed by a [`ureq::Agent`].
pub struct AgentTransport {
    agent: ureq::Agent,
}

impl AgentTransport {
    /// Create a transport with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .http_status_as_error(false)
            .build();
        Self {
            agent: config.new_agent(),
        }
    }
}

impl Default for AgentTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for AgentTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut response = match request.method {
            Method::Get | Method::Delete => {
                let mut builder = match request.method {
                    Method::Get => self.agent.get(&request.url),
                    _ => self.agent.delete(&request.url),
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()?
            }
            Method::Post | Method::Put => {
                let mut builder = match request.method {
                    Method::Post => self.agent.post(&request.url),
                    _ => self.agent.put(&request.url),
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match request.body.as_deref() {
                    Some(payload) => builder.send(payload)?,
                    None => builder.send_empty()?,
                }
            }
        };

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
