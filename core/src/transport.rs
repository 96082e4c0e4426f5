//! Execution of `HttpRequest` values.
//!
//! `YmmClient` never talks to the network directly; it hands each built
//! request to a `Transport`. `UreqTransport` is the blocking default. Tests
//! substitute their own implementation to observe requests.

use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip per call.
///
/// Implementations return non-2xx responses as data. Only a request that
/// could not complete is an error.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    /// Transport without a timeout; calls block until the server answers.
    pub fn new() -> Self {
        Self::with_timeout(None)
    }

    /// Transport whose calls fail once `timeout` elapses end to end.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        // Status codes are the caller's concern, so 4xx/5xx stay responses.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.full_url()?;

        let mut response = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => {
                with_headers(self.agent.get(url.as_str()), &request.headers).call()?
            }
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url.as_str()), &request.headers)
                    .send(body.as_bytes())?
            }
            (HttpMethod::Post, None) => {
                with_headers(self.agent.post(url.as_str()), &request.headers).send_empty()?
            }
        };

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_string()?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
