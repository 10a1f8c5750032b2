//! Registered mock entries.

use crate::error::MockError;
use crate::types::filter::RequestFilter;
use crate::types::request::{HttpMethod, Transport};
use serde::Serialize;
use serde_json::Value;

/// One registered mock.
#[derive(Debug, Clone)]
pub struct MockEntry {
    /// Mechanism the mock intercepts
    pub transport: Transport,
    /// HTTP method (request-object mocks only; fetch mocks are method-agnostic)
    pub method: Option<HttpMethod>,
    /// Exact-match URL key
    pub url: String,
    /// Payload served when the mock applies
    pub response: Value,
    /// Optional body filter; rejection falls back to the real transport
    pub filter: Option<RequestFilter>,
}

impl MockEntry {
    /// Request-object mock. Fails if `response` cannot be represented as JSON.
    pub fn http<R: Serialize + ?Sized>(
        method: HttpMethod,
        url: impl Into<String>,
        response: &R,
    ) -> Result<Self, MockError> {
        let url = url.into();
        let response = to_response_value(&url, response)?;
        Ok(Self {
            transport: Transport::Http,
            method: Some(method),
            url,
            response,
            filter: None,
        })
    }

    /// Fetch mock. Fails if `response` cannot be represented as JSON.
    pub fn fetch<R: Serialize + ?Sized>(
        url: impl Into<String>,
        response: &R,
    ) -> Result<Self, MockError> {
        let url = url.into();
        let response = to_response_value(&url, response)?;
        Ok(Self {
            transport: Transport::Fetch,
            method: None,
            url,
            response,
            filter: None,
        })
    }

    pub fn with_filter(mut self, filter: RequestFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Structural match used by interceptors: same transport, method and URL.
    pub fn matches(&self, transport: Transport, method: Option<HttpMethod>, url: &str) -> bool {
        self.transport == transport && self.method == method && self.url == url
    }

    /// Key match used for removal. Entries without a method ignore `method`.
    pub fn matches_key(&self, method: Option<HttpMethod>, url: &str) -> bool {
        self.url == url && (self.method.is_none() || self.method == method)
    }

    pub fn accepts(&self, body: Option<&Value>) -> bool {
        match &self.filter {
            Some(filter) => filter.accepts(body),
            None => true,
        }
    }

    /// JSON text of the response payload, as delivered to `onload`.
    pub fn response_text(&self) -> String {
        self.response.to_string()
    }
}

/// Earliest entry in `entries` structurally matching a request.
pub fn first_match<'a>(
    entries: &'a [MockEntry],
    transport: Transport,
    method: Option<HttpMethod>,
    url: &str,
) -> Option<&'a MockEntry> {
    entries
        .iter()
        .find(|entry| entry.matches(transport, method, url))
}

fn to_response_value<R: Serialize + ?Sized>(url: &str, response: &R) -> Result<Value, MockError> {
    serde_json::to_value(response).map_err(|source| MockError::Serialization {
        url: url.to_string(),
        source,
    })
}
