//! Request mechanisms that mocks intercept.
//!
//! Two client APIs are modelled:
//! - [`HttpTransport`] / [`HttpRequest`]: callback-based request objects
//!   (`open`, `send`, `onload`)
//! - [`FetchTransport`]: single-call fetch resolving to a [`FetchResponse`]
//!
//! [`Ambient`] holds the currently installed implementation of each mechanism.

mod ambient;
#[cfg(test)]
pub(crate) mod testing;

pub use ambient::Ambient;
pub(crate) use ambient::LayerId;

use crate::error::TransportError;
use crate::types::request::HttpMethod;
use async_trait::async_trait;
use serde_json::Value;

/// Callback receiving a completed load
pub type LoadHandler = Box<dyn FnMut(LoadEvent) + Send>;
/// Callback receiving a transport failure
pub type ErrorHandler = Box<dyn FnMut(TransportError) + Send>;

/// Event passed to `onload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadEvent {
    pub target: LoadTarget,
}

/// Request object state visible to `onload`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTarget {
    /// Response body text
    pub response: String,
}

impl LoadEvent {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            target: LoadTarget {
                response: response.into(),
            },
        }
    }
}

/// Callback-based request object.
pub trait HttpRequest: Send {
    fn open(&mut self, method: HttpMethod, url: &str);
    fn send(&mut self, body: Option<Value>) -> Result<(), TransportError>;
    fn set_onload(&mut self, handler: LoadHandler);
    fn set_onerror(&mut self, handler: ErrorHandler);
}

/// Constructor for request objects.
pub trait HttpTransport: Send + Sync {
    fn create(&self) -> Box<dyn HttpRequest>;
}

/// Arguments of a fetch call.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub url: String,
    pub method: HttpMethod,
    pub body: Option<Value>,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Resolved fetch result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    url: String,
    status: u16,
    body: String,
}

impl FetchResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub async fn text(&self) -> Result<String, TransportError> {
        Ok(self.body.clone())
    }

    pub async fn json(&self) -> Result<Value, TransportError> {
        serde_json::from_str(&self.body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Future-based request function.
#[async_trait]
pub trait FetchTransport: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, TransportError>;
}
