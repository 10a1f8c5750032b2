//! Interceptors for the fetch mechanism.

use crate::error::TransportError;
use crate::transport::{FetchRequest, FetchResponse, FetchTransport};
use crate::types::entry::{first_match, MockEntry};
use crate::types::request::Transport;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Status reported for mocked fetch responses
pub const MOCK_STATUS: u16 = 200;

/// Fetch stub resolving every call to one fixed payload.
///
/// URL, method and body of the call are ignored.
pub struct StubFetch {
    response: Value,
}

impl StubFetch {
    pub fn new(response: Value) -> Self {
        Self { response }
    }
}

#[async_trait]
impl FetchTransport for StubFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, TransportError> {
        tracing::debug!(url = %request.url, "serving stubbed fetch response");
        Ok(FetchResponse::new(
            request.url,
            MOCK_STATUS,
            self.response.to_string(),
        ))
    }
}

/// Fetch interceptor dispatching by exact URL.
///
/// Mirrors the request-object interceptor: first matching entry wins, filters
/// are honoured, and anything unmatched goes to the original fetch.
pub struct DispatchFetch {
    mocks: Arc<[MockEntry]>,
    original: Arc<dyn FetchTransport>,
}

impl DispatchFetch {
    pub fn new(mocks: Arc<[MockEntry]>, original: Arc<dyn FetchTransport>) -> Self {
        Self { mocks, original }
    }
}

#[async_trait]
impl FetchTransport for DispatchFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, TransportError> {
        let matched = first_match(&self.mocks, Transport::Fetch, None, &request.url);

        match matched {
            Some(entry) if entry.accepts(request.body.as_ref()) => {
                tracing::debug!(url = %request.url, "serving mocked fetch response");
                Ok(FetchResponse::new(
                    request.url,
                    MOCK_STATUS,
                    entry.response_text(),
                ))
            }
            Some(_) => {
                tracing::debug!(url = %request.url, "filter rejected body, passing through");
                self.original.fetch(request).await
            }
            None => {
                tracing::debug!(url = %request.url, "no mock registered, passing through");
                self.original.fetch(request).await
            }
        }
    }
}
