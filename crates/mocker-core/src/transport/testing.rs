//! Spy transports standing in for the real network in tests.

use crate::error::TransportError;
use crate::transport::{
    ErrorHandler, FetchRequest, FetchResponse, FetchTransport, HttpRequest, HttpTransport,
    LoadEvent, LoadHandler,
};
use crate::types::request::HttpMethod;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// A request that reached the real request-object transport.
#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
}

/// Real-network body produced by the spies for `url`.
pub fn real_body(url: &str) -> String {
    json!({ "real": url }).to_string()
}

#[derive(Default)]
pub struct SpyHttp {
    created: Mutex<usize>,
    sent: Arc<Mutex<Vec<SentRequest>>>,
}

impl SpyHttp {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn created(&self) -> usize {
        *self.created.lock().unwrap()
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_urls(&self) -> Vec<String> {
        self.sent().into_iter().map(|r| r.url).collect()
    }
}

impl HttpTransport for SpyHttp {
    fn create(&self) -> Box<dyn HttpRequest> {
        *self.created.lock().unwrap() += 1;
        Box::new(SpyRequest {
            sent: self.sent.clone(),
            opened: None,
            onload: None,
            onerror: None,
        })
    }
}

struct SpyRequest {
    sent: Arc<Mutex<Vec<SentRequest>>>,
    opened: Option<(HttpMethod, String)>,
    onload: Option<LoadHandler>,
    onerror: Option<ErrorHandler>,
}

impl HttpRequest for SpyRequest {
    fn open(&mut self, method: HttpMethod, url: &str) {
        self.opened = Some((method, url.to_string()));
    }

    fn send(&mut self, body: Option<Value>) -> Result<(), TransportError> {
        let Some((method, url)) = self.opened.clone() else {
            return Err(TransportError::NotOpened);
        };
        self.sent.lock().unwrap().push(SentRequest {
            method,
            url: url.clone(),
            body,
        });
        if url.starts_with("/unreachable") {
            if let Some(onerror) = self.onerror.as_mut() {
                onerror(TransportError::Network("connection refused".to_string()));
            }
        } else if let Some(onload) = self.onload.as_mut() {
            onload(LoadEvent::new(real_body(&url)));
        }
        Ok(())
    }

    fn set_onload(&mut self, handler: LoadHandler) {
        self.onload = Some(handler);
    }

    fn set_onerror(&mut self, handler: ErrorHandler) {
        self.onerror = Some(handler);
    }
}

#[derive(Default)]
pub struct SpyFetch {
    requests: Mutex<Vec<FetchRequest>>,
}

impl SpyFetch {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }
}

#[async_trait]
impl FetchTransport for SpyFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, TransportError> {
        let body = real_body(&request.url);
        let url = request.url.clone();
        self.requests.lock().unwrap().push(request);
        Ok(FetchResponse::new(url, 200, body))
    }
}

/// Collects `onload` responses delivered to a request.
#[derive(Clone, Default)]
pub struct LoadRecorder {
    responses: Arc<Mutex<Vec<String>>>,
}

impl LoadRecorder {
    pub fn handler(&self) -> LoadHandler {
        let responses = self.responses.clone();
        Box::new(move |event: LoadEvent| {
            responses.lock().unwrap().push(event.target.response);
        })
    }

    pub fn responses(&self) -> Vec<String> {
        self.responses.lock().unwrap().clone()
    }
}
