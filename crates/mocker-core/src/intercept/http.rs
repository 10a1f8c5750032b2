//! Interceptor for the callback-based request-object mechanism.

use crate::error::TransportError;
use crate::transport::{ErrorHandler, HttpRequest, HttpTransport, LoadEvent, LoadHandler};
use crate::types::entry::{first_match, MockEntry};
use crate::types::request::{HttpMethod, Transport};
use serde_json::Value;
use std::sync::Arc;

/// Request-object constructor that serves registered mocks.
///
/// Closes over a snapshot of the registry taken at install time. Requests it
/// creates keep that snapshot even if a newer interceptor is installed later.
pub struct InterceptingHttp {
    mocks: Arc<[MockEntry]>,
    original: Arc<dyn HttpTransport>,
}

impl InterceptingHttp {
    pub fn new(mocks: Arc<[MockEntry]>, original: Arc<dyn HttpTransport>) -> Self {
        Self { mocks, original }
    }
}

impl HttpTransport for InterceptingHttp {
    fn create(&self) -> Box<dyn HttpRequest> {
        Box::new(InterceptedRequest {
            mocks: self.mocks.clone(),
            original: self.original.clone(),
            handlers: Handlers::default(),
            state: RequestState::Unopened,
        })
    }
}

#[derive(Default)]
struct Handlers {
    onload: Option<LoadHandler>,
    onerror: Option<ErrorHandler>,
}

impl Handlers {
    /// Move any pending callbacks onto a real request.
    fn forward_to(&mut self, real: &mut dyn HttpRequest) {
        if let Some(onload) = self.onload.take() {
            real.set_onload(onload);
        }
        if let Some(onerror) = self.onerror.take() {
            real.set_onerror(onerror);
        }
    }
}

enum RequestState {
    Unopened,
    Mocked {
        method: HttpMethod,
        url: String,
        entry: MockEntry,
    },
    Delegated(Box<dyn HttpRequest>),
}

/// Request object produced by [`InterceptingHttp`].
pub struct InterceptedRequest {
    mocks: Arc<[MockEntry]>,
    original: Arc<dyn HttpTransport>,
    handlers: Handlers,
    state: RequestState,
}

/// Construct a real request and replay `open` on it.
fn open_real(
    original: &Arc<dyn HttpTransport>,
    method: HttpMethod,
    url: &str,
) -> Box<dyn HttpRequest> {
    let mut real = original.create();
    real.open(method, url);
    real
}

impl HttpRequest for InterceptedRequest {
    fn open(&mut self, method: HttpMethod, url: &str) {
        let matched = first_match(&self.mocks, Transport::Http, Some(method), url).cloned();

        self.state = match matched {
            Some(entry) => RequestState::Mocked {
                method,
                url: url.to_string(),
                entry,
            },
            None => {
                tracing::debug!(%method, url, "no mock registered, passing through");
                RequestState::Delegated(open_real(&self.original, method, url))
            }
        };
    }

    fn send(&mut self, body: Option<Value>) -> Result<(), TransportError> {
        match &mut self.state {
            RequestState::Unopened => Err(TransportError::NotOpened),
            RequestState::Delegated(real) => {
                self.handlers.forward_to(real.as_mut());
                real.send(body)
            }
            RequestState::Mocked { method, url, entry } => {
                if entry.accepts(body.as_ref()) {
                    tracing::debug!(%method, url = %url, "serving mocked response");
                    match self.handlers.onload.as_mut() {
                        Some(onload) => onload(LoadEvent::new(entry.response_text())),
                        None => {
                            tracing::warn!(%method, url = %url, "mocked response has no onload handler");
                        }
                    }
                    return Ok(());
                }

                tracing::debug!(%method, url = %url, "filter rejected body, passing through");
                let (method, url) = (*method, url.clone());
                let mut real = open_real(&self.original, method, &url);
                self.handlers.forward_to(real.as_mut());
                let result = real.send(body);
                self.state = RequestState::Delegated(real);
                result
            }
        }
    }

    fn set_onload(&mut self, handler: LoadHandler) {
        match &mut self.state {
            RequestState::Delegated(real) => real.set_onload(handler),
            _ => self.handlers.onload = Some(handler),
        }
    }

    fn set_onerror(&mut self, handler: ErrorHandler) {
        match &mut self.state {
            RequestState::Delegated(real) => real.set_onerror(handler),
            _ => self.handlers.onerror = Some(handler),
        }
    }
}
