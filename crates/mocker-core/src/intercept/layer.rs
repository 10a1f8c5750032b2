//! Interceptor layers stacked over the base transports of an ambient.

use crate::intercept::{DispatchFetch, InterceptingHttp, StubFetch};
use crate::transport::{FetchTransport, HttpTransport};
use crate::types::entry::MockEntry;
use serde_json::Value;
use std::sync::Arc;

/// Fetch behaviour contributed by one layer.
#[derive(Debug, Clone)]
pub enum FetchLayer {
    /// Resolve every call to one payload
    Stub(Value),
    /// Dispatch by url, passing unmatched calls to the layer below
    Dispatch(Arc<[MockEntry]>),
}

/// Interceptors one session contributes to an [`Ambient`](crate::transport::Ambient).
///
/// A layer wraps whatever sits below it, so removing a layer from the middle
/// of the stack only drops that layer's mocks.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    pub http: Option<Arc<[MockEntry]>>,
    pub fetch: Option<FetchLayer>,
}

impl Layer {
    pub fn is_empty(&self) -> bool {
        self.http.is_none() && self.fetch.is_none()
    }

    pub fn wrap_http(&self, below: Arc<dyn HttpTransport>) -> Arc<dyn HttpTransport> {
        match &self.http {
            Some(mocks) => Arc::new(InterceptingHttp::new(mocks.clone(), below)),
            None => below,
        }
    }

    pub fn wrap_fetch(&self, below: Arc<dyn FetchTransport>) -> Arc<dyn FetchTransport> {
        match &self.fetch {
            Some(FetchLayer::Stub(response)) => Arc::new(StubFetch::new(response.clone())),
            Some(FetchLayer::Dispatch(mocks)) => {
                Arc::new(DispatchFetch::new(mocks.clone(), below))
            }
            None => below,
        }
    }
}
