//! Interceptors installed over the ambient transports while mocks are active.
//!
//! - [`InterceptingHttp`]: request-object constructor serving mocks on `send`
//! - [`StubFetch`]: single-slot fetch stub returning the latest payload
//! - [`DispatchFetch`]: per-URL fetch dispatch with passthrough
//! - [`Layer`]: the interceptors one session stacks onto an ambient

mod fetch;
mod http;
mod layer;

pub use fetch::{DispatchFetch, StubFetch, MOCK_STATUS};
pub use http::{InterceptedRequest, InterceptingHttp};
pub use layer::{FetchLayer, Layer};
