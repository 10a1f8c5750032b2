//! Session-scoped network mocking for request-object and fetch clients.
//!
//! A [`MockSession`] wraps the transports installed in an [`Ambient`],
//! serving registered canned responses and falling back to the original
//! transports when no mock matches or a filter rejects the request body.
//!
//! ```ignore
//! let ambient = Arc::new(Ambient::new(real_http, real_fetch));
//! let mut session = MockSession::new(ambient.clone(), MockerConfig::default());
//! session.activate()?;
//! session.mock_http_request(HttpMethod::Get, "/api/data", &json!({"status": 200}), None)?;
//!
//! let mut request = ambient.new_request();
//! request.set_onload(Box::new(|event| println!("{}", event.target.response)));
//! request.open(HttpMethod::Get, "/api/data");
//! request.send(None)?;
//!
//! session.deactivate()?;
//! ```

pub mod config;
pub mod error;
pub mod expression;
pub mod intercept;
pub mod logger;
pub mod matching;
pub mod mocks;
pub mod transport;
pub mod types;

pub use config::settings::{FetchDispatch, MockerConfig};
pub use error::{MockError, TransportError};
pub use logger::{Logger, TracingLogger};
pub use mocks::registry::MockRegistry;
pub use mocks::session::{MockSession, SessionState};
pub use transport::{
    Ambient, FetchRequest, FetchResponse, FetchTransport, HttpRequest, HttpTransport, LoadEvent,
};
pub use types::entry::MockEntry;
pub use types::filter::RequestFilter;
pub use types::request::{HttpMethod, Transport};
