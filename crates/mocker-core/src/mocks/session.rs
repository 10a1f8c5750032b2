//! Mock session owning the registry and the installed interceptors.
//!
//! This module provides `MockSession` which contributes one interceptor layer
//! to an [`Ambient`] while active and withdraws it on deactivation. The
//! original transports are held by the ambient itself, captured once when it
//! is constructed.

use crate::config::mock::MockDefinition;
use crate::config::settings::{FetchDispatch, MockerConfig};
use crate::error::MockError;
use crate::intercept::{FetchLayer, Layer};
use crate::logger::{Logger, TracingLogger};
use crate::mocks::registry::MockRegistry;
use crate::transport::{Ambient, LayerId};
use crate::types::entry::MockEntry;
use crate::types::filter::RequestFilter;
use crate::types::request::{HttpMethod, Transport};
use serde::Serialize;
use std::sync::Arc;

const HELP: &[&str] = &[
    "Use 'mock_http_request(method, url, response, filter)' to mock a request-object call.",
    "Example: mock_http_request(GET, \"/api/data\", {\"status\": 200, \"body\": \"Mocked response\"}, None)",
    "Use 'mock_fetch_request(url, response)' to stub fetch.",
    "Use 'remove_mock(method, url)' to remove an individual mock.",
    "Use 'clear_all_mocks()' to remove all mocks.",
    "Use 'mocks()' to view the registered mocks.",
];

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Inactive,
    Active,
}

/// Mock session over an [`Ambient`].
///
/// `MockSession` provides:
/// - Mock registration with its layer rebuilt per mutation
/// - Withdrawal of its layer on `clear_all_mocks`, `deactivate` and drop
///
/// Several sessions may share one ambient. Each owns one layer, stacked in
/// construction order, and only ever replaces or removes that layer, so
/// sessions can be torn down in any order without leaking mocks.
pub struct MockSession {
    config: MockerConfig,
    ambient: Arc<Ambient>,
    layer: LayerId,
    registry: MockRegistry,
    state: SessionState,
    logger: Arc<dyn Logger>,
}

impl MockSession {
    /// Create an inactive session over `ambient`.
    ///
    /// The session's layer sits above the layers of sessions created earlier.
    pub fn new(ambient: Arc<Ambient>, config: MockerConfig) -> Self {
        let layer = ambient.allocate_layer();
        let logger = Arc::new(TracingLogger::new(config.namespace.clone()));
        Self {
            config,
            ambient,
            layer,
            registry: MockRegistry::new(),
            state: SessionState::Inactive,
            logger,
        }
    }

    /// Replace the logger used by [`help`](Self::help).
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &MockerConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// Inactive -> Active with an empty registry.
    pub fn activate(&mut self) -> Result<(), MockError> {
        if self.is_active() {
            return Err(MockError::AlreadyActive);
        }
        self.registry.clear();
        self.state = SessionState::Active;
        tracing::info!(namespace = %self.config.namespace, "mock session activated");
        Ok(())
    }

    /// Clear all mocks, withdraw this session's layer and go back to Inactive.
    pub fn deactivate(&mut self) -> Result<(), MockError> {
        self.ensure_active()?;
        self.restore();
        self.state = SessionState::Inactive;
        tracing::info!(namespace = %self.config.namespace, "mock session deactivated");
        Ok(())
    }

    /// Register a request-object mock for `method` and `url`.
    ///
    /// The response is converted to JSON here, so unserializable payloads fail
    /// at registration rather than on first use.
    pub fn mock_http_request<R: Serialize + ?Sized>(
        &mut self,
        method: HttpMethod,
        url: impl Into<String>,
        response: &R,
        filter: Option<RequestFilter>,
    ) -> Result<(), MockError> {
        self.ensure_active()?;
        let entry = MockEntry::http(method, url, response)?;
        let entry = match filter {
            Some(filter) => entry.with_filter(filter),
            None => entry,
        };
        self.add_mock(entry)
    }

    /// Register a fetch mock.
    ///
    /// With [`FetchDispatch::LastRegistered`] every fetch resolves to this
    /// payload until another fetch mock is registered; `url` is bookkeeping.
    pub fn mock_fetch_request<R: Serialize + ?Sized>(
        &mut self,
        url: impl Into<String>,
        response: &R,
    ) -> Result<(), MockError> {
        self.ensure_active()?;
        let entry = MockEntry::fetch(url, response)?;
        self.add_mock(entry)
    }

    /// Register a prepared entry and reinstall the interceptor for its transport.
    pub fn add_mock(&mut self, entry: MockEntry) -> Result<(), MockError> {
        self.ensure_active()?;
        let transport = entry.transport;
        tracing::debug!(
            ?transport,
            method = ?entry.method,
            url = %entry.url,
            "registering mock"
        );
        self.registry.add(entry);
        self.install();
        Ok(())
    }

    /// Register fixture definitions.
    ///
    /// All definitions are validated before any is registered, so a bad
    /// definition leaves the session unchanged.
    pub fn load_mocks(&mut self, definitions: Vec<MockDefinition>) -> Result<usize, MockError> {
        self.ensure_active()?;
        let entries = definitions
            .into_iter()
            .map(MockEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let count = entries.len();
        for entry in entries {
            self.registry.add(entry);
        }
        self.install();

        tracing::info!(namespace = %self.config.namespace, count, "loaded mocks");
        Ok(count)
    }

    /// Remove the earliest mock registered for `method` and `url`.
    pub fn remove_mock(&mut self, method: HttpMethod, url: &str) -> Result<MockEntry, MockError> {
        self.remove(Some(method), url)
    }

    /// Remove the earliest fetch mock registered for `url`.
    pub fn remove_fetch_mock(&mut self, url: &str) -> Result<MockEntry, MockError> {
        self.remove(None, url)
    }

    /// Remove every mock and withdraw this session's interceptors.
    pub fn clear_all_mocks(&mut self) -> Result<(), MockError> {
        self.ensure_active()?;
        self.restore();
        Ok(())
    }

    /// Write usage text to the logger.
    pub fn help(&self) {
        for line in HELP {
            self.logger.log(line);
        }
    }

    /// Registered mocks in registration order.
    pub fn mocks(&self) -> &[MockEntry] {
        self.registry.list()
    }

    fn ensure_active(&self) -> Result<(), MockError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(MockError::Inactive)
        }
    }

    fn remove(&mut self, method: Option<HttpMethod>, url: &str) -> Result<MockEntry, MockError> {
        self.ensure_active()?;
        let removed = self
            .registry
            .remove_first(method, url)
            .ok_or_else(|| MockError::NotFound {
                method: method.map_or_else(|| "FETCH".to_string(), |m| m.to_string()),
                url: url.to_string(),
            })?;
        tracing::debug!(transport = ?removed.transport, url, "removed mock");
        self.install();
        Ok(removed)
    }

    fn restore(&mut self) {
        self.registry.clear();
        self.ambient.remove_layer(self.layer);
    }

    /// Replace this session's layer with one built from the current registry.
    ///
    /// Transports with no mocks left contribute nothing, so the layers below
    /// (or the base transport) serve them again.
    fn install(&self) {
        self.ambient.set_layer(self.layer, self.build_layer());
    }

    fn build_layer(&self) -> Layer {
        let http = self
            .registry
            .has_transport(Transport::Http)
            .then(|| self.registry.snapshot(Transport::Http));
        let fetch = match (self.config.fetch_dispatch, self.registry.last(Transport::Fetch)) {
            (_, None) => None,
            (FetchDispatch::LastRegistered, Some(latest)) => {
                Some(FetchLayer::Stub(latest.response.clone()))
            }
            (FetchDispatch::PerUrl, Some(_)) => Some(FetchLayer::Dispatch(
                self.registry.snapshot(Transport::Fetch),
            )),
        };
        Layer { http, fetch }
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        if self.is_active() {
            self.restore();
        }
    }
}

impl std::fmt::Debug for MockSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSession")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::mock::FilterDefinition;
    use crate::transport::testing::{real_body, LoadRecorder, SpyFetch, SpyHttp};
    use crate::transport::{FetchRequest, FetchTransport, HttpTransport};
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Mutex;

    struct Harness {
        http: Arc<SpyHttp>,
        fetch: Arc<SpyFetch>,
        ambient: Arc<Ambient>,
    }

    impl Harness {
        fn new() -> Self {
            let http = SpyHttp::new();
            let fetch = SpyFetch::new();
            let ambient = Arc::new(Ambient::new(http.clone(), fetch.clone()));
            Self {
                http,
                fetch,
                ambient,
            }
        }

        fn session(&self, config: MockerConfig) -> MockSession {
            let mut session = MockSession::new(self.ambient.clone(), config);
            session.activate().unwrap();
            session
        }

        /// Open and send through the ambient, returning the `onload` responses.
        fn request(&self, method: HttpMethod, url: &str, body: Option<serde_json::Value>) -> Vec<String> {
            let recorder = LoadRecorder::default();
            let mut request = self.ambient.new_request();
            request.set_onload(recorder.handler());
            request.open(method, url);
            request.send(body).unwrap();
            recorder.responses()
        }

        fn originals_restored(&self) -> bool {
            let http: Arc<dyn HttpTransport> = self.http.clone();
            let fetch: Arc<dyn FetchTransport> = self.fetch.clone();
            Arc::ptr_eq(&self.ambient.http_transport(), &http)
                && Arc::ptr_eq(&self.ambient.fetch_transport(), &fetch)
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        lines: Mutex<Vec<String>>,
    }

    impl Logger for RecordingLogger {
        fn log(&self, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
    }

    #[rstest]
    fn test_mock_then_remove_scenario() {
        let harness = Harness::new();
        let mut session = harness.session(MockerConfig::default());

        session
            .mock_http_request(
                HttpMethod::Get,
                "/api/data",
                &json!({"status": 200, "body": "ok"}),
                None,
            )
            .unwrap();
        let responses = harness.request(HttpMethod::Get, "/api/data", None);
        assert_eq!(responses, vec![r#"{"status":200,"body":"ok"}"#]);
        assert!(harness.http.sent().is_empty());

        session.remove_mock(HttpMethod::Get, "/api/data").unwrap();
        let responses = harness.request(HttpMethod::Get, "/api/data", None);
        assert_eq!(responses, vec![real_body("/api/data")]);
        assert_eq!(harness.http.sent_urls(), vec!["/api/data"]);
    }

    #[rstest]
    fn test_filter_rejection_reaches_real_network() {
        let harness = Harness::new();
        let mut session = harness.session(MockerConfig::default());
        let filter = RequestFilter::predicate(|body| body.is_some_and(|b| b["mock"] == true));

        session
            .mock_http_request(HttpMethod::Post, "/api/save", &json!({"saved": true}), Some(filter))
            .unwrap();

        let mocked = harness.request(HttpMethod::Post, "/api/save", Some(json!({"mock": true})));
        let real = harness.request(HttpMethod::Post, "/api/save", Some(json!({"mock": false})));

        assert_eq!(mocked, vec![r#"{"saved":true}"#]);
        assert_eq!(real, vec![real_body("/api/save")]);
        assert_eq!(harness.http.sent().len(), 1);
        assert_eq!(harness.http.sent()[0].body, Some(json!({"mock": false})));
    }

    #[tokio::test]
    async fn test_clear_all_restores_reference_equal_originals() {
        let harness = Harness::new();
        let mut session = harness.session(MockerConfig::default());
        session
            .mock_http_request(HttpMethod::Get, "/a", &json!(1), None)
            .unwrap();
        session.mock_fetch_request("/b", &json!(2)).unwrap();
        assert!(!harness.originals_restored());

        session.clear_all_mocks().unwrap();

        assert!(harness.originals_restored());
        assert!(session.mocks().is_empty());
        assert!(session.is_active());
    }

    #[rstest]
    #[case("/api/users")]
    #[case("/completely/unrelated")]
    #[tokio::test]
    async fn test_fetch_resolves_latest_payload_for_any_url(#[case] url: &str) {
        let harness = Harness::new();
        let mut session = harness.session(MockerConfig::default());
        session.mock_fetch_request("/api/users", &json!(["first"])).unwrap();
        session.mock_fetch_request("/api/other", &json!(["second"])).unwrap();

        for _ in 0..2 {
            let response = harness.ambient.fetch(FetchRequest::get(url)).await.unwrap();
            assert_eq!(response.json().await.unwrap(), json!(["second"]));
        }
        assert_eq!(session.mocks().len(), 2);
        assert!(harness.fetch.urls().is_empty());
    }

    #[tokio::test]
    async fn test_removing_latest_fetch_mock_falls_back_to_previous_then_original() {
        let harness = Harness::new();
        let mut session = harness.session(MockerConfig::default());
        session.mock_fetch_request("/one", &json!(1)).unwrap();
        session.mock_fetch_request("/two", &json!(2)).unwrap();

        session.remove_fetch_mock("/two").unwrap();
        let response = harness.ambient.fetch(FetchRequest::get("/x")).await.unwrap();
        assert_eq!(response.json().await.unwrap(), json!(1));

        session.remove_fetch_mock("/one").unwrap();
        let response = harness.ambient.fetch(FetchRequest::get("/x")).await.unwrap();
        assert_eq!(response.json().await.unwrap(), json!({"real": "/x"}));
        assert!(harness.originals_restored());
    }

    #[tokio::test]
    async fn test_per_url_fetch_dispatch() {
        let harness = Harness::new();
        let config = MockerConfig::default().with_fetch_dispatch(FetchDispatch::PerUrl);
        let mut session = harness.session(config);
        session.mock_fetch_request("/a", &json!("A")).unwrap();
        session.mock_fetch_request("/b", &json!("B")).unwrap();

        let a = harness.ambient.fetch(FetchRequest::get("/a")).await.unwrap();
        let c = harness.ambient.fetch(FetchRequest::get("/c")).await.unwrap();

        assert_eq!(a.json().await.unwrap(), json!("A"));
        assert_eq!(c.json().await.unwrap(), json!({"real": "/c"}));
        assert_eq!(harness.fetch.urls(), vec!["/c"]);
    }

    #[rstest]
    fn test_remove_missing_mock_is_reported() {
        let harness = Harness::new();
        let mut session = harness.session(MockerConfig::default());
        session
            .mock_http_request(HttpMethod::Get, "/api", &json!(1), None)
            .unwrap();

        let result = session.remove_mock(HttpMethod::Post, "/api");
        assert!(matches!(
            result,
            Err(MockError::NotFound { method, url }) if method == "POST" && url == "/api"
        ));
        assert_eq!(session.mocks().len(), 1);
    }

    #[rstest]
    fn test_duplicate_mocks_use_earliest_until_removed() {
        let harness = Harness::new();
        let mut session = harness.session(MockerConfig::default());
        session
            .mock_http_request(HttpMethod::Get, "/api", &json!("first"), None)
            .unwrap();
        session
            .mock_http_request(HttpMethod::Get, "/api", &json!("second"), None)
            .unwrap();

        assert_eq!(harness.request(HttpMethod::Get, "/api", None), vec!["\"first\""]);
        session.remove_mock(HttpMethod::Get, "/api").unwrap();
        assert_eq!(harness.request(HttpMethod::Get, "/api", None), vec!["\"second\""]);
    }

    #[rstest]
    fn test_request_created_before_change_keeps_its_snapshot() {
        let harness = Harness::new();
        let mut session = harness.session(MockerConfig::default());
        session
            .mock_http_request(HttpMethod::Get, "/api", &json!("mocked"), None)
            .unwrap();

        let recorder = LoadRecorder::default();
        let mut early = harness.ambient.new_request();
        early.set_onload(recorder.handler());

        session.remove_mock(HttpMethod::Get, "/api").unwrap();
        early.open(HttpMethod::Get, "/api");
        early.send(None).unwrap();

        assert_eq!(recorder.responses(), vec!["\"mocked\""]);
        assert_eq!(
            harness.request(HttpMethod::Get, "/api", None),
            vec![real_body("/api")]
        );
    }

    #[rstest]
    fn test_operations_require_active_session() {
        let harness = Harness::new();
        let mut session = MockSession::new(harness.ambient.clone(), MockerConfig::default());

        assert!(matches!(
            session.mock_http_request(HttpMethod::Get, "/a", &json!(1), None),
            Err(MockError::Inactive)
        ));
        assert!(matches!(
            session.mock_fetch_request("/a", &json!(1)),
            Err(MockError::Inactive)
        ));
        assert!(matches!(
            session.remove_mock(HttpMethod::Get, "/a"),
            Err(MockError::Inactive)
        ));
        assert!(matches!(session.clear_all_mocks(), Err(MockError::Inactive)));
        assert!(matches!(session.deactivate(), Err(MockError::Inactive)));
        assert!(harness.originals_restored());
    }

    #[rstest]
    fn test_activate_twice_fails() {
        let harness = Harness::new();
        let mut session = harness.session(MockerConfig::default());
        assert!(matches!(session.activate(), Err(MockError::AlreadyActive)));
        assert_eq!(session.state(), SessionState::Active);
    }

    #[tokio::test]
    async fn test_reactivation_behaves_like_first_activation() {
        let harness = Harness::new();
        let mut session = harness.session(MockerConfig::default());

        for round in 0..3 {
            session
                .mock_http_request(HttpMethod::Get, "/api", &json!(round), None)
                .unwrap();
            session.mock_fetch_request("/feed", &json!(round)).unwrap();
            assert_eq!(
                harness.request(HttpMethod::Get, "/api", None),
                vec![round.to_string()]
            );

            session.deactivate().unwrap();
            assert_eq!(session.state(), SessionState::Inactive);
            assert!(session.mocks().is_empty());
            assert!(harness.originals_restored());

            session.activate().unwrap();
        }

        let response = harness.ambient.fetch(FetchRequest::get("/feed")).await.unwrap();
        assert_eq!(response.json().await.unwrap(), json!({"real": "/feed"}));
    }

    #[rstest]
    fn test_drop_restores_originals() {
        let harness = Harness::new();
        {
            let mut session = harness.session(MockerConfig::default());
            session
                .mock_http_request(HttpMethod::Get, "/api", &json!(1), None)
                .unwrap();
            assert!(!harness.originals_restored());
        }
        assert!(harness.originals_restored());
    }

    #[rstest]
    fn test_nested_sessions_restore_outer_interceptors() {
        let harness = Harness::new();
        let mut outer = harness.session(MockerConfig::new("outer"));
        outer
            .mock_http_request(HttpMethod::Get, "/outer", &json!("outer"), None)
            .unwrap();

        let mut inner = harness.session(MockerConfig::new("inner"));
        inner
            .mock_http_request(HttpMethod::Get, "/inner", &json!("inner"), None)
            .unwrap();

        assert_eq!(harness.request(HttpMethod::Get, "/inner", None), vec!["\"inner\""]);
        assert_eq!(harness.request(HttpMethod::Get, "/outer", None), vec!["\"outer\""]);

        inner.deactivate().unwrap();
        assert_eq!(
            harness.request(HttpMethod::Get, "/inner", None),
            vec![real_body("/inner")]
        );
        assert_eq!(harness.request(HttpMethod::Get, "/outer", None), vec!["\"outer\""]);

        outer.deactivate().unwrap();
        assert!(harness.originals_restored());
    }

    #[rstest]
    fn test_outer_session_deactivated_first_leaves_no_mock_behind() {
        let harness = Harness::new();
        let mut outer = harness.session(MockerConfig::new("outer"));
        outer
            .mock_http_request(HttpMethod::Get, "/outer", &json!("outer"), None)
            .unwrap();
        let mut inner = harness.session(MockerConfig::new("inner"));
        inner
            .mock_http_request(HttpMethod::Get, "/inner", &json!("inner"), None)
            .unwrap();

        outer.deactivate().unwrap();
        assert_eq!(
            harness.request(HttpMethod::Get, "/outer", None),
            vec![real_body("/outer")]
        );
        assert_eq!(harness.request(HttpMethod::Get, "/inner", None), vec!["\"inner\""]);

        inner.deactivate().unwrap();
        assert_eq!(
            harness.request(HttpMethod::Get, "/outer", None),
            vec![real_body("/outer")]
        );
        assert!(harness.originals_restored());
        assert_eq!(harness.ambient.layer_count(), 0);
    }

    #[tokio::test]
    async fn test_sibling_sessions_keep_each_others_mocks() {
        let harness = Harness::new();
        let mut a = MockSession::new(harness.ambient.clone(), MockerConfig::new("a"));
        let mut b = MockSession::new(harness.ambient.clone(), MockerConfig::new("b"));
        a.activate().unwrap();
        b.activate().unwrap();

        a.mock_http_request(HttpMethod::Get, "/a", &json!("a"), None)
            .unwrap();
        b.mock_http_request(HttpMethod::Get, "/b", &json!("b"), None)
            .unwrap();
        a.mock_fetch_request("/feed", &json!("a-feed")).unwrap();

        assert_eq!(harness.request(HttpMethod::Get, "/a", None), vec!["\"a\""]);
        assert_eq!(harness.request(HttpMethod::Get, "/b", None), vec!["\"b\""]);
        let response = harness.ambient.fetch(FetchRequest::get("/feed")).await.unwrap();
        assert_eq!(response.json().await.unwrap(), json!("a-feed"));
        assert!(harness.http.sent().is_empty());

        a.clear_all_mocks().unwrap();
        assert_eq!(
            harness.request(HttpMethod::Get, "/a", None),
            vec![real_body("/a")]
        );
        assert_eq!(harness.request(HttpMethod::Get, "/b", None), vec!["\"b\""]);

        b.deactivate().unwrap();
        assert!(harness.originals_restored());
    }

    #[rstest]
    fn test_dropping_outer_session_keeps_inner_mocks_only() {
        let harness = Harness::new();
        let mut outer = harness.session(MockerConfig::new("outer"));
        outer
            .mock_http_request(HttpMethod::Get, "/outer", &json!("outer"), None)
            .unwrap();
        let mut inner = harness.session(MockerConfig::new("inner"));
        inner
            .mock_http_request(HttpMethod::Get, "/inner", &json!("inner"), None)
            .unwrap();

        drop(outer);
        assert_eq!(
            harness.request(HttpMethod::Get, "/outer", None),
            vec![real_body("/outer")]
        );
        assert_eq!(harness.request(HttpMethod::Get, "/inner", None), vec!["\"inner\""]);

        drop(inner);
        assert!(harness.originals_restored());
    }

    #[rstest]
    fn test_unserializable_payload_is_rejected_at_registration() {
        let harness = Harness::new();
        let mut session = harness.session(MockerConfig::default());
        let mut response = std::collections::HashMap::new();
        response.insert((1, 2), "tuple keys are not JSON object keys");

        let http = session.mock_http_request(HttpMethod::Get, "/api/bad", &response, None);
        let fetch = session.mock_fetch_request("/feed/bad", &response);

        assert!(matches!(
            http,
            Err(MockError::Serialization { url, .. }) if url == "/api/bad"
        ));
        assert!(matches!(
            fetch,
            Err(MockError::Serialization { url, .. }) if url == "/feed/bad"
        ));
        assert!(session.mocks().is_empty());
        assert!(harness.originals_restored());
    }

    #[rstest]
    fn test_independent_ambients_do_not_interfere() {
        let first = Harness::new();
        let second = Harness::new();
        let mut session = first.session(MockerConfig::default());
        session
            .mock_http_request(HttpMethod::Get, "/api", &json!(1), None)
            .unwrap();

        assert_eq!(second.request(HttpMethod::Get, "/api", None), vec![real_body("/api")]);
        assert!(second.originals_restored());
    }

    #[rstest]
    fn test_load_mocks_registers_all_definitions() {
        let harness = Harness::new();
        let mut session = harness.session(MockerConfig::default());
        let definitions = vec![
            MockDefinition {
                transport: Transport::Http,
                method: Some(HttpMethod::Post),
                url: "/api/login".to_string(),
                response: json!({"token": "t"}),
                filter: Some(FilterDefinition::Expression("user == 'qa'".to_string())),
            },
            MockDefinition {
                transport: Transport::Fetch,
                method: None,
                url: "/feed".to_string(),
                response: json!([]),
                filter: None,
            },
        ];

        assert_eq!(session.load_mocks(definitions).unwrap(), 2);
        assert_eq!(session.mocks().len(), 2);
        assert_eq!(
            harness.request(HttpMethod::Post, "/api/login", Some(json!({"user": "qa"}))),
            vec![r#"{"token":"t"}"#]
        );
        assert_eq!(
            harness.request(HttpMethod::Post, "/api/login", Some(json!({"user": "x"}))),
            vec![real_body("/api/login")]
        );
    }

    #[rstest]
    fn test_load_mocks_is_all_or_nothing() {
        let harness = Harness::new();
        let mut session = harness.session(MockerConfig::default());
        let definitions = vec![
            MockDefinition {
                transport: Transport::Http,
                method: Some(HttpMethod::Get),
                url: "/ok".to_string(),
                response: json!(1),
                filter: None,
            },
            MockDefinition {
                transport: Transport::Http,
                method: None,
                url: "/broken".to_string(),
                response: json!(2),
                filter: None,
            },
        ];

        assert!(matches!(
            session.load_mocks(definitions),
            Err(MockError::MissingMethod { .. })
        ));
        assert!(session.mocks().is_empty());
        assert!(harness.originals_restored());
    }

    #[rstest]
    fn test_help_writes_usage_to_logger() {
        let harness = Harness::new();
        let logger = Arc::new(RecordingLogger::default());
        let session = MockSession::new(harness.ambient.clone(), MockerConfig::default())
            .with_logger(logger.clone());

        session.help();

        let lines = logger.lines.lock().unwrap();
        assert_eq!(lines.len(), HELP.len());
        assert!(lines.iter().any(|l| l.contains("mock_http_request")));
        assert!(lines.iter().any(|l| l.contains("clear_all_mocks")));
    }
}
