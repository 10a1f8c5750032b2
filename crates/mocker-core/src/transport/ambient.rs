//! Swappable slots for the process-wide request mechanisms.

use crate::error::TransportError;
use crate::intercept::Layer;
use crate::transport::{FetchRequest, FetchResponse, FetchTransport, HttpRequest, HttpTransport};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Identifier of a session's layer; higher ids sit closer to the caller.
pub(crate) type LayerId = u64;

/// Currently installed request mechanisms.
///
/// Page code issues requests through `Ambient`; mock sessions contribute
/// interceptor layers over the base transports passed to [`Ambient::new`].
/// The installed chain is rebuilt from the base on every layer change, so
/// with no layers left the base transports are installed again as-is.
/// Installs are whole-`Arc` swaps, so a request already created or a fetch
/// already started keeps the transport it began with.
pub struct Ambient {
    base_http: Arc<dyn HttpTransport>,
    base_fetch: Arc<dyn FetchTransport>,
    layers: Mutex<BTreeMap<LayerId, Layer>>,
    next_layer: AtomicU64,
    http: RwLock<Arc<dyn HttpTransport>>,
    fetch: RwLock<Arc<dyn FetchTransport>>,
}

impl Ambient {
    pub fn new(http: Arc<dyn HttpTransport>, fetch: Arc<dyn FetchTransport>) -> Self {
        Self {
            base_http: http.clone(),
            base_fetch: fetch.clone(),
            layers: Mutex::new(BTreeMap::new()),
            next_layer: AtomicU64::new(0),
            http: RwLock::new(http),
            fetch: RwLock::new(fetch),
        }
    }

    /// Installed request-object constructor
    pub fn http_transport(&self) -> Arc<dyn HttpTransport> {
        self.http
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Installed fetch function
    pub fn fetch_transport(&self) -> Arc<dyn FetchTransport> {
        self.fetch
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of sessions currently contributing interceptors.
    pub fn layer_count(&self) -> usize {
        self.layers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Construct a request object with the installed constructor.
    pub fn new_request(&self) -> Box<dyn HttpRequest> {
        self.http_transport().create()
    }

    /// Issue a fetch through the installed fetch function.
    pub async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, TransportError> {
        let transport = self.fetch_transport();
        transport.fetch(request).await
    }

    pub(crate) fn allocate_layer(&self) -> LayerId {
        self.next_layer.fetch_add(1, Ordering::Relaxed)
    }

    /// Replace the layer registered under `id`. An empty layer is removed.
    pub(crate) fn set_layer(&self, id: LayerId, layer: Layer) {
        let mut layers = self.layers.lock().unwrap_or_else(PoisonError::into_inner);
        if layer.is_empty() {
            layers.remove(&id);
        } else {
            layers.insert(id, layer);
        }
        self.rebuild(&layers);
    }

    pub(crate) fn remove_layer(&self, id: LayerId) {
        self.set_layer(id, Layer::default());
    }

    /// Install the chain base -> lowest id -> ... -> highest id.
    fn rebuild(&self, layers: &BTreeMap<LayerId, Layer>) {
        let http = layers
            .values()
            .fold(self.base_http.clone(), |below, layer| layer.wrap_http(below));
        let fetch = layers
            .values()
            .fold(self.base_fetch.clone(), |below, layer| layer.wrap_fetch(below));
        tracing::debug!(layers = layers.len(), "rebuilt interceptor chain");
        *self.http.write().unwrap_or_else(PoisonError::into_inner) = http;
        *self.fetch.write().unwrap_or_else(PoisonError::into_inner) = fetch;
    }
}

impl std::fmt::Debug for Ambient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ambient")
            .field("layers", &self.layer_count())
            .finish_non_exhaustive()
    }
}
