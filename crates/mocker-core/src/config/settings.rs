//! Session settings.

use serde::{Deserialize, Serialize};

/// How the fetch mechanism serves registered fetch mocks
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FetchDispatch {
    /// Every fetch resolves to the most recently registered payload
    #[default]
    LastRegistered,
    /// Fetches are matched by exact URL; unmatched ones reach the real network
    PerUrl,
}

/// Settings supplied by the host harness.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MockerConfig {
    /// Namespace the session reports under
    pub namespace: String,
    pub fetch_dispatch: FetchDispatch,
}

impl MockerConfig {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    pub fn with_fetch_dispatch(mut self, fetch_dispatch: FetchDispatch) -> Self {
        self.fetch_dispatch = fetch_dispatch;
        self
    }
}

impl Default for MockerConfig {
    fn default() -> Self {
        Self {
            namespace: "launcher".to_string(),
            fetch_dispatch: FetchDispatch::default(),
        }
    }
}
