//! Registry of active mock entries.
//!
//! This module provides `MockRegistry` which stores mocks in registration order.
//! It is used by `MockSession` to build the interceptors installed over the
//! ambient transports.

use crate::types::entry::{first_match, MockEntry};
use crate::types::request::{HttpMethod, Transport};
use std::sync::Arc;

/// Ordered set of registered mocks.
///
/// Duplicate method/URL pairs are allowed; lookups return the earliest entry.
#[derive(Debug, Clone, Default)]
pub struct MockRegistry {
    entries: Vec<MockEntry>,
}

impl MockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a mock
    pub fn add(&mut self, entry: MockEntry) {
        self.entries.push(entry);
    }

    /// Remove the earliest entry matching `method` and `url`.
    ///
    /// Entries without a method (fetch mocks) match on URL alone.
    pub fn remove_first(&mut self, method: Option<HttpMethod>, url: &str) -> Option<MockEntry> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.matches_key(method, url))?;
        Some(self.entries.remove(index))
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn list(&self) -> &[MockEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry structurally matching a request.
    pub fn find(
        &self,
        transport: Transport,
        method: Option<HttpMethod>,
        url: &str,
    ) -> Option<&MockEntry> {
        first_match(&self.entries, transport, method, url)
    }

    /// Most recently registered entry for a transport.
    pub fn last(&self, transport: Transport) -> Option<&MockEntry> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.transport == transport)
    }

    pub fn has_transport(&self, transport: Transport) -> bool {
        self.entries.iter().any(|entry| entry.transport == transport)
    }

    /// Shared copy of the entries for one transport, in registration order.
    pub fn snapshot(&self, transport: Transport) -> Arc<[MockEntry]> {
        self.entries
            .iter()
            .filter(|entry| entry.transport == transport)
            .cloned()
            .collect()
    }
}
