//! Mock registration and session lifecycle.
//!
//! This module provides:
//! - [`MockRegistry`](registry::MockRegistry): ordered store of registered mocks
//! - [`MockSession`](session::MockSession): owns a registry and keeps its own
//!   interceptor layer on an ambient in sync with it

pub mod registry;
pub mod session;
