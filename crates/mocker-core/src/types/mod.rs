//! Core domain types for mock entries, filters and request mechanisms.

pub mod entry;
pub mod filter;
pub mod request;
