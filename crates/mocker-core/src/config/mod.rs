//! Session settings and mock fixture files.

pub mod error;
pub mod mock;
pub mod parser;
pub mod settings;
