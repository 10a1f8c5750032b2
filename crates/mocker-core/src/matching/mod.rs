//! Request body matching utilities.

mod body;

pub use body::body_contains;
