//! Logging collaborator used for help output.

/// Sink for human-readable messages.
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
}

/// Writes messages as `tracing` events tagged with the session namespace.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    namespace: String,
}

impl TracingLogger {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }
}

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!(namespace = %self.namespace, "{message}");
    }
}
