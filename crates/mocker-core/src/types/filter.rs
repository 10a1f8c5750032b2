//! Request body filters that decide whether a matched mock is served.

use crate::error::MockError;
use crate::expression::{match_with_jmespath, validate_expression};
use crate::matching::body_contains;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type Predicate = dyn Fn(Option<&Value>) -> bool + Send + Sync;

/// Predicate over the request body.
///
/// When a filter rejects the body, the mock is bypassed and the request goes
/// to the real transport.
#[derive(Clone)]
pub enum RequestFilter {
    /// Arbitrary closure
    Predicate(Arc<Predicate>),
    /// JMESPath expression evaluated against the body; truthy result accepts
    Expression(String),
    /// JSON fragment that must be contained in the body
    Body(Value),
}

impl RequestFilter {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    {
        RequestFilter::Predicate(Arc::new(f))
    }

    /// Build an expression filter, rejecting expressions that do not compile.
    pub fn expression(expression: impl Into<String>) -> Result<Self, MockError> {
        let expression = expression.into();
        validate_expression(&expression).map_err(|reason| MockError::InvalidExpression {
            expression: expression.clone(),
            reason,
        })?;
        Ok(RequestFilter::Expression(expression))
    }

    pub fn body(expected: Value) -> Self {
        RequestFilter::Body(expected)
    }

    pub fn accepts(&self, body: Option<&Value>) -> bool {
        match self {
            RequestFilter::Predicate(f) => f(body),
            RequestFilter::Expression(expr) => {
                match_with_jmespath(expr, body.unwrap_or(&Value::Null))
            }
            RequestFilter::Body(expected) => body_contains(body, expected),
        }
    }
}

impl fmt::Debug for RequestFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFilter::Predicate(_) => f.write_str("Predicate(<fn>)"),
            RequestFilter::Expression(expr) => f.debug_tuple("Expression").field(expr).finish(),
            RequestFilter::Body(expected) => f.debug_tuple("Body").field(expected).finish(),
        }
    }
}
