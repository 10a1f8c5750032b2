//! Structural containment of an expected JSON fragment within a request body.

use serde_json::Value;

/// Check whether `expected` is structurally contained in the request `body`.
///
/// Objects match when every expected key is present with a contained value,
/// arrays match when every expected element is contained in some body element,
/// everything else compares by equality. A `null` or empty-object expectation
/// matches any body, including a missing one.
pub fn body_contains(body: Option<&Value>, expected: &Value) -> bool {
    match expected {
        Value::Null => return true,
        Value::Object(o) if o.is_empty() => return true,
        _ => {}
    }

    match body {
        None | Some(Value::Null) => false,
        Some(body) => value_contains(body, expected),
    }
}

fn value_contains(target: &Value, subset: &Value) -> bool {
    match (target, subset) {
        (Value::Object(t), Value::Object(s)) => s
            .iter()
            .all(|(k, sv)| t.get(k).is_some_and(|tv| value_contains(tv, sv))),
        (Value::Array(t), Value::Array(s)) => s
            .iter()
            .all(|sv| t.iter().any(|tv| value_contains(tv, sv))),
        _ => target == subset,
    }
}
