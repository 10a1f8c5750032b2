//! JMESPath expression utilities for request body filters.

use jmespath::Variable;
use serde_json::Value;
use std::rc::Rc;

/// Check whether a fixture string is an expression in `${...}` form.
pub fn is_expression(s: &str) -> bool {
    s.starts_with("${") && s.ends_with('}') && s.len() > 3
}

/// Strip the `${` `}` wrapper from an expression string.
pub fn unwrap_expression(s: &str) -> &str {
    s.strip_prefix("${")
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(s)
}

/// Compile an expression without evaluating it.
pub fn validate_expression(expression: &str) -> Result<(), String> {
    jmespath::compile(expression)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// Convert serde_json::Value to jmespath::Variable.
pub fn value_to_variable(value: &Value) -> Rc<Variable> {
    match value {
        Value::Null => Rc::new(Variable::Null),
        Value::Bool(b) => Rc::new(Variable::Bool(*b)),
        Value::Number(n) => Rc::new(Variable::Number(n.clone())),
        Value::String(s) => Rc::new(Variable::String(s.clone())),
        Value::Array(arr) => {
            let vars: Vec<Rc<Variable>> = arr.iter().map(value_to_variable).collect();
            Rc::new(Variable::Array(vars))
        }
        Value::Object(obj) => {
            let map: std::collections::BTreeMap<String, Rc<Variable>> = obj
                .iter()
                .map(|(k, v)| (k.clone(), value_to_variable(v)))
                .collect();
            Rc::new(Variable::Object(map))
        }
    }
}

/// Convert jmespath::Variable to serde_json::Value.
pub fn variable_to_value(var: &Rc<Variable>) -> Result<Value, String> {
    match var.as_ref() {
        Variable::Null => Ok(Value::Null),
        Variable::Bool(b) => Ok(Value::Bool(*b)),
        Variable::Number(n) => Ok(Value::Number(n.clone())),
        Variable::String(s) => Ok(Value::String(s.clone())),
        Variable::Array(arr) => {
            let values: Result<Vec<Value>, String> = arr.iter().map(variable_to_value).collect();
            Ok(Value::Array(values?))
        }
        Variable::Object(obj) => {
            let map: Result<serde_json::Map<String, Value>, String> = obj
                .iter()
                .map(|(k, v)| variable_to_value(v).map(|val| (k.clone(), val)))
                .collect();
            Ok(Value::Object(map?))
        }
        Variable::Expref(_) => Err("Expression references not supported".to_string()),
    }
}

/// JMESPath truthiness of an evaluated result.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Evaluate an expression against a request body.
///
/// Any failure (compile, search, conversion) counts as "no match".
pub fn match_with_jmespath(expression: &str, data: &Value) -> bool {
    let Ok(expr) = jmespath::compile(expression) else {
        return false;
    };

    let data_var = value_to_variable(data);
    let Ok(result) = expr.search(&data_var) else {
        return false;
    };

    variable_to_value(&result)
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
}
