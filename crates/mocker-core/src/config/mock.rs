//! Mock definitions as written in fixture files.

use crate::error::MockError;
use crate::expression::{is_expression, unwrap_expression};
use crate::types::entry::MockEntry;
use crate::types::filter::RequestFilter;
use crate::types::request::{HttpMethod, Transport};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Body filter in a fixture: either a `${jmespath}` string or a JSON fragment
/// the request body must contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDefinition {
    Expression(String),
    Body(Value),
}

impl Serialize for FilterDefinition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            FilterDefinition::Expression(expr) => format!("${{{expr}}}").serialize(serializer),
            FilterDefinition::Body(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FilterDefinition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(s) if is_expression(&s) => {
                Ok(FilterDefinition::Expression(unwrap_expression(&s).to_string()))
            }
            other => Ok(FilterDefinition::Body(other)),
        }
    }
}

fn default_transport() -> Transport {
    Transport::Http
}

/// One mock in a fixture file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockDefinition {
    /// Mechanism to mock, `HTTP` when omitted
    #[serde(default = "default_transport")]
    pub transport: Transport,
    /// HTTP method (required for `HTTP` mocks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<HttpMethod>,
    /// Exact URL
    pub url: String,
    /// Response payload
    pub response: Value,
    /// Optional body filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterDefinition>,
}

impl TryFrom<MockDefinition> for MockEntry {
    type Error = MockError;

    fn try_from(definition: MockDefinition) -> Result<Self, Self::Error> {
        let entry = match definition.transport {
            Transport::Http => {
                let method = definition.method.ok_or_else(|| MockError::MissingMethod {
                    url: definition.url.clone(),
                })?;
                MockEntry::http(method, definition.url, &definition.response)?
            }
            Transport::Fetch => MockEntry::fetch(definition.url, &definition.response)?,
        };

        let filter = match definition.filter {
            Some(FilterDefinition::Expression(expr)) => Some(RequestFilter::expression(expr)?),
            Some(FilterDefinition::Body(value)) => Some(RequestFilter::body(value)),
            None => None,
        };

        Ok(match filter {
            Some(filter) => entry.with_filter(filter),
            None => entry,
        })
    }
}
