//! Fetcher: list/show calls against the monitoring API.

pub mod datadog;
#[cfg(test)]
pub mod mock;

pub use datadog::DatadogClient;
#[cfg(test)]
pub use mock::{MockApi, MockCall};

use std::future::Future;

use serde_json::Value;

use crate::import::error::{ImportError, ImportResult};
use crate::models::Record;

/// Filters for a list call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListOptions {
    /// Include downtime details attached to monitors
    pub with_downtimes: bool,
    /// Only resources whose name contains this text
    pub name: Option<String>,
    /// Only monitors carrying all of these tags
    pub monitor_tags: Vec<String>,
}

impl ListOptions {
    /// Query parameters for this filter set
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("with_downtimes", self.with_downtimes.to_string())];

        if let Some(name) = &self.name {
            params.push(("name", name.clone()));
        }

        if !self.monitor_tags.is_empty() {
            params.push(("monitor_tags", self.monitor_tags.join(",")));
        }

        params
    }
}

/// Trait for the remote API, allowing for mocking in tests
pub trait ResourceApi: Send + Sync {
    /// List all resources of a type
    fn list(
        &self,
        resource: &str,
        options: &ListOptions,
    ) -> impl Future<Output = ImportResult<Value>> + Send;

    /// Fetch a single resource by id
    fn show(&self, resource: &str, id: &str) -> impl Future<Output = ImportResult<Value>> + Send;
}

/// Turn a list response into records.
///
/// Some endpoints wrap the collection under a key (`{"dashes": [...]}`),
/// possibly next to metadata such as a count. The array-valued entry is
/// unwrapped and its ids coerced to integers.
pub fn unwrap_list(resource: &str, response: Value) -> ImportResult<Vec<Record>> {
    match response {
        Value::Array(items) => items.into_iter().map(into_record).collect(),
        Value::Object(wrapper) if wrapper.is_empty() => Ok(Vec::new()),
        Value::Object(wrapper) => {
            let list = wrapper.into_iter().map(|(_, value)| value).find(Value::is_array);
            let Some(Value::Array(items)) = list else {
                return Err(ImportError::Serialization(format!(
                    "Expected a list of {} resources",
                    resource
                )));
            };

            items
                .into_iter()
                .map(|item| with_integer_id(resource, item))
                .collect()
        }
        other => Err(ImportError::Serialization(format!(
            "Unexpected {} list response: {}",
            resource, other
        ))),
    }
}

/// Turn a single-resource response into a record
pub fn into_record(value: Value) -> ImportResult<Record> {
    match value {
        Value::Object(record) => Ok(record),
        other => Err(ImportError::Serialization(format!(
            "Expected a resource object, got: {}",
            other
        ))),
    }
}

fn with_integer_id(resource: &str, item: Value) -> ImportResult<Record> {
    let mut record = into_record(item)?;

    let id = record
        .remove("id")
        .filter(|id| !id.is_null())
        .ok_or_else(|| ImportError::MissingIdentifier {
            resource: resource.to_string(),
        })?;
    record.insert("id".to_string(), coerce_id(id));

    Ok(record)
}

/// Numeric ids become integers; opaque string ids (e.g. "abc-def-ghi") stay strings
fn coerce_id(id: Value) -> Value {
    let coerced = match &id {
        Value::Number(number) if number.is_f64() => number
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| Value::from(f as i64)),
        Value::String(text) => text.trim().parse::<i64>().ok().map(Value::from),
        _ => None,
    };

    coerced.unwrap_or(id)
}
