//! Turns a raw API record into a canonical record ready for printing.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use super::error::{ImportError, ImportResult};
use crate::models::{ModelDescriptor, Record};

/// Fields a kennel id can be derived from, in priority order
pub const TITLE_FIELDS: [&str; 3] = ["name", "title", "board_title"];

/// Monitor fields whose API value `true` is already the kennel default
const MONITOR_TRUE_DEFAULTS: [&str; 2] = ["notify_no_data", "notify_audit"];

lazy_static! {
    static ref UNSUPPORTED_SLUG_CHARS: Regex =
        Regex::new(r"[^a-z0-9\-_]+").expect("Invalid slug pattern regex");
    static ref REPEATED_DASHES: Regex = Regex::new(r"-{2,}").expect("Invalid dash pattern regex");
}

/// Normalize one raw record of `resource` with its model.
///
/// The raw record is consumed; the model's normalization works on a copy so
/// nothing it does leaks back into the fetched data.
pub fn normalize(resource: &str, model: &ModelDescriptor, raw: Record) -> ImportResult<Record> {
    let data = unwrap_resource(resource, raw);

    let id = data
        .get("id")
        .filter(|id| !id.is_null())
        .cloned()
        .ok_or_else(|| ImportError::MissingIdentifier {
            resource: resource.to_string(),
        })?;

    let mut record = model.normalize(&data);
    record.insert("id".to_string(), id.clone());

    let kennel_id = kennel_id(&record).ok_or_else(|| ImportError::TitleMissing {
        resource: resource.to_string(),
        id: id_label(&id),
    })?;
    record.insert("kennel_id".to_string(), Value::String(kennel_id));

    if resource == "monitor" {
        record = flatten_monitor(record, model);
    }

    Ok(record)
}

/// Derive the kennel id from the first present title field
pub fn kennel_id(record: &Record) -> Option<String> {
    TITLE_FIELDS
        .iter()
        .find_map(|field| record.get(*field).filter(|value| is_truthy(value)))
        .map(|title| match title {
            Value::String(text) => parameterize(text),
            other => parameterize(&other.to_string()),
        })
}

/// Lowercase slug safe for file names and ruby identifiers
pub fn parameterize(value: &str) -> String {
    let lowered = value.to_lowercase().replace('/', "_");
    let dashed = UNSUPPORTED_SLUG_CHARS.replace_all(&lowered, "-");
    let collapsed = REPEATED_DASHES.replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}

/// Rewrite a trailing `> 5` style comparison to reference the critical threshold.
///
/// This is a textual heuristic: it only fires when a line of the query ends
/// with a comparison against the exact float or integer rendering of `critical`.
/// Only the first such comparison is rewritten.
pub fn link_critical_threshold(query: &str, critical: &Value) -> Option<String> {
    let threshold = match critical {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    let pattern = format!(
        r"(?m)([><=]) ({}|{})$",
        regex::escape(&float_literal(threshold)),
        regex::escape(&(threshold.trunc() as i64).to_string())
    );
    let regex = Regex::new(&pattern).ok()?;

    regex
        .is_match(query)
        .then(|| regex.replacen(query, 1, "${1} #{critical}").into_owned())
}

fn unwrap_resource(resource: &str, mut raw: Record) -> Record {
    match raw.remove(resource) {
        Some(Value::Object(inner)) => inner,
        Some(other) => {
            raw.insert(resource.to_string(), other);
            raw
        }
        None => raw,
    }
}

fn flatten_monitor(mut record: Record, model: &ModelDescriptor) -> Record {
    for nested in ["options", "thresholds"] {
        if let Some(Value::Object(inner)) = record.remove(nested) {
            record.extend(inner);
        }
    }

    for key in MONITOR_TRUE_DEFAULTS {
        if record.get(key).is_some_and(is_truthy) {
            record.remove(key);
        }
    }

    record.retain(|key, _| model.recognizes(key));

    let linked = match (record.get("query"), record.get("critical")) {
        (Some(Value::String(query)), Some(critical)) => link_critical_threshold(query, critical),
        _ => None,
    };
    if let Some(query) = linked {
        record.insert("query".to_string(), Value::String(query));
    }

    record
}

/// `null` and `false` count as absent
fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Null | Value::Bool(false))
}

/// Float rendering with a mandatory fractional part (5 -> "5.0")
fn float_literal(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn id_label(id: &Value) -> String {
    match id {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
