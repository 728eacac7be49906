use serde_json::{Value, json};

use super::{ModelDescriptor, Record, without_keys};

pub const MONITOR: ModelDescriptor = ModelDescriptor {
    name: "Kennel::Models::Monitor",
    api_resource: "monitor",
    fields: FIELDS,
    normalizer: normalize,
};

const FIELDS: &[&str] = &[
    "id",
    "kennel_id",
    "name",
    "type",
    "tags",
    "query",
    "message",
    "escalation_message",
    "priority",
    "critical",
    "warning",
    "ok",
    "critical_recovery",
    "warning_recovery",
    "timeout_h",
    "evaluation_delay",
    "new_host_delay",
    "new_group_delay",
    "no_data_timeframe",
    "notify_no_data",
    "notify_audit",
    "renotify_interval",
    "renotify_occurrences",
    "renotify_statuses",
    "require_full_window",
    "threshold_windows",
    "include_tags",
    "groupby_simple_monitor",
    "notify_by",
    "on_missing_data",
    "group_retention_duration",
    "scheduling_options",
    "variables",
];

/// Fields only the API writes
const READONLY_FIELDS: &[&str] = &[
    "created",
    "created_at",
    "creator",
    "deleted",
    "matching_downtimes",
    "modified",
    "multi",
    "org_id",
    "overall_state",
    "overall_state_modified",
    "state",
];

/// Option values kennel fills in on its own
fn option_defaults() -> [(&'static str, Value); 5] {
    [
        ("silenced", json!({})),
        ("include_tags", json!(true)),
        ("timeout_h", json!(0)),
        ("renotify_interval", json!(0)),
        ("new_host_delay", json!(300)),
    ]
}

fn normalize(record: &Record) -> Record {
    let mut normalized = without_keys(record, READONLY_FIELDS);

    if let Some(Value::Object(options)) = normalized.get_mut("options") {
        for (key, default) in option_defaults() {
            if options.get(key) == Some(&default) {
                options.remove(key);
            }
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_drops_readonly_fields() {
        let record: Record = serde_json::from_str(
            r#"{"id": 1, "name": "cpu", "creator": {"id": 2}, "overall_state": "OK", "modified": "2024-01-01"}"#,
        )
        .unwrap();

        let normalized = MONITOR.normalize(&record);

        assert_eq!(normalized.len(), 2);
        assert!(normalized.contains_key("name"));
        assert!(record.contains_key("creator"));
    }

    #[test]
    fn test_normalize_drops_default_options() {
        let record: Record = serde_json::from_str(
            r#"{"id": 1, "options": {"silenced": {}, "timeout_h": 0, "new_host_delay": 600, "include_tags": false}}"#,
        )
        .unwrap();

        let normalized = MONITOR.normalize(&record);
        let options = normalized["options"].as_object().unwrap();

        assert!(!options.contains_key("silenced"));
        assert!(!options.contains_key("timeout_h"));
        assert_eq!(options["new_host_delay"], json!(600));
        assert_eq!(options["include_tags"], json!(false));
    }

    #[test]
    fn test_monitor_recognizes_fields() {
        assert!(MONITOR.recognizes("critical"));
        assert!(MONITOR.recognizes("kennel_id"));
        assert!(!MONITOR.recognizes("options"));
        assert!(!MONITOR.recognizes("silenced"));
    }
}
