//! Dashboard-like models: legacy timeboards (`dash`), screenboards (`screen`)
//! and the unified `dashboard` API.

use super::{ModelDescriptor, Record, without_keys};

pub const DASH: ModelDescriptor = ModelDescriptor {
    name: "Kennel::Models::Dash",
    api_resource: "dash",
    fields: &[
        "id",
        "kennel_id",
        "title",
        "description",
        "template_variables",
        "graphs",
        "read_only",
    ],
    normalizer: normalize,
};

pub const SCREEN: ModelDescriptor = ModelDescriptor {
    name: "Kennel::Models::Screen",
    api_resource: "screen",
    fields: &[
        "id",
        "kennel_id",
        "board_title",
        "description",
        "template_variables",
        "widgets",
        "read_only",
    ],
    normalizer: normalize,
};

pub const DASHBOARD: ModelDescriptor = ModelDescriptor {
    name: "Kennel::Models::Dashboard",
    api_resource: "dashboard",
    fields: &[
        "id",
        "kennel_id",
        "title",
        "description",
        "template_variables",
        "template_variable_presets",
        "layout_type",
        "reflow_type",
        "widgets",
        "notify_list",
        "is_read_only",
    ],
    normalizer: normalize,
};

const READONLY_FIELDS: &[&str] = &[
    "author_handle",
    "author_name",
    "created",
    "created_at",
    "created_by",
    "modified",
    "modified_at",
    "new_id",
    "resource",
    "url",
];

fn normalize(record: &Record) -> Record {
    let mut normalized = without_keys(record, READONLY_FIELDS);

    // empty variable lists are the model default
    if normalized
        .get("template_variables")
        .and_then(|v| v.as_array())
        .is_some_and(|v| v.is_empty())
    {
        normalized.remove("template_variables");
    }

    normalized
}
