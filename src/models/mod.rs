//! Declarative resource models the importer can capture.
//!
//! Each resource type the API exposes maps to a [`ModelDescriptor`], a static
//! capability record describing how the matching kennel model is constructed
//! and which fields it accepts. The [`ModelRegistry`] is built once at startup
//! and handed to the importer.

pub mod dashboard;
pub mod monitor;

use serde_json::{Map, Value};

/// A field mapping as returned by the API or produced by normalization
pub type Record = Map<String, Value>;

/// Capability record for one resource type
#[derive(Debug, Clone, Copy)]
pub struct ModelDescriptor {
    /// Constructor the declaration invokes (e.g., "Kennel::Models::Monitor")
    pub name: &'static str,
    /// API path segment and resource-type name (e.g., "monitor")
    pub api_resource: &'static str,
    /// Fields the declaration format recognizes
    pub fields: &'static [&'static str],
    /// Fills in model defaults and drops API-only fields
    pub normalizer: fn(&Record) -> Record,
}

impl ModelDescriptor {
    /// Check if the declaration format accepts this field
    pub fn recognizes(&self, field: &str) -> bool {
        self.fields.contains(&field)
    }

    /// Run the model's normalization, leaving the input untouched
    pub fn normalize(&self, record: &Record) -> Record {
        (self.normalizer)(record)
    }
}

/// Registry of models, looked up by resource-type name.
///
/// Registration order is kept so bulk imports visit types deterministically.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: Vec<ModelDescriptor>,
}

impl ModelRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { models: Vec::new() }
    }

    /// Create a registry with all built-in models
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(monitor::MONITOR);
        registry.register(dashboard::DASH);
        registry.register(dashboard::SCREEN);
        registry.register(dashboard::DASHBOARD);
        registry
    }

    /// Register a model, replacing any model with the same resource name
    pub fn register(&mut self, model: ModelDescriptor) -> &mut Self {
        match self
            .models
            .iter_mut()
            .find(|m| m.api_resource == model.api_resource)
        {
            Some(existing) => *existing = model,
            None => self.models.push(model),
        }
        self
    }

    /// Get a model by resource-type name
    pub fn get(&self, resource: &str) -> Option<&ModelDescriptor> {
        self.models.iter().find(|m| m.api_resource == resource)
    }

    /// Check if a resource type has a registered model
    pub fn is_supported(&self, resource: &str) -> bool {
        self.get(resource).is_some()
    }

    /// Resource-type names in registration order
    pub fn api_resources(&self) -> Vec<&'static str> {
        self.models.iter().map(|m| m.api_resource).collect()
    }
}

/// Copy of `record` without the listed keys
pub(crate) fn without_keys(record: &Record, keys: &[&str]) -> Record {
    record
        .iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
