use std::sync::Arc;

use futures::future::{join_all, try_join_all};

use super::error::{ImportError, ImportResult};
use super::normalizer::normalize;
use super::printer::render_declaration;
use crate::api::{ListOptions, ResourceApi, into_record, unwrap_list};
use crate::config::ImportConfig;
use crate::models::{ModelDescriptor, ModelRegistry, Record};
use crate::traits::Output;

/// Legacy resource names and the name the API answers to today
const RESOURCE_ALIASES: &[(&str, &str)] = &[("dash", "screen")];

/// Separator between declarations in a bulk import
const DECLARATION_SEPARATOR: &str = ",\n";

/// Result of a bulk import
#[derive(Debug)]
pub struct BulkImport {
    /// All declarations joined with `,\n`
    pub text: String,
    /// Number of declarations in `text`
    pub declarations: usize,
    /// Resource types that failed, only populated with `continue_on_error`
    pub failures: Vec<TypeFailure>,
}

/// A resource type whose import failed during an isolated bulk import
#[derive(Debug)]
pub struct TypeFailure {
    pub resource: String,
    pub error: ImportError,
}

/// Ties fetching, normalization and printing together
pub struct Importer<A: ResourceApi> {
    api: A,
    registry: Arc<ModelRegistry>,
    config: ImportConfig,
    output: Arc<dyn Output>,
}

impl<A: ResourceApi> Importer<A> {
    pub fn new(
        api: A,
        registry: Arc<ModelRegistry>,
        config: ImportConfig,
        output: Arc<dyn Output>,
    ) -> Self {
        Self {
            api,
            registry,
            config,
            output,
        }
    }

    /// Import every resource of the configured (or all registered) types.
    ///
    /// Types are fetched concurrently; declarations are grouped by type in
    /// the order the types were requested, regardless of which fetch finishes
    /// first. Any failure aborts the import unless `continue_on_error` is set.
    pub async fn import_all(&self) -> ImportResult<BulkImport> {
        let resources = self.resources_to_import();
        let tasks = resources.iter().map(|resource| self.import_type(resource));

        let mut failures = Vec::new();
        let per_type: Vec<Vec<String>> = if self.config.continue_on_error {
            join_all(tasks)
                .await
                .into_iter()
                .zip(&resources)
                .filter_map(|(result, resource)| match result {
                    Ok(declarations) => Some(declarations),
                    Err(error) => {
                        self.output
                            .warning(&format!("Skipping {}: {}", resource, error));
                        failures.push(TypeFailure {
                            resource: resource.clone(),
                            error,
                        });
                        None
                    }
                })
                .collect()
        } else {
            try_join_all(tasks).await?
        };

        let declarations: Vec<String> = per_type.into_iter().flatten().collect();

        Ok(BulkImport {
            text: declarations.join(DECLARATION_SEPARATOR),
            declarations: declarations.len(),
            failures,
        })
    }

    /// Import a single resource by id.
    ///
    /// When a legacy resource name (`dash`) is answered with "no match", the
    /// fetch is attempted exactly once more under its current name (`screen`).
    pub async fn import(&self, resource: &str, id: &str) -> ImportResult<String> {
        let (resource, record) = match self.fetch(resource, id).await {
            Ok(record) => (resource, record),
            Err(error) => {
                let Some(fallback) = alias_fallback(resource, &error) else {
                    return Err(error);
                };

                self.output.warning(&format!(
                    "No {} with id {}, retrying as {}",
                    resource, id, fallback
                ));
                (fallback, self.fetch(fallback, id).await?)
            }
        };

        convert(resource, self.model(resource)?, record)
    }

    async fn import_type(&self, resource: &str) -> ImportResult<Vec<String>> {
        let model = self.model(resource)?;
        self.output.dimmed(&format!("Fetching {} resources", resource));

        // downtime details are noise in a declaration
        let options = ListOptions {
            with_downtimes: false,
            name: self.config.name.clone(),
            monitor_tags: self.config.tags.clone(),
        };
        let response = self.api.list(model.api_resource, &options).await?;

        unwrap_list(resource, response)?
            .into_iter()
            .map(|record| convert(resource, model, record).map(|d| d.trim().to_string()))
            .collect()
    }

    async fn fetch(&self, resource: &str, id: &str) -> ImportResult<Record> {
        let model = self.model(resource)?;
        into_record(self.api.show(model.api_resource, id).await?)
    }

    fn model(&self, resource: &str) -> ImportResult<&ModelDescriptor> {
        self.registry
            .get(resource)
            .ok_or_else(|| ImportError::UnsupportedResource(resource.to_string()))
    }

    fn resources_to_import(&self) -> Vec<String> {
        let requested = match &self.config.resources {
            Some(resources) => resources.clone(),
            None => self
                .registry
                .api_resources()
                .into_iter()
                .map(str::to_string)
                .collect(),
        };

        let mut unique = Vec::with_capacity(requested.len());
        for resource in requested {
            if !unique.contains(&resource) {
                unique.push(resource);
            }
        }
        unique
    }
}

/// The name a failed single fetch may be retried under, if any
pub fn alias_fallback(resource: &str, error: &ImportError) -> Option<&'static str> {
    if !error.is_no_match() {
        return None;
    }

    RESOURCE_ALIASES
        .iter()
        .find(|(legacy, _)| *legacy == resource)
        .map(|(_, current)| *current)
}

fn convert(resource: &str, model: &ModelDescriptor, record: Record) -> ImportResult<String> {
    let canonical = normalize(resource, model, record)?;
    render_declaration(model, &canonical)
}
