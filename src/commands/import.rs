use anyhow::{Result, bail};
use clap::{Args, Subcommand};

use crate::api::{DatadogClient, ResourceApi};
use crate::config::ImportConfig;
use crate::context::Context;
use crate::import::Importer;

/// Capture existing Datadog resources as kennel declarations
#[derive(Debug, Args)]
pub struct ImportCommand {
    #[command(flatten)]
    credentials: CredentialArgs,

    #[command(subcommand)]
    subcommand: ImportSubcommand,
}

#[derive(Debug, Args)]
struct CredentialArgs {
    /// Datadog API key
    #[arg(long, env = "DATADOG_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Datadog application key
    #[arg(long, env = "DATADOG_APP_KEY", hide_env_values = true)]
    app_key: String,

    /// Datadog site subdomain (e.g. "app", "us3")
    #[arg(long, env = "DATADOG_SUBDOMAIN", default_value = "app")]
    subdomain: String,
}

#[derive(Debug, Subcommand)]
enum ImportSubcommand {
    /// Import every resource of the selected types
    All(AllImportArgs),

    /// Import a single resource by id
    Resource(ResourceImportArgs),
}

#[derive(Debug, Args)]
struct AllImportArgs {
    /// Resource types to import (comma-separated, defaults to all)
    #[arg(long, env = "RESOURCE")]
    resource: Option<String>,

    /// Only import resources with these tags (comma-separated)
    #[arg(long, env = "TAGS")]
    tags: Option<String>,

    /// Only import resources whose name contains this text
    #[arg(long, env = "NAME")]
    name: Option<String>,

    /// Keep importing other resource types when one fails
    #[arg(long)]
    continue_on_error: bool,
}

#[derive(Debug, Args)]
struct ResourceImportArgs {
    /// Resource type (e.g. monitor, dash, screen, dashboard)
    resource: String,

    /// Resource id
    id: String,
}

impl ImportCommand {
    pub async fn execute(self, ctx: &Context) -> Result<()> {
        let client = DatadogClient::new(
            &self.credentials.api_key,
            &self.credentials.app_key,
            &self.credentials.subdomain,
        )?;

        match self.subcommand {
            ImportSubcommand::All(args) => Self::import_all(ctx, client, args).await,
            ImportSubcommand::Resource(args) => Self::import_resource(ctx, client, args).await,
        }
    }

    async fn import_all<A: ResourceApi>(ctx: &Context, api: A, args: AllImportArgs) -> Result<()> {
        let config = ImportConfig::from_filters(
            args.resource.as_deref(),
            args.tags.as_deref(),
            args.name.as_deref(),
        )
        .with_continue_on_error(args.continue_on_error);

        if let Some(resources) = &config.resources {
            let unsupported: Vec<&str> = resources
                .iter()
                .map(String::as_str)
                .filter(|resource| !ctx.registry.is_supported(resource))
                .collect();
            if !unsupported.is_empty() {
                bail!(
                    "Unsupported resource type: {} (supported: {})",
                    unsupported.join(", "),
                    ctx.registry.api_resources().join(", ")
                );
            }

            ctx.output.info(&format!("Importing {}", resources.join(", ")));
        } else {
            ctx.output.info("Importing all supported resource types");
        }

        let importer = Importer::new(api, ctx.registry.clone(), config, ctx.output.clone());
        let result = importer.import_all().await?;

        println!("{}", result.text);
        ctx.output
            .key_value("Declarations", &result.declarations.to_string());

        if !result.failures.is_empty() {
            let failed: Vec<String> = result
                .failures
                .iter()
                .map(|f| format!("{} ({})", f.resource, f.error))
                .collect();
            bail!("Failed to import: {}", failed.join(", "));
        }

        ctx.output.success("Import completed");
        Ok(())
    }

    async fn import_resource<A: ResourceApi>(
        ctx: &Context,
        api: A,
        args: ResourceImportArgs,
    ) -> Result<()> {
        let importer = Importer::new(
            api,
            ctx.registry.clone(),
            ImportConfig::default(),
            ctx.output.clone(),
        );
        let declaration = importer.import(&args.resource, &args.id).await?;

        print!("{}", declaration);
        ctx.output
            .success(&format!("Imported {} {}", args.resource, args.id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApi;
    use serde_json::json;

    #[tokio::test]
    async fn test_import_all_reports_failed_types() {
        let ctx = Context::test();
        let api = MockApi::new()
            .on_list("monitor", Err((500, "Internal error".to_string())))
            .on_list("dash", Ok(json!({"dashes": []})));
        let args = AllImportArgs {
            resource: Some("monitor,dash".to_string()),
            tags: None,
            name: None,
            continue_on_error: true,
        };

        let result = ImportCommand::import_all(&ctx, api, args).await;

        let error = result.unwrap_err();
        assert_eq!(
            error.to_string(),
            "Failed to import: monitor (Error 500 during GET /api/v1/monitor: Internal error)"
        );
    }

    #[tokio::test]
    async fn test_import_all_rejects_unknown_types_before_fetching() {
        let ctx = Context::test();
        let api = MockApi::new();
        let args = AllImportArgs {
            resource: Some("monitor, widget".to_string()),
            tags: None,
            name: None,
            continue_on_error: true,
        };

        let result = ImportCommand::import_all(&ctx, api, args).await;

        assert_eq!(
            result.unwrap_err().to_string(),
            "Unsupported resource type: widget (supported: monitor, dash, screen, dashboard)"
        );
    }

    #[tokio::test]
    async fn test_import_resource_propagates_import_error() {
        let ctx = Context::test();
        let args = ResourceImportArgs {
            resource: "widget".to_string(),
            id: "1".to_string(),
        };

        let result = ImportCommand::import_resource(&ctx, MockApi::new(), args).await;

        assert_eq!(result.unwrap_err().to_string(), "widget is not supported");
    }

    #[tokio::test]
    async fn test_import_resource_success() {
        let ctx = Context::test();
        let api = MockApi::new().on_show("monitor", "3", Ok(json!({"id": 3, "name": "Disk"})));
        let args = ResourceImportArgs {
            resource: "monitor".to_string(),
            id: "3".to_string(),
        };

        assert!(
            ImportCommand::import_resource(&ctx, api, args)
                .await
                .is_ok()
        );
    }
}
