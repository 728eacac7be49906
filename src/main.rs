mod api;
mod commands;
mod config;
mod context;
mod import;
mod models;
mod output;
mod traits;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::ImportCommand;
use context::Context;

#[derive(Parser)]
#[command(name = "kennel")]
#[command(about = "Capture existing Datadog monitors and dashboards as kennel declarations", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import existing resources (prints declarations to stdout)
    Import(ImportCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = Context::new();

    let result = match cli.command {
        Commands::Import(command) => command.execute(&ctx).await,
    };

    if let Err(err) = result {
        ctx.output.error(&format!("{:#}", err));
        std::process::exit(1);
    }

    Ok(())
}
