use anyhow::Context;
use catalog_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Operator tooling for the catalog service
#[derive(Debug, Parser)]
#[command(name = "catalog-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP service until Ctrl-C or SIGTERM
    Serve,
    /// Print the effective configuration as JSON
    Config,
    /// Check that the document store is reachable
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;

    match cli.command {
        Command::Serve => {
            catalog_telemetry::init(&settings.telemetry);
            catalog_service::run(settings).await
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{rendered}");
            Ok(())
        }
        Command::Ping => {
            catalog_telemetry::init(&settings.telemetry);
            catalog_db::connect(&settings.database)
                .await
                .with_context(|| format!("document store at '{}' is unreachable", settings.database.uri))?;
            println!("ok: database '{}' reachable", settings.database.name);
            Ok(())
        }
    }
}
