use std::path::PathBuf;

use anyhow::{Result, bail};
use canary_runner::{handler, settings, telemetry};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "canary-runner",
    about = "Endpoint canary: one pass of HTTPS health checks per invocation"
)]
struct Cli {
    /// YAML config file (falls back to CANARY_CONFIG, then built-in endpoints).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Target domain (falls back to CANARY_DOMAIN_NAME).
    #[arg(long, global = true)]
    domain: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check every endpoint once and print the verdict as JSON (default).
    Run,
    /// Print the resolved configuration YAML to stdout.
    PrintConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init();

    let cli = Cli::parse();
    let config = settings::load(cli.config.as_deref(), cli.domain.as_deref())?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::PrintConfig => {
            let yaml = serde_yaml::to_string(&config.resolve())?;
            println!("{yaml}");
            Ok(())
        }
        Commands::Run => {
            let checker = handler::https_checker(&config)?;
            let report = handler::invoke(&checker).await;
            println!("{}", serde_json::to_string(&report)?);
            if !report.is_success() {
                bail!("canary run failed");
            }
            Ok(())
        }
    }
}
