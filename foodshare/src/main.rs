// foodshare/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 1. Setup Logging (Tracing), stderr only: stdout carries the reports
    // RUST_LOG=info foodshare load pour voir les détails
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!("🚀 foodshare {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = dispatch(cli.command).await {
        error!(error = ?e, "Command failed");
        // Exit with error code for CI/CD
        eprintln!("\n❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn dispatch(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Init { project, reset } => commands::init::execute(&project.project_dir, reset).await,

        Commands::Load { project } => commands::load::execute(&project.project_dir).await,

        Commands::Verify { project } => commands::verify::execute(&project.project_dir).await,

        Commands::Catalog => {
            commands::catalog::execute();
            Ok(())
        }

        Commands::Query {
            project,
            key,
            all,
            as_of,
            export,
        } => {
            commands::query::execute(&project.project_dir, key, all, as_of, export.map(Into::into))
                .await
        }

        Commands::Providers {
            project,
            city,
            provider_type,
        } => commands::providers::execute(&project.project_dir, city, provider_type).await,

        Commands::Listings {
            project,
            location,
            food_type,
            meal_type,
            as_of,
        } => {
            commands::listings::execute(&project.project_dir, location, food_type, meal_type, as_of)
                .await
        }

        Commands::Status { project, as_of } => {
            commands::status::execute(&project.project_dir, as_of).await
        }
    }
}
