//! # paye-server
//!
//! Starts the HTTP server for the payroll engine API.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use paye_engine::api::{AppState, create_router};
use paye_engine::config::ConfigLoader;

/// Serve the South African monthly payroll API.
#[derive(Parser, Debug)]
#[command(name = "paye-server", version, about)]
struct Cli {
    /// Directory holding registry.yaml and tax_years/. Defaults to the
    /// tables built into the binary.
    #[arg(long)]
    config_dir: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let registry = match &cli.config_dir {
        Some(dir) => ConfigLoader::load(dir),
        None => ConfigLoader::builtin(),
    }
    .map_err(|e| {
        tracing::error!("Failed to load tax tables: {e}");
        e
    })?;

    tracing::info!(
        jurisdiction = %registry.metadata().name,
        default_year = registry.default_year(),
        tax_years = registry.available_tax_years().len(),
        "Tax tables loaded"
    );

    let app = create_router(AppState::new(registry));

    tracing::info!("PAYE API listening on {}", cli.bind);
    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
