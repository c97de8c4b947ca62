use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use tracing::{info, warn};

mod api;
mod config;
mod engine;
mod records;

use api::{AnalysisResponse, AppState};
use config::Config;
use records::{JsonFileSource, MatchSource};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    match config.seed {
        Some(seed) => info!("Goal simulation seeded with {}", seed),
        None => info!("Goal simulation uses fresh entropy per analysis"),
    }

    if let Some(path) = config.input.as_deref() {
        return run_once(&config, JsonFileSource::new(path)).await;
    }

    let app = api::router(AppState { seed: config.seed });
    let addr: SocketAddr = config.api_addr.parse()?;
    info!("API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Analyze one source and print the JSON result to stdout.
async fn run_once(config: &Config, source: impl MatchSource) -> Result<()> {
    let records = source
        .fetch_matches()
        .await
        .with_context(|| format!("Failed to load matches from {}", source.name()))?;
    info!("Loaded {} rows from {}", records.len(), source.name());

    let seed = config.seed;
    let outcome = tokio::task::spawn_blocking(move || engine::analyze_with_seed(&records, seed))
        .await
        .context("Analysis task panicked")?;

    let response =
        AnalysisResponse::from_outcome(outcome, config.host_team.clone(), config.guest_team.clone());
    if !response.is_success() {
        warn!("Analysis produced no result");
    }
    let json = if config.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", json);
    Ok(())
}
