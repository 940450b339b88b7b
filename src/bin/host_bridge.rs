//! Headless search bridge binary for stdin/stdout JSON communication.
//!
//! This binary reads `SearchRequest` messages as newline-delimited JSON
//! from stdin, runs them through the materials aggregator, and writes one
//! `ResponseEnvelope` per request to stdout.
//!
//! All tracing/diagnostic output goes to stderr so that stdout remains a
//! clean JSON protocol channel.
//!
//! Usage: `aim-materials-host [CONFIG_PATH]`

use aim_materials::AppConfig;
use aim_materials::host::stdio::run_stdio_bridge;
use materials_search::Aggregator;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    // Tracing goes to stderr only (stdout is reserved for the JSON protocol).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.filter)),
        )
        .init();

    tracing::info!("aim-materials-host starting");

    let aggregator = Aggregator::from_config(&config.search_config()).map_err(|e| {
        tracing::error!(error = %e, "invalid search configuration");
        anyhow::anyhow!("aim-materials-host failed: {e}")
    })?;

    run_stdio_bridge(aggregator).await.map_err(|e| {
        tracing::error!(error = %e, "aim-materials-host exited with error");
        anyhow::anyhow!("aim-materials-host failed: {e}")
    })?;

    tracing::info!("aim-materials-host shut down cleanly");
    Ok(())
}
