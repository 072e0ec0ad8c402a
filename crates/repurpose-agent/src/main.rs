//! repurpose — literature triage for drug-repurposing signals.
//! Entry point for the batch binary.

mod config;
mod pipeline;

use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; keys may come from the real environment
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("repurpose=info,info")),
        )
        .init();

    info!("repurpose starting up, version {}", env!("CARGO_PKG_VERSION"));

    let config = config::Config::load()?;
    config.validate()?;
    info!(
        corpus = ?config.corpus.mode,
        llm_enabled = config.llm.enabled,
        backend = %config.llm.backend,
        "Configuration loaded"
    );

    pipeline::run(&config).await?;

    info!("Done.");
    Ok(())
}
