use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod models;
mod services;
mod utils;

use config::Config;
use services::collector::RunSummary;
use utils::CollectorError;

#[tokio::main]
async fn main() -> ExitCode {
    let mut filter = EnvFilter::from_default_env();
    for directive in ["crypto_manifest=debug", "reqwest=warn", "hyper=warn"] {
        if let Ok(directive) = directive.parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    match collect().await {
        Ok(summary) => {
            info!(
                "Done: {} coins ({} with bundled icons), {} histories updated, {} skipped, {} fiat currencies",
                summary.coins,
                summary.bundled_icons,
                summary.history.written,
                summary.history.skipped,
                summary.fiat_currencies
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn collect() -> Result<RunSummary, CollectorError> {
    let config = Config::from_env()?;

    info!(
        "Collecting up to {} listings with {} workers into {}",
        config.listing_limit,
        config.enrich_workers,
        config.output_dir.display()
    );

    services::collector::run(&config).await
}
