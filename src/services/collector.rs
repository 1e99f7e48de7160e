use std::path::Path;

use chrono::Local;
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::info;

use super::color_service::{ColorResolver, ImageMagick};
use super::enrich_service::enrich_all;
use super::fiat_service::{generate_fiat_manifest, write_fiat_manifest, FIAT_CURRENCIES};
use super::history_service::{write_all_samples, HistoryReport};
use super::icon_bundle::IconBundle;
use super::manifest_service::write_manifest;
use super::overlay_service::apply_reference_icons;
use crate::api::coinmarketcap::ListingsQuery;
use crate::api::{CoinMarketCapClient, CurrencyClient};
use crate::config::Config;
use crate::models::{EnrichedCoin, ManifestEntry, SAMPLE_DATE_FORMAT};
use crate::utils::CollectorError;

/// Counts reported at the end of a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub coins: usize,
    pub bundled_icons: usize,
    pub history: HistoryReport,
    pub fiat_currencies: usize,
}

/// Append each coin's price sample to its history and hand back the manifest entries
pub async fn record_prices(coins: Vec<EnrichedCoin>, history_dir: &Path) -> (Vec<ManifestEntry>, HistoryReport) {
    let (entries, samples): (Vec<_>, Vec<_>) = coins.into_iter().map(|c| (c.entry, c.sample)).unzip();
    let report = write_all_samples(history_dir, &samples).await;
    info!(
        "Price history: {} written, {} skipped",
        report.written, report.skipped
    );
    (entries, report)
}

/// Overlay bundled icons and replace the manifest. Returns (coins written, icons applied).
pub async fn publish_manifest(
    mut entries: Vec<ManifestEntry>,
    bundle: &IconBundle,
    manifest_path: &Path,
) -> Result<(usize, usize), CollectorError> {
    let bundled_icons = apply_reference_icons(&mut entries, bundle).await;
    let coins = write_manifest(manifest_path, entries).await?;
    Ok((coins, bundled_icons))
}

/// Fetch the current listings. Any failure here aborts the run.
pub async fn fetch_listings(market: &CoinMarketCapClient, limit: u32) -> Result<Vec<Value>, CollectorError> {
    let query = ListingsQuery {
        limit,
        ..ListingsQuery::default()
    };
    let listings = market
        .latest_listings(&query)
        .await
        .map_err(CollectorError::Listings)?;

    info!("Fetched {} listings", listings.len());
    Ok(listings)
}

/// One full collection run against the live services
pub async fn run(config: &Config) -> Result<RunSummary, CollectorError> {
    let http = HttpClient::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| CollectorError::HttpClient(e.to_string()))?;

    let market = CoinMarketCapClient::new(http.clone(), config.cmc_api_key.clone());
    let listings = fetch_listings(&market, config.listing_limit).await?;

    let date = Local::now().format(SAMPLE_DATE_FORMAT).to_string();
    let resolver = ColorResolver::new(market, ImageMagick::new(config.magick_bin.clone()));
    let coins = enrich_all(listings, &resolver, &date, config.enrich_workers).await;
    info!("Enriched {} coins", coins.len());

    // Histories are written before the bundle download, so a bundle failure
    // still keeps today's prices.
    let (entries, history) = record_prices(coins, &config.history_path()).await;

    let bundle = IconBundle::download(&http, &config.icon_bundle_url, &config.icon_scratch_dir).await?;
    let (coins, bundled_icons) = publish_manifest(entries, &bundle, &config.manifest_path()).await?;

    let currency = CurrencyClient::new(http, config.cca_api_key.clone());
    let fiat = generate_fiat_manifest(&currency, &FIAT_CURRENCIES).await;
    write_fiat_manifest(&config.fiat_manifest_path(), &fiat).await?;

    Ok(RunSummary {
        coins,
        bundled_icons,
        history,
        fiat_currencies: fiat.len(),
    })
}
