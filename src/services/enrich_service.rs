use std::future::Future;

use futures::stream::{self, StreamExt};
use serde_json::Value;
use tracing::{info, warn};

use crate::models::{Color, EnrichedCoin, Listing, ManifestEntry, PriceSample};

/// Provides the dominant color for a coin id. Implementations must not fail;
/// degradation to a fallback color is their business.
pub trait ColorSource {
    fn color_for(&self, id: u64) -> impl Future<Output = Color>;
}

/// Build the manifest entry and today's price sample for one listing
pub fn enrich(listing: &Listing, color: Color, date: &str) -> EnrichedCoin {
    EnrichedCoin {
        entry: ManifestEntry {
            id: listing.id,
            name: listing.name.clone(),
            symbol: listing.symbol.clone(),
            rank: listing.rank,
            color,
            icon: String::new(),
        },
        sample: PriceSample {
            id: listing.id,
            date: date.to_string(),
            price: listing.usd_price(),
        },
    }
}

async fn enrich_raw<C: ColorSource>(raw: Value, colors: &C, date: &str) -> Result<EnrichedCoin, String> {
    let id = raw.get("id").cloned().unwrap_or(Value::Null);
    let listing: Listing = serde_json::from_value(raw)
        .map_err(|e| format!("Skipping malformed listing (id {}): {}", id, e))?;

    let color = colors.color_for(listing.id).await;
    Ok(enrich(&listing, color, date))
}

/// Enrich every listing with at most `width` coins in flight.
///
/// Results come back in completion order, not input order. A listing that
/// cannot be decoded is dropped with a warning instead of failing the batch.
pub async fn enrich_all<C: ColorSource>(
    listings: Vec<Value>,
    colors: &C,
    date: &str,
    width: usize,
) -> Vec<EnrichedCoin> {
    stream::iter(listings)
        .map(|raw| enrich_raw(raw, colors, date))
        .buffer_unordered(width.max(1))
        .filter_map(|result| async move {
            match result {
                Ok(coin) => {
                    info!("Processing {}", coin.entry.name);
                    Some(coin)
                }
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            }
        })
        .collect()
        .await
}
