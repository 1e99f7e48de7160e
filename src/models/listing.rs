//! Market listing models

use serde::Deserialize;

/// One coin's current market snapshot from the listings API
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    pub id: u64,
    pub name: String,
    pub symbol: String,
    #[serde(rename = "cmc_rank")]
    pub rank: u32,
    pub quote: ListingQuote,
}

/// Quotes keyed by conversion currency; only USD is requested
#[derive(Debug, Clone, Deserialize)]
pub struct ListingQuote {
    #[serde(rename = "USD")]
    pub usd: QuotePrice,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuotePrice {
    pub price: f64,
}

impl Listing {
    pub fn usd_price(&self) -> f64 {
        self.quote.usd.price
    }
}
