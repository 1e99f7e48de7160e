//! Data models for the collector
//!
//! Listings come from the market-data API, everything else is produced by the
//! services and persisted as JSON.

pub mod color;
pub mod fiat;
pub mod listing;
pub mod manifest;
pub mod price;

pub use color::{Color, ColorError};
pub use fiat::{FiatCurrency, FiatManifestEntry};
pub use listing::Listing;
pub use manifest::{EnrichedCoin, ManifestEntry, ReferenceIcon};
pub use price::{PriceSample, SAMPLE_DATE_FORMAT};
