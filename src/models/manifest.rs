//! Coin manifest models

use serde::{Deserialize, Serialize};

use super::{Color, PriceSample};

/// One coin in the aggregate manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub id: u64,
    pub name: String,
    pub symbol: String,
    pub rank: u32,
    pub color: Color,
    /// Inline `data:` URI of the coin's vector icon, empty when none is known
    pub icon: String,
}

/// Output of enriching a single listing
#[derive(Debug, Clone)]
pub struct EnrichedCoin {
    pub entry: ManifestEntry,
    pub sample: PriceSample,
}

/// Entry of the icon bundle's `manifest.json`
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceIcon {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub color: String,
}
