//! Fiat currency models

use serde::{Deserialize, Serialize};

/// Static description of a supported fiat currency
#[derive(Debug, Clone, Copy)]
pub struct FiatCurrency {
    pub code: &'static str,
    pub symbol: &'static str,
    pub name: &'static str,
}

/// One currency in the fiat manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FiatManifestEntry {
    pub code: String,
    pub symbol: String,
    pub name: String,
    /// Units of this currency per 1 USD
    pub exrate: f64,
    pub icon: String,
}
