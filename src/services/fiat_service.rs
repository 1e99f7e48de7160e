use std::future::Future;
use std::path::Path;

use tracing::{info, warn};

use crate::api::{ApiError, CurrencyClient};
use crate::models::{FiatCurrency, FiatManifestEntry};
use crate::utils::{svg_data_uri, write_atomic, CollectorError};

/// Currencies offered in the fiat manifest, in output order
pub const FIAT_CURRENCIES: [FiatCurrency; 17] = [
    FiatCurrency { code: "USD", symbol: "$", name: "United States Dollar" },
    FiatCurrency { code: "AUD", symbol: "$", name: "Australian Dollar" },
    FiatCurrency { code: "CAD", symbol: "$", name: "Canada Dollar" },
    FiatCurrency { code: "CHF", symbol: "CHF", name: "Switzerland Franc" },
    FiatCurrency { code: "CNY", symbol: "¥", name: "China Yuan Renminbi" },
    FiatCurrency { code: "DKK", symbol: "kr", name: "Denmark Krone" },
    FiatCurrency { code: "EUR", symbol: "€", name: "Euro Member Countries" },
    FiatCurrency { code: "GBP", symbol: "£", name: "Great British Pound" },
    FiatCurrency { code: "HKD", symbol: "$", name: "Hong Kong Dollar" },
    FiatCurrency { code: "IDR", symbol: "Rp", name: "Indonesia Rupiah" },
    FiatCurrency { code: "INR", symbol: "₹", name: "India Rupee" },
    FiatCurrency { code: "JPY", symbol: "¥", name: "Japan Yen" },
    FiatCurrency { code: "KRW", symbol: "₩", name: "Korea Won" },
    FiatCurrency { code: "PHP", symbol: "₱", name: "Philippines Peso" },
    FiatCurrency { code: "SEK", symbol: "kr", name: "Sweden Krona" },
    FiatCurrency { code: "SGD", symbol: "$", name: "Singapore Dollar" },
    FiatCurrency { code: "THB", symbol: "฿", name: "Thailand Baht" },
];

/// Where exchange rates and icons for fiat currencies come from
pub trait FiatSource {
    fn exchange_rate(&self, code: &str) -> impl Future<Output = Result<f64, ApiError>>;
    fn icon(&self, code: &str) -> impl Future<Output = Result<Vec<u8>, ApiError>>;
}

impl FiatSource for CurrencyClient {
    async fn exchange_rate(&self, code: &str) -> Result<f64, ApiError> {
        CurrencyClient::exchange_rate(self, code).await
    }

    async fn icon(&self, code: &str) -> Result<Vec<u8>, ApiError> {
        self.fiat_icon(code).await
    }
}

/// Build the fiat manifest one currency at a time.
///
/// A currency whose rate or icon cannot be fetched is left out of the
/// result entirely rather than written with placeholder values.
pub async fn generate_fiat_manifest<S: FiatSource>(source: &S, currencies: &[FiatCurrency]) -> Vec<FiatManifestEntry> {
    let mut manifest = Vec::with_capacity(currencies.len());

    for currency in currencies {
        let exrate = match source.exchange_rate(currency.code).await {
            Ok(rate) => rate,
            Err(e) => {
                warn!("Unable to get exchange rate for {}: {}", currency.code, e);
                continue;
            }
        };

        let icon = match source.icon(currency.code).await {
            Ok(svg) => svg_data_uri(&svg),
            Err(e) => {
                warn!("Unable to get icon for {}: {}", currency.code, e);
                continue;
            }
        };

        manifest.push(FiatManifestEntry {
            code: currency.code.to_string(),
            symbol: currency.symbol.to_string(),
            name: currency.name.to_string(),
            exrate,
            icon,
        });
    }

    manifest
}

/// Replace the fiat manifest at `path`
pub async fn write_fiat_manifest(path: &Path, entries: &[FiatManifestEntry]) -> Result<(), CollectorError> {
    let body = serde_json::to_vec(entries)?;
    write_atomic(path, &body)
        .await
        .map_err(|e| CollectorError::io(path, e))?;

    info!("Wrote {} fiat currencies to {}", entries.len(), path.display());
    Ok(())
}
