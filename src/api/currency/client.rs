use std::collections::HashMap;

use reqwest::Client as HttpClient;

use crate::api::error::{handle_error_response, ApiError};

/// Client for the currency-conversion API and the fiat icon host
#[derive(Clone)]
pub struct CurrencyClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
    icon_base_url: String,
}

impl CurrencyClient {
    const DEFAULT_BASE_URL: &'static str = "https://free.currconv.com/api/v7";
    const DEFAULT_ICON_BASE_URL: &'static str = "https://assets.terra.money/icon/svg/Terra";

    pub fn new(http_client: HttpClient, api_key: String) -> Self {
        Self::with_base_url(
            http_client,
            api_key,
            Self::DEFAULT_BASE_URL.to_string(),
            Self::DEFAULT_ICON_BASE_URL.to_string(),
        )
    }

    /// Create a client against alternate hosts
    pub fn with_base_url(
        http_client: HttpClient,
        api_key: String,
        base_url: String,
        icon_base_url: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            base_url,
            icon_base_url,
        }
    }

    /// GET /convert?q=USD_<CODE>&compact=ultra
    ///
    /// Returns how many units of `code` one USD buys.
    pub async fn exchange_rate(&self, code: &str) -> Result<f64, ApiError> {
        let url = format!("{}/convert", self.base_url);
        let pair = pair_key(code);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("q", pair.as_str()),
                ("compact", "ultra"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(handle_error_response(response).await);
        }

        let rates = response
            .json::<HashMap<String, f64>>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse rate: {}", e)))?;

        rates
            .get(&pair)
            .copied()
            .ok_or_else(|| ApiError::DeserializationError(format!("Response has no {} rate", pair)))
    }

    /// Fetch the SVG icon for a fiat code
    pub async fn fiat_icon(&self, code: &str) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}/{}.svg", self.icon_base_url, icon_name(code));

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(handle_error_response(response).await);
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// Conversion pair key, e.g. `USD_EUR`
fn pair_key(code: &str) -> String {
    format!("USD_{}", code.to_uppercase())
}

/// The icon host names fiat icons after their Terra stablecoin: USD -> UST, EUR -> EUT
fn icon_name(code: &str) -> String {
    let mut chars = code.chars();
    chars.next_back();
    format!("{}T", chars.as_str())
}
