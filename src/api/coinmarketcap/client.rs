use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client as HttpClient;
use serde_json::Value;
use tracing::debug;

use super::models::{ListingsQuery, ListingsResponse};
use crate::api::error::{handle_error_response, ApiError};

/// Client for the market-data API and its static icon host
#[derive(Clone)]
pub struct CoinMarketCapClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
    image_base_url: String,
}

impl CoinMarketCapClient {
    const DEFAULT_BASE_URL: &'static str = "https://pro-api.coinmarketcap.com/v1";
    const DEFAULT_IMAGE_BASE_URL: &'static str = "https://s2.coinmarketcap.com/static/img/coins";

    pub fn new(http_client: HttpClient, api_key: String) -> Self {
        Self::with_base_url(
            http_client,
            api_key,
            Self::DEFAULT_BASE_URL.to_string(),
            Self::DEFAULT_IMAGE_BASE_URL.to_string(),
        )
    }

    /// Create a client against alternate hosts
    pub fn with_base_url(
        http_client: HttpClient,
        api_key: String,
        base_url: String,
        image_base_url: String,
    ) -> Self {
        Self {
            http_client,
            api_key,
            base_url,
            image_base_url,
        }
    }

    fn create_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("accepts"),
            HeaderValue::from_static("application/json"),
        );

        let key_value = HeaderValue::from_str(&self.api_key)
            .map_err(|e| ApiError::RequestError(format!("Failed to create API key header: {}", e)))?;
        headers.insert(HeaderName::from_static("x-cmc_pro_api_key"), key_value);

        Ok(headers)
    }

    /// GET /cryptocurrency/listings/latest
    ///
    /// Returns the raw entries of the response's `data` array.
    pub async fn latest_listings(&self, query: &ListingsQuery) -> Result<Vec<Value>, ApiError> {
        let url = format!("{}/cryptocurrency/listings/latest", self.base_url);
        let headers = self.create_headers()?;

        debug!(
            "Requesting listings start={} limit={} convert={}",
            query.start, query.limit, query.convert
        );

        let response = self
            .http_client
            .get(&url)
            .headers(headers)
            .query(&[
                ("start", query.start.to_string()),
                ("limit", query.limit.to_string()),
                ("convert", query.convert.clone()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(handle_error_response(response).await);
        }

        let body = response
            .json::<ListingsResponse>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse listings: {}", e)))?;

        Ok(body.data)
    }

    /// Fetch the 32x32 PNG icon for a coin id
    pub async fn coin_icon(&self, id: u64) -> Result<Vec<u8>, ApiError> {
        let url = format!("{}/32x32/{}.png", self.image_base_url, id);

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(handle_error_response(response).await);
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_http::{closed_base_url, header, serve_once};

    fn client_for(base_url: &str) -> CoinMarketCapClient {
        CoinMarketCapClient::with_base_url(
            HttpClient::new(),
            "secret-key".to_string(),
            format!("{}/v1", base_url),
            format!("{}/static/img/coins", base_url),
        )
    }

    #[tokio::test]
    async fn test_listings_request_and_envelope() {
        let body = r#"{"status":{"error_code":0},"data":[{"id":1,"name":"Bitcoin"},{"id":1027,"name":"Ethereum"}]}"#;
        let (base_url, request) = serve_once("200 OK", body).await;

        let listings = client_for(&base_url)
            .latest_listings(&ListingsQuery::default())
            .await
            .unwrap();

        assert_eq!(listings.len(), 2);
        assert_eq!(listings[1]["id"], 1027);

        let head = request.await.unwrap();
        assert_eq!(
            head.lines().next().unwrap(),
            "GET /v1/cryptocurrency/listings/latest?start=1&limit=5000&convert=USD HTTP/1.1"
        );
        assert_eq!(header(&head, "X-CMC_PRO_API_KEY"), Some("secret-key"));
        assert_eq!(header(&head, "Accepts"), Some("application/json"));
    }

    #[tokio::test]
    async fn test_listings_unauthorized() {
        let (base_url, _request) = serve_once("401 Unauthorized", r#"{"status":{"error_code":1001}}"#).await;
        let result = client_for(&base_url).latest_listings(&ListingsQuery::default()).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_listings_rate_limited() {
        let body = r#"{"status":{"error_code":1008,"error_message":"rate limit exceeded"}}"#;
        let (base_url, _request) = serve_once("429 Too Many Requests", body).await;
        let result = client_for(&base_url).latest_listings(&ListingsQuery::default()).await;
        match result {
            Err(ApiError::RateLimited(msg)) => assert_eq!(msg, "rate limit exceeded"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_listings_server_error() {
        let (base_url, _request) = serve_once("500 Internal Server Error", "oops").await;
        let result = client_for(&base_url).latest_listings(&ListingsQuery::default()).await;
        assert!(matches!(result, Err(ApiError::ServerError(500, _))));
    }

    #[tokio::test]
    async fn test_listings_without_data_field() {
        let (base_url, _request) = serve_once("200 OK", r#"{"status":{}}"#).await;
        let result = client_for(&base_url).latest_listings(&ListingsQuery::default()).await;
        assert!(matches!(result, Err(ApiError::DeserializationError(_))));
    }

    #[tokio::test]
    async fn test_listings_connection_refused() {
        let base_url = closed_base_url().await;
        let result = client_for(&base_url).latest_listings(&ListingsQuery::default()).await;
        assert!(matches!(result, Err(ApiError::RequestError(_))));
    }

    #[tokio::test]
    async fn test_coin_icon_path() {
        let (base_url, request) = serve_once("200 OK", "png-bytes").await;

        let image = client_for(&base_url).coin_icon(1027).await.unwrap();

        assert_eq!(image, b"png-bytes");
        let head = request.await.unwrap();
        assert!(head.starts_with("GET /static/img/coins/32x32/1027.png HTTP/1.1"));
    }
}
