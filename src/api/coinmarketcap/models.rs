use serde::Deserialize;
use serde_json::Value;

/// Envelope of `GET /v1/cryptocurrency/listings/latest`.
///
/// Entries stay as raw JSON so one malformed listing can be skipped
/// without failing the whole response.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingsResponse {
    pub data: Vec<Value>,
}

/// Paging and conversion parameters for the listings request
#[derive(Debug, Clone)]
pub struct ListingsQuery {
    pub start: u32,
    pub limit: u32,
    pub convert: String,
}

impl Default for ListingsQuery {
    fn default() -> Self {
        Self {
            start: 1,
            limit: 5000,
            convert: "USD".to_string(),
        }
    }
}
