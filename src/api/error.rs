use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

/// 429 body as sent by the market-data API
#[derive(Debug, Clone, Deserialize)]
struct RateLimitResponse {
    status: Option<RateLimitStatus>,
}

#[derive(Debug, Clone, Deserialize)]
struct RateLimitStatus {
    error_message: Option<String>,
}

/// Error type shared by every remote API client
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// 400 Bad Request
    #[error("Bad Request: {0}")]
    BadRequest(String),
    /// 401 Unauthorized
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// 403 Forbidden
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// 404 Not Found
    #[error("Not Found: {0}")]
    NotFound(String),
    /// 429 Too Many Requests
    #[error("Rate Limited: {0}")]
    RateLimited(String),
    /// 5xx Server Error
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    /// Other HTTP errors
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    /// Connection, timeout or redirect failure
    #[error("Request Error: {0}")]
    RequestError(String),
    /// Body could not be decoded
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::DeserializationError(e.to_string())
        } else {
            ApiError::RequestError(format!("Request failed: {}", e))
        }
    }
}

/// Map a non-success response onto an [`ApiError`]
pub(crate) async fn handle_error_response(response: reqwest::Response) -> ApiError {
    let status = response.status();
    let body_text = response.text().await.unwrap_or_default();
    error_for_status(status, body_text)
}

fn error_for_status(status: StatusCode, body_text: String) -> ApiError {
    let status_code = status.as_u16();

    match status_code {
        400 => ApiError::BadRequest(body_text),
        401 => ApiError::Unauthorized(body_text),
        403 => ApiError::Forbidden(body_text),
        404 => ApiError::NotFound(body_text),
        429 => {
            let message = serde_json::from_str::<RateLimitResponse>(&body_text)
                .ok()
                .and_then(|r| r.status)
                .and_then(|s| s.error_message)
                .unwrap_or(body_text);
            warn!("Rate limited: {}", message);
            ApiError::RateLimited(message)
        }
        500..=599 => {
            warn!("Server error {}: {}", status_code, body_text);
            ApiError::ServerError(status_code, body_text)
        }
        _ => ApiError::HttpError(status_code, body_text),
    }
}
