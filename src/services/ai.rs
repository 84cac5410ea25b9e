//! Client for the pricing / shelf-vision microservice.
//!
//! Responses are passed through untouched. Connection failures and timeouts
//! are reported as [`AiError::Unavailable`] so callers can tell "service down"
//! apart from "service answered with an error".

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("AI Service Unavailable: {0}")]
    Unavailable(String),

    #[error("AI service returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("AI service response could not be read: {0}")]
    Malformed(String),
}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        let msg = err.to_string();
        match err {
            AiError::Unavailable(_) => AppError::ServiceUnavailable(msg),
            AiError::Rejected { .. } | AiError::Malformed(_) => AppError::Upstream(msg),
        }
    }
}

// Anything short of a readable answer (refused, timed out, reset) counts as unavailable.
fn classify(err: reqwest::Error) -> AiError {
    if err.is_decode() {
        AiError::Malformed(err.to_string())
    } else {
        AiError::Unavailable(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PricingRequest {
    pub product_name: String,
    pub base_price: f64,
    pub current_stock: i64,
    pub days_to_expiry: i64,
    pub competitor_price: f64,
}

#[derive(Clone)]
pub struct AiClient {
    http: reqwest::Client,
    base_url: String,
}

impl AiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `{suggested_price, multiplier, explanation, ...}` from the pricing agent.
    pub async fn optimize_price(&self, request: &PricingRequest) -> Result<Value, AiError> {
        let response = self
            .http
            .post(self.url("/pricing/optimize"))
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        read_json(response).await
    }

    /// `{total_items, shelf_health, item_counts, ...}` for a shelf photo.
    pub async fn analyze_shelf_image(&self, file_name: String, image: Vec<u8>) -> Result<Value, AiError> {
        let form = Form::new().part("file", Part::bytes(image).file_name(file_name));

        let response = self
            .http
            .post(self.url("/vision/analyze"))
            .multipart(form)
            .send()
            .await
            .map_err(classify)?;

        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, AiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AiError::Rejected {
            status: status.as_u16(),
            body,
        });
    }
    response.json::<Value>().await.map_err(classify)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> AiClient {
        // Port 1 is never served in the test environment.
        AiClient::new("http://127.0.0.1:1/", Duration::from_millis(500)).unwrap()
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(unreachable_client().url("/pricing/optimize"), "http://127.0.0.1:1/pricing/optimize");
    }

    #[tokio::test]
    async fn unreachable_service_is_unavailable() {
        let request = PricingRequest {
            product_name: "Cough Syrup".into(),
            base_price: 120.0,
            current_stock: 30,
            days_to_expiry: 10,
            competitor_price: 110.0,
        };

        let err = unreachable_client().optimize_price(&request).await.unwrap_err();
        assert!(matches!(err, AiError::Unavailable(_)));

        let app: AppError = err.into();
        assert!(matches!(app, AppError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn unreachable_vision_is_unavailable() {
        let err = unreachable_client()
            .analyze_shelf_image("shelf.jpg".into(), vec![0xFF, 0xD8])
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Unavailable(_)));
    }

    #[test]
    fn rejection_maps_to_upstream() {
        let app: AppError = AiError::Rejected {
            status: 500,
            body: "boom".into(),
        }
        .into();
        assert!(matches!(app, AppError::Upstream(_)));
    }
}
