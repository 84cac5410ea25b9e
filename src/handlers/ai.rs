use axum::{extract::State, Json};
use axum_extra::extract::Multipart;
use serde_json::Value;

use super::input::JsonBody;
use crate::{
    error::AppError,
    services::ai::{AiClient, PricingRequest},
};

pub async fn optimize_price(
    State(ai): State<AiClient>,
    JsonBody(request): JsonBody<PricingRequest>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(ai.optimize_price(&request).await?))
}

/// Forwards the `image` part of the upload to the vision endpoint.
pub async fn analyze_shelf(
    State(ai): State<AiClient>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::validation(err.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload.jpg").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::validation(err.to_string()))?;

        return Ok(Json(ai.analyze_shelf_image(file_name, bytes.to_vec()).await?));
    }

    Err(AppError::validation("No image uploaded"))
}
