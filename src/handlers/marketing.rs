use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use super::input::{required_text, JsonBody};
use crate::{
    database::Database,
    error::AppError,
    models::{Ad, PublishAd},
};

/// Every published ad, newest first. The stored order is left alone.
pub async fn community(State(db): State<Database>) -> Json<Vec<Ad>> {
    let mut ads = db.all::<Ad>();
    ads.reverse();
    Json(ads)
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub msg: &'static str,
    pub ad: Ad,
}

pub async fn publish(
    State(db): State<Database>,
    JsonBody(mut form): JsonBody<PublishAd>,
) -> Result<Json<PublishResponse>, AppError> {
    let offer = required_text(form.offer.take(), "offer")?;
    let ad = db.add(form.into_ad(offer, Utc::now()))?;

    log::info!("ad {} published by {}", ad.id, ad.business_name);

    Ok(Json(PublishResponse {
        msg: "Ad Published to Network",
        ad,
    }))
}
