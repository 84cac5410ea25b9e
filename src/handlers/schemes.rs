use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::schemes::{self, NewsItem, NewsStatus, Scheme, SchemeFeed};

#[derive(Debug, Deserialize)]
pub struct SchemeParams {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemesResponse {
    pub news: Vec<NewsItem>,
    pub news_status: NewsStatus,
    pub schemes: Vec<Scheme>,
}

/// Static schemes plus whatever the portal ticker yields. A dead portal
/// only degrades `news`; the request itself still succeeds.
pub async fn list_schemes(
    State(feed): State<SchemeFeed>,
    Query(params): Query<SchemeParams>,
) -> Json<SchemesResponse> {
    let (news, news_status) = feed.latest_news().await;
    let category = params.category.as_deref().filter(|c| !c.is_empty());

    Json(SchemesResponse {
        news,
        news_status,
        schemes: schemes::schemes_for(category),
    })
}
