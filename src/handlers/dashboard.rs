use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    database::Database,
    error::AppError,
    models::{Product, Transaction, TransactionsOf, VisibleTo},
    services::aggregation::{self, DashboardSummary, SalesSeries, Timeframe},
};

pub async fn summary(
    State(db): State<Database>,
    Path(user_id): Path<String>,
) -> Json<DashboardSummary> {
    let transactions: Vec<Transaction> = db.filter(&TransactionsOf::all(&user_id));
    let products = db.filter::<Product>(&VisibleTo(&user_id));

    Json(aggregation::summarize(&transactions, &products, &user_id))
}

#[derive(Debug, Deserialize)]
pub struct ChartParams {
    pub timeframe: Option<String>,
}

fn parse_timeframe(raw: Option<&str>) -> Result<Timeframe, AppError> {
    match raw {
        None | Some("") => Ok(Timeframe::default()),
        Some("daily") => Ok(Timeframe::Daily),
        Some("weekly") => Ok(Timeframe::Weekly),
        Some("monthly") => Ok(Timeframe::Monthly),
        Some(other) => Err(AppError::validation(format!(
            "timeframe must be daily, weekly or monthly, got '{}'",
            other
        ))),
    }
}

pub async fn sales_chart(
    State(db): State<Database>,
    Path(user_id): Path<String>,
    Query(params): Query<ChartParams>,
) -> Result<Json<SalesSeries>, AppError> {
    let timeframe = parse_timeframe(params.timeframe.as_deref())?;
    let transactions: Vec<Transaction> = db.filter(&TransactionsOf::income(&user_id));

    Ok(Json(aggregation::sales_series(
        &transactions,
        &user_id,
        timeframe,
        Utc::now(),
    )))
}
