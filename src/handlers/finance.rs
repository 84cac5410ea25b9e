use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::input::{required, required_text, JsonBody, NumericField};
use crate::{
    database::Database,
    error::AppError,
    models::{OwnedBy, PaymentMethod, Transaction, TransactionStatus, TransactionType},
};

/// Ledger entries for one owner, most recently recorded first.
pub async fn list_transactions(
    State(db): State<Database>,
    Path(user_id): Path<String>,
) -> Json<Vec<Transaction>> {
    let mut transactions = db.filter::<Transaction>(&OwnedBy(&user_id));
    transactions.reverse();
    Json(transactions)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTransactionRequest {
    pub user_id: Option<String>,
    pub date: Option<String>,
    pub desc: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub amount: Option<NumericField>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<TransactionStatus>,
}

impl AddTransactionRequest {
    fn into_transaction(self, today: NaiveDate) -> Result<Transaction, AppError> {
        let owner_id = required_text(self.user_id, "userId")?;
        let kind = required(self.kind, "type")?;
        let amount = required(self.amount, "amount")?.to_decimal("amount")?;
        if amount <= Decimal::ZERO {
            return Err(AppError::validation("amount must be greater than zero"));
        }

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                AppError::validation(format!("date must be YYYY-MM-DD, got '{}'", raw))
            })?,
        };

        Ok(Transaction {
            id: String::new(),
            owner_id,
            kind,
            amount,
            description: self.desc.unwrap_or_default(),
            date,
            payment_method: self.payment_method,
            status: self.status,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionResponse {
    pub msg: &'static str,
    pub transaction: Transaction,
}

pub async fn add_transaction(
    State(db): State<Database>,
    JsonBody(form): JsonBody<AddTransactionRequest>,
) -> Result<Json<TransactionResponse>, AppError> {
    let transaction = db.add(form.into_transaction(Utc::now().date_naive())?)?;

    Ok(Json(TransactionResponse {
        msg: "Transaction added",
        transaction,
    }))
}
