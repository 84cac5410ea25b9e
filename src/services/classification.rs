//! Turnover-based MSME size classification.

use rust_decimal::Decimal;

use crate::{
    database::JsonDb,
    error::AppError,
    models::{ById, Query, SizeCategory, Transaction, TransactionsOf, User},
};

/// Upper bound (inclusive) of the Micro band.
pub const MICRO_TURNOVER_LIMIT: i64 = 500_000;
/// Upper bound (inclusive) of the Small band.
pub const SMALL_TURNOVER_LIMIT: i64 = 5_000_000;

/// Sum of every Income entry the owner has ever recorded. There is no date
/// window here: the whole ledger counts as turnover.
pub fn total_income(transactions: &[Transaction], owner_id: &str) -> Decimal {
    let query = TransactionsOf::income(owner_id);
    transactions
        .iter()
        .filter(|tx| query.matches(*tx))
        .map(|tx| tx.amount)
        .sum()
}

pub fn classify(turnover: Decimal) -> SizeCategory {
    if turnover <= Decimal::from(MICRO_TURNOVER_LIMIT) {
        SizeCategory::Micro
    } else if turnover <= Decimal::from(SMALL_TURNOVER_LIMIT) {
        SizeCategory::Small
    } else {
        SizeCategory::Medium
    }
}

pub fn classify_owner(transactions: &[Transaction], owner_id: &str) -> SizeCategory {
    classify(total_income(transactions, owner_id))
}

/// Recomputes a user's size category and stores it if it changed.
pub fn classify_and_persist(db: &JsonDb, user_id: &str) -> Result<SizeCategory, AppError> {
    let user = db
        .find::<User>(&ById(user_id))
        .ok_or_else(|| AppError::not_found("User not found"))?;

    let category = classify_owner(&db.all::<Transaction>(), user_id);

    if user.size_category != category {
        log::info!(
            "user {} reclassified {} -> {}",
            user_id,
            user.size_category.as_str(),
            category.as_str()
        );
        db.update::<User, _, AppError>(user_id, |u| {
            u.size_category = category;
            Ok(())
        })?;
    }

    Ok(category)
}
