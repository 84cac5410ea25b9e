//! Request body helpers shared by the JSON handlers.

use std::str::FromStr;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::error::AppError;

/// `Json<T>` whose rejections are reported as `validation_failed` (400)
/// instead of axum's plain-text 415/422.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| AppError::Validation(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// A number the client may send either as a JSON number or as a string
/// (HTML form inputs arrive as text). Numbers keep every digit the client sent.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct NumericField(Value);

impl NumericField {
    fn raw(&self) -> Option<String> {
        match &self.0 {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Empty or whitespace-only text, as an untouched form input sends it.
    pub fn is_blank(&self) -> bool {
        matches!(&self.0, Value::String(s) if s.trim().is_empty())
    }

    pub fn to_decimal(&self, field: &str) -> Result<Decimal, AppError> {
        let raw = self.raw().unwrap_or_default();
        Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .map_err(|_| AppError::validation(format!("{} must be a number, got {}", field, self.0)))
    }

    /// Whole, non-negative quantity such as a stock count.
    pub fn to_count(&self, field: &str) -> Result<u32, AppError> {
        let raw = self.raw().unwrap_or_default();
        raw.parse::<u32>()
            .map_err(|_| AppError::validation(format!("{} must be a whole number >= 0, got {}", field, self.0)))
    }
}

pub fn required<T>(value: Option<T>, field: &str) -> Result<T, AppError> {
    value.ok_or_else(|| AppError::validation(format!("{} is required", field)))
}

/// Trimmed, non-empty text.
pub fn required_text(value: Option<String>, field: &str) -> Result<String, AppError> {
    let text = required(value, field)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(json: &str) -> NumericField {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn numbers_and_numeric_text_both_parse() {
        assert_eq!(field("10").to_count("quantity").unwrap(), 10);
        assert_eq!(field("\" 10 \"").to_count("quantity").unwrap(), 10);
        assert_eq!(field("12.5").to_decimal("price").unwrap(), Decimal::new(125, 1));
        assert_eq!(field("\"499.99\"").to_decimal("price").unwrap(), Decimal::new(49999, 2));
    }

    #[test]
    fn non_numeric_text_is_rejected_not_zeroed() {
        let err = field("\"ten\"").to_count("quantity").unwrap_err();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("quantity")));

        assert!(field("\"abc\"").to_decimal("amount").is_err());
        assert!(field("\"\"").to_decimal("amount").is_err());
    }

    #[test]
    fn long_amounts_keep_every_digit() {
        let amount = field("1234567890123456.78").to_decimal("amount").unwrap();
        assert_eq!(amount.to_string(), "1234567890123456.78");

        let third = field("0.3333333333333333333").to_decimal("amount").unwrap();
        assert_eq!(third.to_string(), "0.3333333333333333333");
    }

    #[test]
    fn only_numbers_and_text_are_numeric() {
        assert!(field("true").to_decimal("amount").is_err());
        assert!(field("null").to_count("stock").is_err());
        assert!(field("[1]").to_count("stock").is_err());
    }

    #[test]
    fn blank_means_empty_text_only() {
        assert!(field("\"\"").is_blank());
        assert!(field("\"  \"").is_blank());
        assert!(!field("\"0\"").is_blank());
        assert!(!field("0").is_blank());
    }

    #[test]
    fn counts_must_be_whole_and_non_negative() {
        assert!(field("-3").to_count("stock").is_err());
        assert!(field("2.5").to_count("stock").is_err());
    }

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text(Some("  Asha ".into()), "name").unwrap(), "Asha");
        assert!(required_text(Some("   ".into()), "name").is_err());
        assert!(required_text(None, "name").is_err());
    }
}
