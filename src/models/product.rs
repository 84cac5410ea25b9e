use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::null_as_default;
use crate::services::inventory::InventoryStatus;

/// Owner marker for the shared demo catalog.
pub const SYSTEM_OWNER: &str = "SYSTEM";

pub const DEFAULT_REORDER_LEVEL: u32 = 10;

fn default_reorder_level() -> u32 {
    DEFAULT_REORDER_LEVEL
}

// `null_as_default` with the reorder default instead of zero.
fn reorder_level_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(DEFAULT_REORDER_LEVEL))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "userId")]
    pub owner_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub stock: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Decimal,
    #[serde(default = "default_reorder_level", deserialize_with = "reorder_level_or_default")]
    pub reorder_level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_restocked: Option<DateTime<Utc>>,
}

impl Product {
    pub fn status(&self) -> InventoryStatus {
        InventoryStatus::evaluate(self.stock, self.reorder_level)
    }
}

/// A product with its derived stock status, as returned to clients.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub status: InventoryStatus,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let status = product.status();
        Self { product, status }
    }
}

/// Partial update applied to a stored product. Unknown fields are rejected.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductUpdate {
    pub restock: Option<u32>,
    pub price: Option<Decimal>,
    pub reorder_level: Option<u32>,
}

impl ProductUpdate {
    pub fn restock(quantity: u32) -> Self {
        Self {
            restock: Some(quantity),
            ..Self::default()
        }
    }

    pub fn apply(&self, product: &mut Product, now: DateTime<Utc>) -> Result<(), String> {
        if let Some(quantity) = self.restock {
            product.stock = product
                .stock
                .checked_add(quantity)
                .ok_or_else(|| format!("Restocking {} would overflow stock", quantity))?;
            product.last_restocked = Some(now);
        }
        if let Some(price) = self.price {
            if price.is_sign_negative() {
                return Err("price must not be negative".to_string());
            }
            product.price = price;
        }
        if let Some(level) = self.reorder_level {
            product.reorder_level = level;
        }
        Ok(())
    }
}
