use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::input::{required, required_text, JsonBody, NumericField};
use crate::{
    database::Database,
    error::AppError,
    models::{product::DEFAULT_REORDER_LEVEL, OwnedBy, Product, ProductUpdate, ProductView, SYSTEM_OWNER},
    services::inventory::{self, MarketAlert, Supplier},
};

/// The owner's own products only; the shared catalog is not listed here.
pub async fn list_products(
    State(db): State<Database>,
    Path(user_id): Path<String>,
) -> Json<Vec<ProductView>> {
    let products = db.filter::<Product>(&OwnedBy(&user_id));
    Json(products.into_iter().map(ProductView::from).collect())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RestockRequest {
    pub product_id: Option<String>,
    pub quantity: Option<NumericField>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub msg: &'static str,
    pub product: ProductView,
}

pub async fn restock(
    State(db): State<Database>,
    JsonBody(form): JsonBody<RestockRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let product_id = required_text(form.product_id, "productId")?;
    let quantity = required(form.quantity, "quantity")?.to_count("quantity")?;

    let update = ProductUpdate::restock(quantity);
    let now = Utc::now();
    let product = db
        .update::<Product, _, AppError>(&product_id, |p| {
            update.apply(p, now).map_err(AppError::Validation)
        })
        .map_err(|err| match err {
            AppError::NotFound(_) => AppError::not_found("Product not found"),
            other => other,
        })?;

    log::info!("restocked {} by {} (now {})", product.id, quantity, product.stock);

    Ok(Json(ProductResponse {
        msg: "Stock updated",
        product: product.into(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProductRequest {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub stock: Option<NumericField>,
    pub price: Option<NumericField>,
    pub reorder_level: Option<NumericField>,
    pub category: Option<String>,
    pub cost_price: Option<NumericField>,
}

impl AddProductRequest {
    fn into_product(self) -> Result<Product, AppError> {
        let name = required_text(self.name, "name")?;
        let stock = required(self.stock, "stock")?.to_count("stock")?;
        let price = non_negative(required(self.price, "price")?.to_decimal("price")?, "price")?;
        // Optional inputs left empty on the form fall back like missing ones.
        let reorder_level = match self.reorder_level.filter(|level| !level.is_blank()) {
            Some(level) => level.to_count("reorderLevel")?,
            None => DEFAULT_REORDER_LEVEL,
        };
        let cost_price = self
            .cost_price
            .filter(|cost| !cost.is_blank())
            .map(|c| c.to_decimal("costPrice").and_then(|v| non_negative(v, "costPrice")))
            .transpose()?;

        Ok(Product {
            id: String::new(),
            owner_id: self
                .user_id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| SYSTEM_OWNER.to_string()),
            name,
            stock,
            price,
            reorder_level,
            category: self.category.filter(|c| !c.trim().is_empty()),
            cost_price,
            last_restocked: None,
        })
    }
}

fn non_negative(value: Decimal, field: &str) -> Result<Decimal, AppError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::validation(format!("{} must not be negative", field)));
    }
    Ok(value)
}

pub async fn add_product(
    State(db): State<Database>,
    JsonBody(form): JsonBody<AddProductRequest>,
) -> Result<Json<ProductResponse>, AppError> {
    let product = db.add(form.into_product()?)?;

    Ok(Json(ProductResponse {
        msg: "Product added",
        product: product.into(),
    }))
}

pub async fn market_alerts(State(db): State<Database>) -> Json<Vec<MarketAlert>> {
    Json(inventory::market_alerts(&db.all::<Product>()))
}

#[derive(Debug, Deserialize)]
pub struct SupplierParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn suppliers(Query(params): Query<SupplierParams>) -> Json<Vec<Supplier>> {
    let kind = params.kind.as_deref().filter(|k| !k.is_empty());
    Json(inventory::suppliers(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(json: &str) -> AddProductRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn add_defaults_owner_and_reorder_level() {
        let product = request(r#"{"name": "Turmeric", "stock": "12", "price": 80}"#)
            .into_product()
            .unwrap();

        assert_eq!(product.owner_id, SYSTEM_OWNER);
        assert_eq!(product.reorder_level, 10);
        assert_eq!(product.stock, 12);
        assert_eq!(product.price, Decimal::from(80));
    }

    #[test]
    fn add_rejects_bad_numbers() {
        assert!(request(r#"{"name": "X", "stock": "lots", "price": 1}"#).into_product().is_err());
        assert!(request(r#"{"name": "X", "stock": 1, "price": -5}"#).into_product().is_err());
        assert!(request(r#"{"name": "X", "price": 1}"#).into_product().is_err());
    }

    #[test]
    fn empty_optional_inputs_use_defaults() {
        let product = request(
            r#"{"name": "Soap", "stock": "4", "price": "30", "reorderLevel": "", "costPrice": " "}"#,
        )
        .into_product()
        .unwrap();
        assert_eq!(product.reorder_level, DEFAULT_REORDER_LEVEL);
        assert_eq!(product.cost_price, None);

        assert!(request(r#"{"name": "Soap", "stock": 4, "price": 30, "reorderLevel": "abc"}"#)
            .into_product()
            .is_err());
        assert!(request(r#"{"name": "Soap", "stock": 4, "price": 30, "costPrice": "abc"}"#)
            .into_product()
            .is_err());
    }

    #[test]
    fn restock_rejects_unknown_fields() {
        let parsed = serde_json::from_str::<RestockRequest>(
            r#"{"productId": "p1", "quantity": 5, "stock": 999}"#,
        );
        assert!(parsed.is_err());
    }
}
