//! Stock-health tiers and the cross-network views built on them.

use serde::Serialize;
use rust_decimal::Decimal;

use crate::models::Product;

/// At or below this many units a product is critical regardless of its reorder level.
pub const CRITICAL_STOCK: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InventoryStatus {
    Critical,
    Low,
    Good,
}

impl InventoryStatus {
    /// Critical is checked first so ties resolve to the more severe tier.
    pub fn evaluate(stock: u32, reorder_level: u32) -> Self {
        if stock <= CRITICAL_STOCK {
            InventoryStatus::Critical
        } else if stock <= reorder_level {
            InventoryStatus::Low
        } else {
            InventoryStatus::Good
        }
    }

    pub fn needs_restock(self) -> bool {
        matches!(self, InventoryStatus::Critical | InventoryStatus::Low)
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketAlert {
    pub product_name: String,
    pub price: Decimal,
    pub status: &'static str,
    pub seller_id: String,
}

/// Products from any owner that are currently Low or Critical, surfaced as
/// a demand signal.
pub fn market_alerts(products: &[Product]) -> Vec<MarketAlert> {
    products
        .iter()
        .filter(|p| p.status().needs_restock())
        .map(|p| MarketAlert {
            product_name: p.name.clone(),
            price: p.price,
            status: "High Demand (Low Stock)",
            seller_id: p.owner_id.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Supplier {
    pub id: u32,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub rating: f32,
}

const SUPPLIERS: [Supplier; 4] = [
    Supplier { id: 1, name: "Global Distributors Ltd", kind: "Distribution", rating: 4.5 },
    Supplier { id: 2, name: "Local Farm Fresh", kind: "Wholesale", rating: 4.8 },
    Supplier { id: 3, name: "City Retail Supplies", kind: "Retail", rating: 4.2 },
    Supplier { id: 4, name: "Tech Components Inc", kind: "Distribution", rating: 4.7 },
];

/// Static supplier directory, optionally filtered by type (case-insensitive).
pub fn suppliers(kind: Option<&str>) -> Vec<Supplier> {
    SUPPLIERS
        .iter()
        .filter(|s| kind.map_or(true, |k| s.kind.eq_ignore_ascii_case(k)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SYSTEM_OWNER;

    fn product(name: &str, owner: &str, stock: u32, reorder_level: u32) -> Product {
        Product {
            id: name.to_lowercase(),
            owner_id: owner.into(),
            name: name.into(),
            stock,
            price: Decimal::from(100),
            reorder_level,
            category: None,
            cost_price: None,
            last_restocked: None,
        }
    }

    #[test]
    fn critical_wins_over_low() {
        assert_eq!(InventoryStatus::evaluate(5, 10), InventoryStatus::Critical);
        assert_eq!(InventoryStatus::evaluate(0, 0), InventoryStatus::Critical);
    }

    #[test]
    fn low_at_or_below_reorder_level() {
        assert_eq!(InventoryStatus::evaluate(6, 10), InventoryStatus::Low);
        assert_eq!(InventoryStatus::evaluate(10, 10), InventoryStatus::Low);
        assert_eq!(InventoryStatus::evaluate(11, 10), InventoryStatus::Good);
    }

    #[test]
    fn reorder_level_below_critical_still_critical() {
        assert_eq!(InventoryStatus::evaluate(3, 2), InventoryStatus::Critical);
        assert_eq!(InventoryStatus::evaluate(6, 2), InventoryStatus::Good);
    }

    #[test]
    fn alerts_cover_every_owner() {
        let products = vec![
            product("Silk Fabric", SYSTEM_OWNER, 5, 10),
            product("Polyester Thread", SYSTEM_OWNER, 20, 30),
            product("Cotton Yarn", SYSTEM_OWNER, 120, 50),
            product("Cough Syrup", "u7", 2, 5),
        ];

        let alerts = market_alerts(&products);
        let names: Vec<&str> = alerts.iter().map(|a| a.product_name.as_str()).collect();

        assert_eq!(names, vec!["Silk Fabric", "Polyester Thread", "Cough Syrup"]);
        assert_eq!(alerts[2].seller_id, "u7");
        assert_eq!(alerts[0].status, "High Demand (Low Stock)");
    }

    #[test]
    fn supplier_filter_ignores_case() {
        let found = suppliers(Some("distribution"));
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|s| s.kind == "Distribution"));

        assert_eq!(suppliers(None).len(), 4);
        assert!(suppliers(Some("Import")).is_empty());
    }
}
