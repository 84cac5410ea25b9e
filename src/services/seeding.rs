//! Starter inventory for new registrations and the optional demo account.

use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::{
    database::{JsonDb, StoreError},
    models::{ByEmail, Product, SizeCategory, Transaction, TransactionType, User},
};

/// (name, stock, price, reorder level)
type Starter = (&'static str, u32, i64, u32);

const FRUITS_AND_VEGETABLES: &[Starter] = &[
    ("Onions (kg)", 50, 40, 10),
    ("Potatoes (kg)", 60, 30, 15),
    ("Tomatoes (kg)", 20, 25, 10),
    ("Apples (kg)", 15, 120, 5),
    ("Bananas (Dozen)", 25, 60, 8),
];

const GROCERY: &[Starter] = &[
    ("Rice (25kg Bag)", 10, 1250, 3),
    ("Sunflower Oil (1L)", 30, 140, 10),
    ("Sugar (kg)", 40, 45, 10),
    ("Toor Dal (kg)", 25, 110, 5),
    ("Tea Powder (250g)", 50, 90, 12),
];

const SUPER_MART: &[Starter] = &[
    ("Biscuits (Pack)", 100, 20, 25),
    ("Soft Drinks (2L)", 40, 90, 10),
    ("Chips (L)", 60, 30, 15),
    ("Shampoo (200ml)", 20, 180, 5),
    ("Detergent (1kg)", 25, 210, 8),
];

const PHARMACY: &[Starter] = &[
    ("Paracetamol 650", 200, 15, 50),
    ("Cough Syrup", 30, 120, 5),
    ("Vitamin C", 100, 40, 20),
    ("N95 Masks", 50, 90, 10),
];

const ELECTRONICS: &[Starter] = &[
    ("USB-C Cable", 20, 350, 5),
    ("Screen Guard", 30, 150, 8),
    ("Power Bank", 10, 1200, 2),
    ("Earphones", 15, 500, 4),
];

const TEXTILES: &[Starter] = &[
    ("Cotton Shirt", 40, 650, 10),
    ("Denim Jeans", 30, 1200, 8),
    ("Silk Saree", 15, 2500, 4),
];

const GENERAL: &[Starter] = &[("General Item 1", 10, 100, 2)];

fn starter_set(business_type: &str) -> &'static [Starter] {
    match business_type {
        "Fruits & Vegetables" => FRUITS_AND_VEGETABLES,
        "Grocery / Kirana" => GROCERY,
        "Super Mart" => SUPER_MART,
        "Pharmacy" => PHARMACY,
        "Electronics" => ELECTRONICS,
        "Textiles" => TEXTILES,
        _ => GENERAL,
    }
}

/// Products a new business of `business_type` starts with, owned by `owner_id`.
pub fn starter_products(business_type: &str, owner_id: &str) -> Vec<Product> {
    starter_set(business_type)
        .iter()
        .map(|&(name, stock, price, reorder_level)| Product {
            id: String::new(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            stock,
            price: Decimal::from(price),
            reorder_level,
            category: None,
            cost_price: None,
            last_restocked: None,
        })
        .collect()
}

pub const DEMO_EMAIL: &str = "spa@hmail.com";
const DEMO_HISTORY_DAYS: u64 = 90;

/// Ensures the demo account exists. Ledger history is generated only when
/// the account is first created, so restarts never duplicate it.
pub fn seed_demo_user(db: &JsonDb, today: NaiveDate, rng: &mut impl Rng) -> Result<User, StoreError> {
    if let Some(existing) = db.find::<User>(&ByEmail(DEMO_EMAIL)) {
        log::info!("demo user already present: {}", existing.name);
        return Ok(existing);
    }

    let user = db.add(User {
        id: String::new(),
        name: "Pooja".to_string(),
        email: DEMO_EMAIL.to_string(),
        password: "password".to_string(),
        business_name: "Pooja Groceries".to_string(),
        business_type: "Groceries".to_string(),
        sector: "Retail".to_string(),
        location: "Bangalore".to_string(),
        size_category: SizeCategory::Micro,
        created_at: Some(Utc::now()),
    })?;

    let history = demo_history(&user.id, today, rng);
    let count = history.len();
    db.add_many(history)?;
    log::info!("seeded {} transactions for {}", count, DEMO_EMAIL);

    Ok(user)
}

/// Daily income for the trailing 90 days plus an expense every third day.
fn demo_history(owner_id: &str, today: NaiveDate, rng: &mut impl Rng) -> Vec<Transaction> {
    let mut history = Vec::new();

    for offset in 0..DEMO_HISTORY_DAYS {
        let Some(date) = today.checked_sub_days(Days::new(offset)) else {
            break;
        };
        let label = date.format("%Y-%m-%d");

        history.push(Transaction {
            id: String::new(),
            owner_id: owner_id.to_string(),
            kind: TransactionType::Income,
            amount: Decimal::from(rng.gen_range(2000..=10000i64)),
            description: format!("Daily Sales - {}", label),
            date,
            payment_method: None,
            status: None,
        });

        if offset % 3 == 0 {
            history.push(Transaction {
                id: String::new(),
                owner_id: owner_id.to_string(),
                kind: TransactionType::Expense,
                amount: Decimal::from(rng.gen_range(500..=3000i64)),
                description: format!("Stock Refill / Utilities - {}", label),
                date,
                payment_method: None,
                status: None,
            });
        }
    }

    history
}
