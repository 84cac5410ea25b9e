//! Typed predicates for scanning store collections.

use super::{Ad, Product, Transaction, TransactionType, User, SYSTEM_OWNER};

pub trait Query<T> {
    fn matches(&self, record: &T) -> bool;
}

/// Record with a given id.
pub struct ById<'a>(pub &'a str);

macro_rules! by_id {
    ($($ty:ty),*) => {
        $(impl Query<$ty> for ById<'_> {
            fn matches(&self, record: &$ty) -> bool {
                record.id == self.0
            }
        })*
    };
}

by_id!(User, Product, Transaction, Ad);

pub struct ByEmail<'a>(pub &'a str);

impl Query<User> for ByEmail<'_> {
    fn matches(&self, user: &User) -> bool {
        user.email == self.0
    }
}

/// Records belonging to exactly one owner.
pub struct OwnedBy<'a>(pub &'a str);

impl Query<Product> for OwnedBy<'_> {
    fn matches(&self, product: &Product) -> bool {
        product.owner_id == self.0
    }
}

impl Query<Transaction> for OwnedBy<'_> {
    fn matches(&self, tx: &Transaction) -> bool {
        tx.owner_id == self.0
    }
}

/// Products an owner can see in aggregates: their own plus the shared catalog.
pub struct VisibleTo<'a>(pub &'a str);

impl Query<Product> for VisibleTo<'_> {
    fn matches(&self, product: &Product) -> bool {
        product.owner_id == self.0 || product.owner_id == SYSTEM_OWNER
    }
}

/// One owner's ledger, optionally narrowed to a single kind.
pub struct TransactionsOf<'a> {
    pub owner: &'a str,
    pub kind: Option<TransactionType>,
}

impl<'a> TransactionsOf<'a> {
    pub fn all(owner: &'a str) -> Self {
        Self { owner, kind: None }
    }

    pub fn income(owner: &'a str) -> Self {
        Self {
            owner,
            kind: Some(TransactionType::Income),
        }
    }

    pub fn expenses(owner: &'a str) -> Self {
        Self {
            owner,
            kind: Some(TransactionType::Expense),
        }
    }
}

impl Query<Transaction> for TransactionsOf<'_> {
    fn matches(&self, tx: &Transaction) -> bool {
        tx.owner_id == self.owner && self.kind.map_or(true, |kind| tx.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn tx(owner: &str, kind: TransactionType) -> Transaction {
        Transaction {
            id: "t".into(),
            owner_id: owner.into(),
            kind,
            amount: Decimal::ONE,
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            payment_method: None,
            status: None,
        }
    }

    fn product(owner: &str) -> Product {
        Product {
            id: "p".into(),
            owner_id: owner.into(),
            name: "Item".into(),
            stock: 1,
            price: Decimal::ONE,
            reorder_level: 10,
            category: None,
            cost_price: None,
            last_restocked: None,
        }
    }

    #[test]
    fn transactions_of_narrows_by_kind() {
        let income = tx("u1", TransactionType::Income);
        let expense = tx("u1", TransactionType::Expense);
        let other = tx("u2", TransactionType::Income);

        assert!(TransactionsOf::all("u1").matches(&income));
        assert!(TransactionsOf::all("u1").matches(&expense));
        assert!(TransactionsOf::income("u1").matches(&income));
        assert!(!TransactionsOf::income("u1").matches(&expense));
        assert!(TransactionsOf::expenses("u1").matches(&expense));
        assert!(!TransactionsOf::income("u1").matches(&other));
    }

    #[test]
    fn visible_to_includes_shared_catalog() {
        assert!(VisibleTo("u1").matches(&product("u1")));
        assert!(VisibleTo("u1").matches(&product(SYSTEM_OWNER)));
        assert!(!VisibleTo("u1").matches(&product("u2")));

        assert!(!OwnedBy("u1").matches(&product(SYSTEM_OWNER)));
    }
}
