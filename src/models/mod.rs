pub mod ad;
pub mod product;
pub mod query;
pub mod transaction;
pub mod user;

use serde::{Deserialize, Deserializer};

pub use ad::{Ad, PublishAd};
pub use product::{Product, ProductUpdate, ProductView, SYSTEM_OWNER};
pub use query::{ById, ByEmail, OwnedBy, Query, TransactionsOf, VisibleTo};
pub use transaction::{PaymentMethod, Transaction, TransactionStatus, TransactionType};
pub use user::{SizeCategory, User, UserResponse};

/// Reads `null` the same as a missing key. Stores written by older servers
/// hold `null` wherever a number failed to parse on the way in.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
