//! Flat-file JSON store.
//!
//! All collections live in memory and the whole document is rewritten to disk
//! after every mutation. Writers are serialized by an internal mutex, so within
//! one process a read-modify-save never loses a concurrent `add`. Two processes
//! sharing the same file still race with last-write-wins.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Ad, Product, Query, Transaction, User, SYSTEM_OWNER};

pub type Database = Arc<JsonDb>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to write store file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode store: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("no record '{id}' in {collection}")]
    NotFound { collection: &'static str, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Products,
    Transactions,
    Ads,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Products => "products",
            Collection::Transactions => "transactions",
            Collection::Ads => "ads",
        }
    }
}

impl FromStr for Collection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(Collection::Users),
            "products" => Ok(Collection::Products),
            "transactions" => Ok(Collection::Transactions),
            "ads" => Ok(Collection::Ads),
            _ => Err(()),
        }
    }
}

/// On-disk document layout. Missing keys load as empty collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub ads: Vec<Ad>,
}

impl StoreData {
    /// Empty users/transactions/ads plus the shared demo catalog.
    pub fn default_dataset() -> Self {
        Self {
            products: vec![
                system_product("prod1", "Cotton Yarn", 120, 50, 500),
                system_product("prod2", "Polyester Thread", 20, 30, 200),
                system_product("prod3", "Silk Fabric", 5, 10, 1500),
            ],
            ..Self::default()
        }
    }
}

fn system_product(id: &str, name: &str, stock: u32, reorder_level: u32, price: i64) -> Product {
    Product {
        id: id.to_string(),
        owner_id: SYSTEM_OWNER.to_string(),
        name: name.to_string(),
        stock,
        price: Decimal::from(price),
        reorder_level,
        category: None,
        cost_price: None,
        last_restocked: None,
    }
}

/// A record type stored in one of the collections.
pub trait Record: Clone + Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn rows(data: &StoreData) -> &Vec<Self>;
    fn rows_mut(data: &mut StoreData) -> &mut Vec<Self>;
}

macro_rules! impl_record {
    ($ty:ty, $collection:expr, $field:ident) => {
        impl Record for $ty {
            const COLLECTION: Collection = $collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn rows(data: &StoreData) -> &Vec<Self> {
                &data.$field
            }

            fn rows_mut(data: &mut StoreData) -> &mut Vec<Self> {
                &mut data.$field
            }
        }
    };
}

impl_record!(User, Collection::Users, users);
impl_record!(Product, Collection::Products, products);
impl_record!(Transaction, Collection::Transactions, transactions);
impl_record!(Ad, Collection::Ads, ads);

/// Millisecond timestamp followed by a 5-character random suffix.
pub fn generate_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", Utc::now().timestamp_millis(), &suffix[..5])
}

pub struct JsonDb {
    path: PathBuf,
    data: Mutex<StoreData>,
}

pub fn open_database(path: impl Into<PathBuf>) -> Database {
    Arc::new(JsonDb::load(path))
}

impl JsonDb {
    /// Reads the store file. A missing file is created from the default
    /// dataset; an unreadable one is left untouched and the defaults are
    /// served from memory.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let data = if path.exists() {
            match read_store(&path) {
                Ok(data) => {
                    log::info!(
                        "loaded store from {} ({} users, {} products, {} transactions, {} ads)",
                        path.display(),
                        data.users.len(),
                        data.products.len(),
                        data.transactions.len(),
                        data.ads.len()
                    );
                    data
                }
                Err(err) => {
                    log::error!(
                        "could not read {}: {}; serving default dataset",
                        path.display(),
                        err
                    );
                    StoreData::default_dataset()
                }
            }
        } else {
            let data = StoreData::default_dataset();
            match write_store(&path, &data) {
                Ok(()) => log::info!("initialised new store at {}", path.display()),
                Err(err) => log::error!("could not create {}: {}", path.display(), err),
            }
            data
        };

        Self {
            path,
            data: Mutex::new(data),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Untyped view of a collection by name; unknown names yield nothing.
    pub fn get_collection(&self, name: &str) -> Vec<serde_json::Value> {
        let Ok(collection) = name.parse::<Collection>() else {
            return Vec::new();
        };

        let data = self.lock();
        let rows = match collection {
            Collection::Users => serde_json::to_value(&data.users),
            Collection::Products => serde_json::to_value(&data.products),
            Collection::Transactions => serde_json::to_value(&data.transactions),
            Collection::Ads => serde_json::to_value(&data.ads),
        };

        match rows {
            Ok(serde_json::Value::Array(rows)) => rows,
            _ => Vec::new(),
        }
    }

    /// Snapshot of a whole collection in insertion order.
    pub fn all<T: Record>(&self) -> Vec<T> {
        T::rows(&self.lock()).clone()
    }

    pub fn find<T: Record>(&self, query: &impl Query<T>) -> Option<T> {
        T::rows(&self.lock())
            .iter()
            .find(|record| query.matches(*record))
            .cloned()
    }

    pub fn filter<T: Record>(&self, query: &impl Query<T>) -> Vec<T> {
        T::rows(&self.lock())
            .iter()
            .filter(|record| query.matches(*record))
            .cloned()
            .collect()
    }

    /// Appends a record, assigning an id when it has none, and rewrites the
    /// file. If the write fails the record is dropped from memory again.
    pub fn add<T: Record>(&self, mut record: T) -> Result<T, StoreError> {
        if record.id().is_empty() {
            record.set_id(generate_id());
        }

        let mut data = self.lock();
        T::rows_mut(&mut data).push(record.clone());

        if let Err(err) = write_store(&self.path, &data) {
            T::rows_mut(&mut data).pop();
            return Err(err);
        }
        Ok(record)
    }

    /// Like [`JsonDb::add`], but only when no stored record matches `existing`.
    /// The check and the insert happen under one lock.
    pub fn add_unless<T: Record>(
        &self,
        mut record: T,
        existing: &impl Query<T>,
    ) -> Result<Option<T>, StoreError> {
        let mut data = self.lock();
        if T::rows(&data).iter().any(|row| existing.matches(row)) {
            return Ok(None);
        }

        if record.id().is_empty() {
            record.set_id(generate_id());
        }
        T::rows_mut(&mut data).push(record.clone());

        if let Err(err) = write_store(&self.path, &data) {
            T::rows_mut(&mut data).pop();
            return Err(err);
        }
        Ok(Some(record))
    }

    /// Appends a batch with a single file rewrite.
    pub fn add_many<T: Record>(&self, records: Vec<T>) -> Result<Vec<T>, StoreError> {
        let records: Vec<T> = records
            .into_iter()
            .map(|mut record| {
                if record.id().is_empty() {
                    record.set_id(generate_id());
                }
                record
            })
            .collect();

        let mut data = self.lock();
        let before = T::rows(&data).len();
        T::rows_mut(&mut data).extend(records.iter().cloned());

        if let Err(err) = write_store(&self.path, &data) {
            T::rows_mut(&mut data).truncate(before);
            return Err(err);
        }
        Ok(records)
    }

    /// Mutates one record in place and saves. The change is reverted if
    /// `change` fails or the file cannot be written.
    pub fn update<T, F, E>(&self, id: &str, change: F) -> Result<T, E>
    where
        T: Record,
        F: FnOnce(&mut T) -> Result<(), E>,
        E: From<StoreError>,
    {
        let mut data = self.lock();
        let index = T::rows(&data)
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION.as_str(),
                id: id.to_string(),
            })?;

        let original = T::rows(&data)[index].clone();
        let mut updated = original.clone();
        change(&mut updated)?;
        T::rows_mut(&mut data)[index] = updated.clone();

        if let Err(err) = write_store(&self.path, &data) {
            T::rows_mut(&mut data)[index] = original;
            return Err(err.into());
        }
        Ok(updated)
    }

    /// Rewrites the whole file from memory.
    pub fn save(&self) -> Result<(), StoreError> {
        write_store(&self.path, &self.lock())
    }
}

fn read_store(path: &Path) -> Result<StoreData, StoreError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn write_store(path: &Path, data: &StoreData) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    Ok(())
}
