//! Single-table key-value storage port.
//!
//! Every persisted record is addressed by a partition key and a sort key.
//! Range queries scan one partition in sort-key order, which is what the
//! cursor pagination of entries relies on.

use async_trait::async_trait;
use marquee_core::{AppError, AppResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Persisted item in the item store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredItem {
    /// Partition key.
    pub partition_key: String,
    /// Sort key, unique within the partition.
    pub sort_key: String,
    /// Item attributes.
    pub data: Value,
}

/// Range query over one partition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeQuery {
    /// Maximum number of items to return.
    pub limit: Option<usize>,
    /// Scan sort keys in descending order.
    pub reverse: bool,
    /// Exclusive lower sort-key bound.
    pub gt: Option<String>,
    /// Exclusive upper sort-key bound.
    pub lt: Option<String>,
    /// Required sort-key prefix.
    pub begins_with: Option<String>,
}

impl RangeQuery {
    /// Returns a query selecting every item of the partition whose sort key
    /// starts with `prefix`.
    #[must_use]
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            begins_with: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Returns whether `sort_key` satisfies the bounds and prefix of the query.
    #[must_use]
    pub fn matches(&self, sort_key: &str) -> bool {
        self.gt.as_deref().is_none_or(|gt| sort_key > gt)
            && self.lt.as_deref().is_none_or(|lt| sort_key < lt)
            && self
                .begins_with
                .as_deref()
                .is_none_or(|prefix| sort_key.starts_with(prefix))
    }
}

/// Storage port for the single-table item store.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Returns the item data at the given key, if present.
    async fn get(&self, partition_key: &str, sort_key: &str) -> AppResult<Option<Value>>;

    /// Writes an item, replacing any existing one.
    async fn put(&self, item: StoredItem) -> AppResult<()>;

    /// Writes an item only if no item exists at its key.
    ///
    /// Fails with [`AppError::Conflict`] when the key is taken.
    async fn insert(&self, item: StoredItem) -> AppResult<()>;

    /// Removes an item. Returns whether an item was removed.
    async fn delete(&self, partition_key: &str, sort_key: &str) -> AppResult<bool>;

    /// Scans one partition in sort-key order.
    async fn query(&self, partition_key: &str, query: RangeQuery) -> AppResult<Vec<StoredItem>>;
}

pub(crate) fn to_item<T: Serialize>(
    partition_key: impl Into<String>,
    sort_key: impl Into<String>,
    value: &T,
) -> AppResult<StoredItem> {
    let data = serde_json::to_value(value)
        .map_err(|error| AppError::Internal(format!("failed to encode item: {error}")))?;

    Ok(StoredItem {
        partition_key: partition_key.into(),
        sort_key: sort_key.into(),
        data,
    })
}

pub(crate) fn from_data<T: DeserializeOwned>(data: Value) -> AppResult<T> {
    serde_json::from_value(data)
        .map_err(|error| AppError::Internal(format!("failed to decode item: {error}")))
}

pub(crate) async fn get_as<T: DeserializeOwned>(
    store: &dyn ItemStore,
    partition_key: &str,
    sort_key: &str,
) -> AppResult<Option<T>> {
    store
        .get(partition_key, sort_key)
        .await?
        .map(from_data)
        .transpose()
}

pub(crate) async fn query_as<T: DeserializeOwned>(
    store: &dyn ItemStore,
    partition_key: &str,
    query: RangeQuery,
) -> AppResult<Vec<T>> {
    store
        .query(partition_key, query)
        .await?
        .into_iter()
        .map(|item| from_data(item.data))
        .collect()
}
