use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

use async_trait::async_trait;
use marquee_application::{ItemStore, RangeQuery, StoredItem};
use marquee_core::{AppError, AppResult};
use serde_json::Value;
use tokio::sync::RwLock;

/// In-memory item store. Partitions keep their items ordered by sort key.
#[derive(Debug, Default)]
pub struct InMemoryItemStore {
    partitions: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

impl InMemoryItemStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn get(&self, partition_key: &str, sort_key: &str) -> AppResult<Option<Value>> {
        Ok(self
            .partitions
            .read()
            .await
            .get(partition_key)
            .and_then(|partition| partition.get(sort_key))
            .cloned())
    }

    async fn put(&self, item: StoredItem) -> AppResult<()> {
        self.partitions
            .write()
            .await
            .entry(item.partition_key)
            .or_default()
            .insert(item.sort_key, item.data);
        Ok(())
    }

    async fn insert(&self, item: StoredItem) -> AppResult<()> {
        let mut partitions = self.partitions.write().await;
        let partition = partitions.entry(item.partition_key.clone()).or_default();

        if partition.contains_key(&item.sort_key) {
            return Err(AppError::Conflict(format!(
                "item '{}' already exists in partition '{}'",
                item.sort_key, item.partition_key
            )));
        }

        partition.insert(item.sort_key, item.data);
        Ok(())
    }

    async fn delete(&self, partition_key: &str, sort_key: &str) -> AppResult<bool> {
        let mut partitions = self.partitions.write().await;
        let Some(partition) = partitions.get_mut(partition_key) else {
            return Ok(false);
        };

        let removed = partition.remove(sort_key).is_some();
        if partition.is_empty() {
            partitions.remove(partition_key);
        }
        Ok(removed)
    }

    async fn query(&self, partition_key: &str, query: RangeQuery) -> AppResult<Vec<StoredItem>> {
        let partitions = self.partitions.read().await;
        let Some(partition) = partitions.get(partition_key) else {
            return Ok(Vec::new());
        };

        let lower = query
            .gt
            .as_deref()
            .map_or(Bound::Unbounded, Bound::Excluded);
        let upper = query
            .lt
            .as_deref()
            .map_or(Bound::Unbounded, Bound::Excluded);
        if let (Bound::Excluded(gt), Bound::Excluded(lt)) = (lower, upper)
            && gt >= lt
        {
            return Ok(Vec::new());
        }

        let range = partition
            .range::<str, _>((lower, upper))
            .filter(|(sort_key, _)| query.matches(sort_key));
        let limit = query.limit.unwrap_or(usize::MAX);
        let to_item = |(sort_key, data): (&String, &Value)| StoredItem {
            partition_key: partition_key.to_owned(),
            sort_key: sort_key.clone(),
            data: data.clone(),
        };

        let items = if query.reverse {
            range.rev().take(limit).map(to_item).collect()
        } else {
            range.take(limit).map(to_item).collect()
        };
        Ok(items)
    }
}
