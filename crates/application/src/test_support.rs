use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use marquee_core::{AppError, AppResult, NonEmptyString, SecurityIdentity};
use marquee_domain::{Permission, Tenant};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{ItemStore, PasswordHasher, RangeQuery, RequestContext, StoredItem};

#[derive(Default)]
pub(crate) struct FakeItemStore {
    items: Mutex<BTreeMap<(String, String), Value>>,
}

impl FakeItemStore {
    pub(crate) fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn len(&self) -> usize {
        self.items.lock().await.len()
    }
}

#[async_trait]
impl ItemStore for FakeItemStore {
    async fn get(&self, partition_key: &str, sort_key: &str) -> AppResult<Option<Value>> {
        Ok(self
            .items
            .lock()
            .await
            .get(&(partition_key.to_owned(), sort_key.to_owned()))
            .cloned())
    }

    async fn put(&self, item: StoredItem) -> AppResult<()> {
        self.items
            .lock()
            .await
            .insert((item.partition_key, item.sort_key), item.data);
        Ok(())
    }

    async fn insert(&self, item: StoredItem) -> AppResult<()> {
        let mut items = self.items.lock().await;
        let key = (item.partition_key, item.sort_key);
        if items.contains_key(&key) {
            return Err(AppError::Conflict(format!("item '{}/{}' exists", key.0, key.1)));
        }
        items.insert(key, item.data);
        Ok(())
    }

    async fn delete(&self, partition_key: &str, sort_key: &str) -> AppResult<bool> {
        Ok(self
            .items
            .lock()
            .await
            .remove(&(partition_key.to_owned(), sort_key.to_owned()))
            .is_some())
    }

    async fn query(&self, partition_key: &str, query: RangeQuery) -> AppResult<Vec<StoredItem>> {
        let items = self.items.lock().await;
        let mut rows: Vec<StoredItem> = items
            .iter()
            .filter(|((pk, sk), _)| pk == partition_key && query.matches(sk))
            .map(|((pk, sk), data)| StoredItem {
                partition_key: pk.clone(),
                sort_key: sk.clone(),
                data: data.clone(),
            })
            .collect();
        if query.reverse {
            rows.reverse();
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }
}

/// Reversible "hash" so tests can tell hashed from plain values.
pub(crate) struct FakePasswordHasher;

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

pub(crate) fn root_tenant() -> AppResult<Tenant> {
    Ok(Tenant::root(NonEmptyString::new("Root")?))
}

pub(crate) fn full_access_context(
    tenant: Tenant,
    identity: Option<SecurityIdentity>,
) -> RequestContext {
    RequestContext::new(tenant, identity, vec![Permission::wildcard()])
}
