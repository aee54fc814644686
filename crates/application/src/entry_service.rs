//! Shared CRUD and cursor pagination for agencies, brands, and products.

use std::sync::Arc;

use marquee_core::{AppError, AppResult, SecurityIdentity, TenantId};
use marquee_domain::{CreatedBy, Entry, EntryKind, EntryPatch, ListRequest, Page};

use crate::item_store::{from_data, get_as, to_item};
use crate::{ItemStore, RangeQuery, RequestContext};

#[cfg(test)]
mod tests;

/// Input for creating an entry.
#[derive(Debug, Clone)]
pub struct EntryInput {
    /// Entry title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
}

/// Application service for tenant-scoped entries.
#[derive(Clone)]
pub struct EntryService {
    store: Arc<dyn ItemStore>,
    app_version: String,
}

impl EntryService {
    /// Creates an entry service stamping new entries with `app_version`.
    #[must_use]
    pub fn new(store: Arc<dyn ItemStore>, app_version: impl Into<String>) -> Self {
        Self {
            store,
            app_version: app_version.into(),
        }
    }

    /// Returns an entry of the current tenant.
    pub async fn get(&self, context: &RequestContext, kind: EntryKind, id: &str) -> AppResult<Entry> {
        context.require_permission(kind.permission_name())?;
        self.find_in_tenant(context.tenant().id(), kind, id)
            .await?
            .ok_or_else(|| not_found(kind, id))
    }

    /// Lists one page of entries of the current tenant.
    pub async fn list(
        &self,
        context: &RequestContext,
        kind: EntryKind,
        request: &ListRequest,
    ) -> AppResult<Page<Entry>> {
        context.require_permission(kind.permission_name())?;
        self.list_in_tenant(context.tenant().id(), kind, request).await
    }

    /// Creates an entry in the current tenant.
    pub async fn create(
        &self,
        context: &RequestContext,
        kind: EntryKind,
        input: EntryInput,
    ) -> AppResult<Entry> {
        context.require_permission(kind.permission_name())?;
        self.create_in_tenant(context.tenant().id(), kind, input, context.identity())
            .await
    }

    /// Merges `patch` into an existing entry of the current tenant.
    pub async fn update(
        &self,
        context: &RequestContext,
        kind: EntryKind,
        id: &str,
        patch: EntryPatch,
    ) -> AppResult<Entry> {
        context.require_permission(kind.permission_name())?;
        let tenant_id = context.tenant().id();
        let mut entry = self
            .find_in_tenant(tenant_id, kind, id)
            .await?
            .ok_or_else(|| not_found(kind, id))?;

        entry.apply(patch)?;
        self.store
            .put(to_item(kind.partition_key(tenant_id), entry.id().as_str(), &entry)?)
            .await?;
        Ok(entry)
    }

    /// Deletes an entry of the current tenant and returns it.
    pub async fn delete(
        &self,
        context: &RequestContext,
        kind: EntryKind,
        id: &str,
    ) -> AppResult<Entry> {
        context.require_permission(kind.permission_name())?;
        let tenant_id = context.tenant().id();
        let entry = self
            .find_in_tenant(tenant_id, kind, id)
            .await?
            .ok_or_else(|| not_found(kind, id))?;

        if !self
            .store
            .delete(&kind.partition_key(tenant_id), entry.id().as_str())
            .await?
        {
            return Err(not_found(kind, id));
        }
        Ok(entry)
    }

    pub(crate) async fn find_in_tenant(
        &self,
        tenant_id: &TenantId,
        kind: EntryKind,
        id: &str,
    ) -> AppResult<Option<Entry>> {
        get_as(self.store.as_ref(), &kind.partition_key(tenant_id), id).await
    }

    pub(crate) async fn list_in_tenant(
        &self,
        tenant_id: &TenantId,
        kind: EntryKind,
        request: &ListRequest,
    ) -> AppResult<Page<Entry>> {
        let plan = request.plan();
        let rows = self
            .store
            .query(
                &kind.partition_key(tenant_id),
                RangeQuery {
                    limit: Some(plan.fetch_limit()),
                    reverse: plan.reverse(),
                    gt: plan.gt().map(str::to_owned),
                    lt: plan.lt().map(str::to_owned),
                    begins_with: None,
                },
            )
            .await?
            .into_iter()
            .map(|item| from_data::<Entry>(item.data))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(plan.into_page(rows, |entry| entry.id().as_str()))
    }

    pub(crate) async fn create_in_tenant(
        &self,
        tenant_id: &TenantId,
        kind: EntryKind,
        input: EntryInput,
        identity: Option<&SecurityIdentity>,
    ) -> AppResult<Entry> {
        let entry = Entry::new(
            kind,
            input.title,
            input.description,
            identity.map(CreatedBy::from),
            Some(self.app_version.clone()),
        )?;

        self.store
            .insert(to_item(kind.partition_key(tenant_id), entry.id().as_str(), &entry)?)
            .await?;
        Ok(entry)
    }
}

pub(crate) fn not_found(kind: EntryKind, id: &str) -> AppError {
    AppError::NotFound(format!("{kind} \"{id}\" not found."))
}
