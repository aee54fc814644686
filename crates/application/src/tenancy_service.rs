use std::sync::Arc;

use marquee_core::{AppError, AppResult, NonEmptyString, TenantId};
use marquee_domain::Tenant;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::item_store::{get_as, query_as, to_item};
use crate::{ItemStore, RangeQuery, keys};

#[derive(Debug, Serialize, Deserialize)]
struct ChildRef {
    id: TenantId,
}

/// Application service for the tenant hierarchy.
#[derive(Clone)]
pub struct TenancyService {
    store: Arc<dyn ItemStore>,
}

impl TenancyService {
    /// Creates a tenancy service.
    #[must_use]
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Returns the root tenant, creating it on first start.
    pub async fn install_root(&self, name: &str) -> AppResult<Tenant> {
        if let Some(root) = self.find_tenant(&TenantId::root()).await? {
            return Ok(root);
        }

        let root = Tenant::root(NonEmptyString::new(name)?);
        self.store
            .insert(to_item(keys::tenant(root.id()), keys::RECORD, &root)?)
            .await?;
        info!(tenant_id = %root.id(), "installed root tenant");
        Ok(root)
    }

    /// Persists a new child tenant and indexes it under its parent.
    pub async fn create_tenant(&self, tenant: Tenant) -> AppResult<Tenant> {
        let parent = tenant.parent().cloned().ok_or_else(|| {
            AppError::Validation(format!("tenant '{}' has no parent", tenant.id()))
        })?;
        self.get_tenant_by_id(&parent).await?;

        self.store
            .insert(to_item(keys::tenant(tenant.id()), keys::RECORD, &tenant)?)
            .await
            .map_err(|error| match error {
                AppError::Conflict(_) => {
                    AppError::Conflict(format!("tenant '{}' already exists", tenant.id()))
                }
                other => other,
            })?;
        self.store
            .put(to_item(
                keys::tenant_children(&parent),
                tenant.id().as_str(),
                &ChildRef {
                    id: tenant.id().clone(),
                },
            )?)
            .await?;

        Ok(tenant)
    }

    /// Returns a tenant, if it exists.
    pub async fn find_tenant(&self, tenant_id: &TenantId) -> AppResult<Option<Tenant>> {
        get_as(self.store.as_ref(), &keys::tenant(tenant_id), keys::RECORD).await
    }

    /// Returns a tenant or fails with not found.
    pub async fn get_tenant_by_id(&self, tenant_id: &TenantId) -> AppResult<Tenant> {
        self.find_tenant(tenant_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tenant \"{tenant_id}\" not found.")))
    }

    /// Lists the direct children of `parent`.
    pub async fn list_tenants(&self, parent: &TenantId) -> AppResult<Vec<Tenant>> {
        let children: Vec<ChildRef> = query_as(
            self.store.as_ref(),
            &keys::tenant_children(parent),
            RangeQuery::default(),
        )
        .await?;

        let mut tenants = Vec::with_capacity(children.len());
        for child in children {
            if let Some(tenant) = self.find_tenant(&child.id).await? {
                tenants.push(tenant);
            }
        }

        Ok(tenants)
    }

    /// Renames a tenant.
    pub async fn update_tenant(&self, tenant_id: &TenantId, name: &str) -> AppResult<Tenant> {
        let mut tenant = self.get_tenant_by_id(tenant_id).await?;
        tenant.rename(name)?;
        self.store
            .put(to_item(keys::tenant(tenant.id()), keys::RECORD, &tenant)?)
            .await?;
        Ok(tenant)
    }
}
