//! Permission resolution for a request.
//!
//! Authorization runs a chain of plugins in order. The first plugin that
//! returns `Some(permissions)` decides the permission set of the request;
//! when none does, the request holds no permissions.

use std::sync::Arc;

use async_trait::async_trait;
use marquee_core::{AppError, AppResult, IdentityType, SecurityIdentity, TenantId};
use marquee_domain::{ANONYMOUS_GROUP_SLUG, Permission, Tenant, TenantKind, TenantLink};

use crate::{RequestContext, SecurityService, TenancyService};

#[cfg(test)]
mod tests;

/// One step of the authorization chain.
#[async_trait]
pub trait AuthorizationPlugin: Send + Sync {
    /// Returns the permission set for the identity in `tenant`, or `None` to
    /// defer to the next plugin.
    async fn permissions(
        &self,
        tenant: &Tenant,
        identity: Option<&SecurityIdentity>,
    ) -> AppResult<Option<Vec<Permission>>>;
}

/// Resolves admin permissions from the tenant hierarchy.
///
/// A link to exactly `tenant` is authoritative even when it grants nothing.
/// Otherwise a root link grants everything, and a link to the parent agency
/// of a brand grants everything in that brand.
#[must_use]
pub fn resolve_hierarchical_permissions(tenant: &Tenant, links: &[TenantLink]) -> Vec<Permission> {
    if let Some(link) = links.iter().find(|link| link.tenant_id() == tenant.id()) {
        return link.permissions().to_vec();
    }

    if links.iter().any(|link| link.tenant_id().is_root()) {
        return vec![Permission::wildcard()];
    }

    if tenant.kind() == TenantKind::Brand
        && let Some(parent) = tenant.parent()
        && links.iter().any(|link| link.tenant_id() == parent)
    {
        return vec![Permission::wildcard()];
    }

    Vec::new()
}

/// Grants API keys the permissions stored on the key, inside its own tenant.
pub struct ApiKeyAuthorization {
    security: SecurityService,
}

impl ApiKeyAuthorization {
    /// Creates the plugin.
    #[must_use]
    pub fn new(security: SecurityService) -> Self {
        Self { security }
    }
}

#[async_trait]
impl AuthorizationPlugin for ApiKeyAuthorization {
    async fn permissions(
        &self,
        tenant: &Tenant,
        identity: Option<&SecurityIdentity>,
    ) -> AppResult<Option<Vec<Permission>>> {
        let Some(identity) = identity.filter(|i| i.identity_type() == IdentityType::ApiKey) else {
            return Ok(None);
        };

        let api_key = self.security.find_api_key(tenant.id(), identity.id()).await?;
        Ok(Some(
            api_key
                .map(|api_key| api_key.permissions().to_vec())
                .unwrap_or_default(),
        ))
    }
}

/// Grants admin users permissions through their tenant links.
pub struct AdminUserAuthorization {
    security: SecurityService,
}

impl AdminUserAuthorization {
    /// Creates the plugin.
    #[must_use]
    pub fn new(security: SecurityService) -> Self {
        Self { security }
    }
}

#[async_trait]
impl AuthorizationPlugin for AdminUserAuthorization {
    async fn permissions(
        &self,
        tenant: &Tenant,
        identity: Option<&SecurityIdentity>,
    ) -> AppResult<Option<Vec<Permission>>> {
        let Some(identity) = identity.filter(|i| i.identity_type() == IdentityType::Admin) else {
            return Ok(None);
        };

        if self.security.find_user(identity.id()).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "User \"{}\" was not found!",
                identity.id()
            )));
        }

        let links = self.security.list_user_links(identity.id()).await?;
        Ok(Some(resolve_hierarchical_permissions(tenant, &links)))
    }
}

/// Grants storefront customers everything inside the selected tenant.
pub struct CustomerAuthorization;

#[async_trait]
impl AuthorizationPlugin for CustomerAuthorization {
    async fn permissions(
        &self,
        _tenant: &Tenant,
        identity: Option<&SecurityIdentity>,
    ) -> AppResult<Option<Vec<Permission>>> {
        if identity.is_some_and(|i| i.identity_type() == IdentityType::Customer) {
            return Ok(Some(vec![Permission::wildcard()]));
        }

        Ok(None)
    }
}

/// Applies the tenant's anonymous group to requests without an identity.
pub struct AnonymousAuthorization {
    security: SecurityService,
}

impl AnonymousAuthorization {
    /// Creates the plugin.
    #[must_use]
    pub fn new(security: SecurityService) -> Self {
        Self { security }
    }
}

#[async_trait]
impl AuthorizationPlugin for AnonymousAuthorization {
    async fn permissions(
        &self,
        tenant: &Tenant,
        identity: Option<&SecurityIdentity>,
    ) -> AppResult<Option<Vec<Permission>>> {
        if identity.is_some() {
            return Ok(None);
        }

        let group = self
            .security
            .find_group(tenant.id(), ANONYMOUS_GROUP_SLUG)
            .await?;
        Ok(Some(
            group
                .map(|group| group.permissions().to_vec())
                .unwrap_or_default(),
        ))
    }
}

/// Application service that turns a tenant id and identity into a
/// [`RequestContext`].
#[derive(Clone)]
pub struct AuthorizationService {
    tenancy: TenancyService,
    plugins: Arc<Vec<Arc<dyn AuthorizationPlugin>>>,
}

impl AuthorizationService {
    /// Creates a service evaluating `plugins` in order.
    #[must_use]
    pub fn new(tenancy: TenancyService, plugins: Vec<Arc<dyn AuthorizationPlugin>>) -> Self {
        Self {
            tenancy,
            plugins: Arc::new(plugins),
        }
    }

    /// Creates a service with the standard chain: API keys, admin users,
    /// customers, then anonymous access.
    #[must_use]
    pub fn with_default_plugins(tenancy: TenancyService, security: SecurityService) -> Self {
        Self::new(
            tenancy,
            vec![
                Arc::new(ApiKeyAuthorization::new(security.clone())),
                Arc::new(AdminUserAuthorization::new(security.clone())),
                Arc::new(CustomerAuthorization),
                Arc::new(AnonymousAuthorization::new(security)),
            ],
        )
    }

    /// Returns the permission set of the first plugin that decides.
    pub async fn resolve_permissions(
        &self,
        tenant: &Tenant,
        identity: Option<&SecurityIdentity>,
    ) -> AppResult<Vec<Permission>> {
        for plugin in self.plugins.iter() {
            if let Some(permissions) = plugin.permissions(tenant, identity).await? {
                return Ok(permissions);
            }
        }

        Ok(Vec::new())
    }

    /// Builds the request context for `tenant_id`.
    ///
    /// An unknown tenant is an authentication failure rather than a not-found
    /// error so tenant ids cannot be probed.
    pub async fn build_context(
        &self,
        tenant_id: &TenantId,
        identity: Option<SecurityIdentity>,
    ) -> AppResult<RequestContext> {
        let Some(tenant) = self.tenancy.find_tenant(tenant_id).await? else {
            return Err(AppError::Unauthorized(format!(
                "tenant '{tenant_id}' is not available"
            )));
        };

        let permissions = self.resolve_permissions(&tenant, identity.as_ref()).await?;
        Ok(RequestContext::new(tenant, identity, permissions))
    }
}
