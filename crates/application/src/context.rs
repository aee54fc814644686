use marquee_core::{AppError, AppResult, SecurityIdentity};
use marquee_domain::{Permission, Tenant, permissions_grant};

/// Per-request tenant, identity, and resolved permissions.
///
/// Built once per request by the authorization pipeline and passed explicitly
/// to every operation. Switching tenants produces a new context instead of
/// mutating shared state.
#[derive(Debug, Clone)]
pub struct RequestContext {
    tenant: Tenant,
    identity: Option<SecurityIdentity>,
    permissions: Vec<Permission>,
}

impl RequestContext {
    /// Creates a request context.
    #[must_use]
    pub fn new(
        tenant: Tenant,
        identity: Option<SecurityIdentity>,
        permissions: Vec<Permission>,
    ) -> Self {
        Self {
            tenant,
            identity,
            permissions,
        }
    }

    /// Returns the current tenant.
    #[must_use]
    pub fn tenant(&self) -> &Tenant {
        &self.tenant
    }

    /// Returns the authenticated identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&SecurityIdentity> {
        self.identity.as_ref()
    }

    /// Returns the permissions resolved for the identity in the current tenant.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Returns whether the context holds `permission`.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        permissions_grant(&self.permissions, permission)
    }

    /// Ensures the context holds `permission`.
    pub fn require_permission(&self, permission: &str) -> AppResult<()> {
        if self.has_permission(permission) {
            return Ok(());
        }

        Err(AppError::Forbidden(format!(
            "missing permission '{permission}' in tenant '{}'",
            self.tenant.id()
        )))
    }

    /// Returns the identity or fails when the request is anonymous.
    pub fn require_identity(&self) -> AppResult<&SecurityIdentity> {
        self.identity
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("request is not authenticated".to_owned()))
    }

    /// Returns a context for `tenant` that keeps the identity and permissions.
    #[must_use]
    pub fn scoped_to(&self, tenant: Tenant) -> Self {
        Self {
            tenant,
            identity: self.identity.clone(),
            permissions: self.permissions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use marquee_core::{AppError, AppResult, NonEmptyString};
    use marquee_domain::{Permission, Tenant};

    use super::RequestContext;

    #[test]
    fn missing_permission_is_forbidden() -> AppResult<()> {
        let root = Tenant::root(NonEmptyString::new("Root")?);
        let context = RequestContext::new(root, None, vec![Permission::new("products.*")?]);

        assert!(context.require_permission("products.product").is_ok());
        assert!(matches!(
            context.require_permission("agencies.agency"),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            context.require_identity(),
            Err(AppError::Unauthorized(_))
        ));
        Ok(())
    }
}
