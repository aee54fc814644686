//! Tenant and admin-user provisioning.
//!
//! No transaction spans the workflow. A failure after the tenant record is
//! written leaves the tenant partially installed.

use marquee_core::{AppError, AppResult, TenantId};
use marquee_domain::{AdminUser, Group, Tenant, TenantKind};
use tracing::{info, warn};

use crate::{
    CreateAdminUserInput, DEFAULT_LOCALE, FileManagerSettings, RequestContext, SecurityService,
    TenancyService, TenantAppsService,
};


/// Outcome of the best-effort admin-user step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminUserOutcome {
    /// The admin user was created and linked to the new tenant.
    Created {
        /// Login of the new admin user.
        login: String,
    },
    /// The step failed; the tenant exists without an admin user.
    Failed {
        /// Error message of the failed step.
        reason: String,
    },
}

/// Result of provisioning a tenant.
#[derive(Debug, Clone)]
pub struct ProvisioningReport {
    /// The created tenant.
    pub tenant: Tenant,
    /// Outcome of the admin-user step.
    pub admin_user: AdminUserOutcome,
}

/// New tenant requested by an agency or brand entry.
#[derive(Debug, Clone)]
pub struct TenantRequest {
    /// Tenant id, equal to the entry id.
    pub id: TenantId,
    /// Tenant name, equal to the entry title.
    pub name: String,
    /// Level of the new tenant.
    pub kind: TenantKind,
}

/// Application service that installs tenants.
#[derive(Clone)]
pub struct ProvisioningService {
    tenancy: TenancyService,
    security: SecurityService,
    apps: TenantAppsService,
    app_version: String,
}

impl ProvisioningService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        tenancy: TenancyService,
        security: SecurityService,
        apps: TenantAppsService,
        app_version: impl Into<String>,
    ) -> Self {
        Self {
            tenancy,
            security,
            apps,
            app_version: app_version.into(),
        }
    }

    /// Installs the root tenant and its apps. Safe to run on every start.
    pub async fn install_root(
        &self,
        name: &str,
        src_prefix: &str,
        root_admin: Option<CreateAdminUserInput>,
    ) -> AppResult<Tenant> {
        let root = self.tenancy.install_root(name).await?;
        let groups = self.security.ensure_default_groups(root.id()).await?;
        self.apps.install_locale(root.id(), DEFAULT_LOCALE).await?;
        if self.apps.file_manager_settings(root.id()).await?.is_none() {
            self.apps
                .install_file_manager(root.id(), &FileManagerSettings::with_src_prefix(src_prefix))
                .await?;
        }

        if let Some(admin) = root_admin
            && self.security.find_user(&admin.email).await?.is_none()
        {
            self.create_tenant_admin(&root, &groups.full_access, admin)
                .await?;
        }
        if self.security.version(root.id()).await?.is_none() {
            self.security.set_version(root.id(), &self.app_version).await?;
        }

        Ok(root)
    }

    /// Creates a child tenant of the current tenant and installs it.
    ///
    /// Every step before the admin user is fail-fast. The admin-user step is
    /// best-effort: its failure is logged and reported, never returned.
    pub async fn provision_tenant(
        &self,
        context: &RequestContext,
        request: TenantRequest,
        admin: CreateAdminUserInput,
    ) -> AppResult<ProvisioningReport> {
        let parent = context.tenant();
        let parent_settings = self
            .apps
            .file_manager_settings(parent.id())
            .await?
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "file manager is not installed in tenant '{}'",
                    parent.id()
                ))
            })?;

        let tenant = self
            .tenancy
            .create_tenant(Tenant::child(
                request.id,
                request.name,
                parent.id().clone(),
                request.kind,
            )?)
            .await?;
        info!(
            tenant_id = %tenant.id(),
            parent_id = %parent.id(),
            kind = tenant.kind().as_str(),
            "created tenant"
        );

        let tenant_context = context.scoped_to(tenant.clone());
        let tenant_id = tenant_context.tenant().id();

        let groups = self.security.ensure_default_groups(tenant_id).await?;
        self.apps.install_locale(tenant_id, DEFAULT_LOCALE).await?;
        self.apps
            .install_file_manager(
                tenant_id,
                &FileManagerSettings::with_src_prefix(parent_settings.src_prefix),
            )
            .await?;

        let login = admin.email.clone();
        let admin_user = match self
            .create_tenant_admin(tenant_context.tenant(), &groups.full_access, admin)
            .await
        {
            Ok(user) => AdminUserOutcome::Created {
                login: user.login().as_str().to_owned(),
            },
            Err(error) => {
                warn!(
                    tenant_id = %tenant_id,
                    login = %login,
                    error = %error,
                    "failed to create tenant admin user"
                );
                AdminUserOutcome::Failed {
                    reason: error.to_string(),
                }
            }
        };

        Ok(ProvisioningReport { tenant, admin_user })
    }

    async fn create_tenant_admin(
        &self,
        tenant: &Tenant,
        group: &Group,
        admin: CreateAdminUserInput,
    ) -> AppResult<AdminUser> {
        let user = self.security.create_user(admin).await?;
        self.security.link_user_to_tenant(&user, tenant, group).await?;
        self.security
            .set_version(tenant.id(), &self.app_version)
            .await?;
        Ok(user)
    }
}
