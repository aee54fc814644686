mod storage;

use std::sync::Arc;

use marquee_application::{
    AccessService, AuthorizationService, CreateAdminUserInput, EntryService, ItemStore,
    PasswordHasher, ProvisioningService, SecurityService, StorefrontService, TenancyService,
    TenantAppsService, TenantEntryService,
};
use marquee_core::AppError;
use tracing::info;

use crate::api_config::ApiConfig;
use crate::state::AppServices;

pub use storage::open_item_store;

/// Wires every application service over one item store.
pub fn build_app_services(
    store: Arc<dyn ItemStore>,
    password_hasher: Arc<dyn PasswordHasher>,
    app_version: &str,
) -> AppServices {
    let tenancy = TenancyService::new(store.clone());
    let security = SecurityService::new(store.clone(), password_hasher);
    let apps = TenantAppsService::new(store.clone());
    let entries = EntryService::new(store.clone(), app_version);
    let provisioning =
        ProvisioningService::new(tenancy.clone(), security.clone(), apps, app_version);

    AppServices {
        tenant_entries: TenantEntryService::new(
            entries.clone(),
            tenancy.clone(),
            provisioning.clone(),
        ),
        authorization: AuthorizationService::with_default_plugins(
            tenancy.clone(),
            security.clone(),
        ),
        access: AccessService::new(security.clone(), tenancy.clone(), entries.clone()),
        storefront: StorefrontService::new(store, entries.clone(), tenancy.clone()),
        entries,
        tenancy,
        security,
        provisioning,
    }
}

/// Installs the root tenant and the optional bootstrap admin.
pub async fn install_root(services: &AppServices, config: &ApiConfig) -> Result<(), AppError> {
    let root_admin = config.root_admin.as_ref().map(|admin| CreateAdminUserInput {
        email: admin.email.clone(),
        first_name: "Root".to_owned(),
        last_name: "Admin".to_owned(),
        password: admin.password.clone(),
    });

    let root = services
        .provisioning
        .install_root(
            &config.root_tenant_name,
            &config.file_manager_src_prefix,
            root_admin,
        )
        .await?;
    info!(tenant_id = %root.id(), "root tenant installed");
    Ok(())
}
