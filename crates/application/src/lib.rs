//! Application services and ports.

#![forbid(unsafe_code)]

mod access_service;
mod authorization_service;
mod context;
mod entry_service;
mod item_store;
mod keys;
mod provisioning_service;
mod security_service;
mod storefront_service;
mod tenancy_service;
mod tenant_apps_service;
mod tenant_entry_service;

#[cfg(test)]
mod test_support;

pub use access_service::{AccessService, TenantAccess};
pub use authorization_service::{
    AdminUserAuthorization, AnonymousAuthorization, ApiKeyAuthorization, AuthorizationPlugin,
    AuthorizationService, CustomerAuthorization, resolve_hierarchical_permissions,
};
pub use context::RequestContext;
pub use entry_service::{EntryInput, EntryService};
pub use item_store::{ItemStore, RangeQuery, StoredItem};
pub use provisioning_service::{
    AdminUserOutcome, ProvisioningReport, ProvisioningService, TenantRequest,
};
pub use security_service::{
    CreateAdminUserInput, CreateApiKeyInput, CreateGroupInput, CustomerSignUpInput,
    DEFAULT_TOKEN_TTL_HOURS, DefaultGroups, IssuedToken, PasswordHasher, SecurityService,
};
pub use storefront_service::{PUBLIC_PRODUCTS_LIMIT, PublicProduct, StorefrontService};
pub use tenancy_service::TenancyService;
pub use tenant_apps_service::{
    DEFAULT_LOCALE, DEFAULT_UPLOAD_MAX_FILE_SIZE, FileManagerSettings, Locale, TenantAppsService,
};
pub use tenant_entry_service::{ProvisionedEntry, TenantEntryService};
