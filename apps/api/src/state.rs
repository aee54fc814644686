use marquee_application::{
    AccessService, AuthorizationService, EntryService, ProvisioningService, SecurityService,
    StorefrontService, TenancyService, TenantEntryService,
};

use crate::graphql::MarqueeSchema;

/// Application services shared by the middleware and the GraphQL resolvers.
#[derive(Clone)]
pub struct AppServices {
    pub entries: EntryService,
    pub tenant_entries: TenantEntryService,
    #[cfg_attr(not(test), allow(dead_code))]
    pub tenancy: TenancyService,
    pub security: SecurityService,
    pub authorization: AuthorizationService,
    pub access: AccessService,
    pub storefront: StorefrontService,
    pub provisioning: ProvisioningService,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub services: AppServices,
    pub schema: MarqueeSchema,
    pub debug: bool,
}
