use std::sync::Arc;

use marquee_application::{CreateAdminUserInput, RequestContext};
use marquee_core::{AppResult, SecurityIdentity, TenantId};
use marquee_infrastructure::{Argon2PasswordHasher, InMemoryItemStore};

use crate::api_services::build_app_services;
use crate::graphql::{MarqueeSchema, build_schema};
use crate::state::{AppServices, AppState};

pub const ROOT_ADMIN_EMAIL: &str = "root@example.com";
pub const ROOT_ADMIN_PASSWORD: &str = "correct horse battery";

/// Services over a fresh in-memory store with the root tenant and root admin installed.
pub async fn installed_services() -> AppResult<AppServices> {
    let services = build_app_services(
        Arc::new(InMemoryItemStore::new()),
        Arc::new(Argon2PasswordHasher::new()),
        "0.1.0-test",
    );
    services
        .provisioning
        .install_root(
            "Root",
            "/files/",
            Some(CreateAdminUserInput {
                email: ROOT_ADMIN_EMAIL.to_owned(),
                first_name: "Root".to_owned(),
                last_name: "Admin".to_owned(),
                password: ROOT_ADMIN_PASSWORD.to_owned(),
            }),
        )
        .await?;
    Ok(services)
}

pub async fn installed_state() -> AppResult<AppState> {
    let services = installed_services().await?;
    Ok(AppState {
        schema: build_schema(services.clone()),
        services,
        debug: false,
    })
}

pub fn schema_for(services: &AppServices) -> MarqueeSchema {
    build_schema(services.clone())
}

pub async fn root_admin(services: &AppServices) -> AppResult<SecurityIdentity> {
    let issued = services
        .security
        .login(ROOT_ADMIN_EMAIL, ROOT_ADMIN_PASSWORD)
        .await?;
    Ok(issued.identity)
}

pub async fn context_in(
    services: &AppServices,
    tenant_id: &str,
    identity: Option<SecurityIdentity>,
) -> AppResult<RequestContext> {
    services
        .authorization
        .build_context(&TenantId::new(tenant_id)?, identity)
        .await
}
