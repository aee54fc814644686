use std::sync::Arc;

use marquee_core::{AppError, AppResult, IdentityType, SecurityIdentity, TenantId};
use marquee_domain::{Group, Permission, Tenant, TenantKind, TenantLink};

use crate::test_support::{FakeItemStore, FakePasswordHasher, full_access_context, root_tenant};
use crate::{CreateAdminUserInput, CreateApiKeyInput, SecurityService, TenancyService};

use super::{AuthorizationService, resolve_hierarchical_permissions};

fn agency() -> AppResult<Tenant> {
    Tenant::child(
        TenantId::new("agency-1")?,
        "Agency",
        TenantId::root(),
        TenantKind::Agency,
    )
}

fn brand_of(parent: &str) -> AppResult<Tenant> {
    Tenant::child(
        TenantId::new("brand-1")?,
        "Brand",
        TenantId::new(parent)?,
        TenantKind::Brand,
    )
}

fn link(tenant: &str, permissions: Vec<Permission>) -> AppResult<TenantLink> {
    let group = Group::new(TenantId::new(tenant)?, "custom", "Custom", "", false, permissions)?;
    Ok(TenantLink::new("ada@example.com", tenant, &group))
}

#[test]
fn root_link_grants_wildcard_everywhere() -> AppResult<()> {
    let links = vec![link("root", vec![Permission::wildcard()])?];

    assert_eq!(
        resolve_hierarchical_permissions(&agency()?, &links),
        vec![Permission::wildcard()]
    );
    assert_eq!(
        resolve_hierarchical_permissions(&brand_of("agency-1")?, &links),
        vec![Permission::wildcard()]
    );
    Ok(())
}

#[test]
fn agency_link_grants_wildcard_on_its_brands_only() -> AppResult<()> {
    let links = vec![link("agency-1", vec![Permission::wildcard()])?];

    assert_eq!(
        resolve_hierarchical_permissions(&brand_of("agency-1")?, &links),
        vec![Permission::wildcard()]
    );
    assert!(resolve_hierarchical_permissions(&brand_of("agency-2")?, &links).is_empty());
    Ok(())
}

#[test]
fn exact_link_is_authoritative_even_when_empty() -> AppResult<()> {
    let links = vec![
        link("root", vec![Permission::wildcard()])?,
        link("agency-1", Vec::new())?,
    ];

    assert!(resolve_hierarchical_permissions(&agency()?, &links).is_empty());
    Ok(())
}

#[test]
fn unrelated_identity_gets_nothing() -> AppResult<()> {
    let links = vec![link("agency-2", vec![Permission::wildcard()])?];
    assert!(resolve_hierarchical_permissions(&agency()?, &links).is_empty());
    Ok(())
}

struct Fixture {
    tenancy: TenancyService,
    security: SecurityService,
    authorization: AuthorizationService,
}

async fn fixture() -> AppResult<Fixture> {
    let store = FakeItemStore::shared();
    let tenancy = TenancyService::new(store.clone());
    let security = SecurityService::new(store, Arc::new(FakePasswordHasher));
    let authorization =
        AuthorizationService::with_default_plugins(tenancy.clone(), security.clone());

    tenancy.install_root("Root").await?;
    tenancy.create_tenant(agency()?).await?;
    security.ensure_default_groups(&TenantId::root()).await?;
    Ok(Fixture {
        tenancy,
        security,
        authorization,
    })
}

#[tokio::test]
async fn linked_admin_gets_group_permissions() -> AppResult<()> {
    let fixture = fixture().await?;
    let root = root_tenant()?;
    let groups = fixture.security.ensure_default_groups(root.id()).await?;
    let user = fixture
        .security
        .create_user(CreateAdminUserInput {
            email: "ada@example.com".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            password: "analytical engine".to_owned(),
        })
        .await?;
    fixture
        .security
        .link_user_to_tenant(&user, &root, &groups.full_access)
        .await?;
    let identity = SecurityIdentity::new("ada@example.com", IdentityType::Admin, "Ada Lovelace");

    let context = fixture
        .authorization
        .build_context(&TenantId::new("agency-1")?, Some(identity))
        .await?;

    assert!(context.has_permission("agencies.agency"));
    assert_eq!(context.tenant().kind(), TenantKind::Agency);
    Ok(())
}

#[tokio::test]
async fn admin_without_user_record_is_an_error() -> AppResult<()> {
    let fixture = fixture().await?;
    let identity = SecurityIdentity::new("ghost@example.com", IdentityType::Admin, "Ghost");

    let result = fixture
        .authorization
        .build_context(&TenantId::root(), Some(identity))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn api_key_permissions_apply_only_in_its_tenant() -> AppResult<()> {
    let fixture = fixture().await?;
    let root = fixture.tenancy.get_tenant_by_id(&TenantId::root()).await?;
    let root_context = full_access_context(root, None);
    let (_, issued) = fixture
        .security
        .create_api_key(
            &root_context,
            CreateApiKeyInput {
                name: "Importer".to_owned(),
                description: String::new(),
                permissions: vec!["products.*".to_owned()],
            },
        )
        .await?;

    let in_root = fixture
        .authorization
        .build_context(&TenantId::root(), Some(issued.identity.clone()))
        .await?;
    let in_agency = fixture
        .authorization
        .build_context(&TenantId::new("agency-1")?, Some(issued.identity))
        .await?;

    assert!(in_root.has_permission("products.product"));
    assert!(!in_root.has_permission("agencies.agency"));
    assert!(in_agency.permissions().is_empty());
    Ok(())
}

#[tokio::test]
async fn customers_get_wildcard_and_anonymous_gets_group_rules() -> AppResult<()> {
    let fixture = fixture().await?;
    let customer = SecurityIdentity::new("c-1", IdentityType::Customer, "Grace Hopper");

    let customer_context = fixture
        .authorization
        .build_context(&TenantId::root(), Some(customer))
        .await?;
    let anonymous_context = fixture
        .authorization
        .build_context(&TenantId::root(), None)
        .await?;

    assert_eq!(customer_context.permissions(), &[Permission::wildcard()]);
    assert!(anonymous_context.permissions().is_empty());
    Ok(())
}

#[tokio::test]
async fn unknown_tenant_is_unauthorized() -> AppResult<()> {
    let fixture = fixture().await?;
    let result = fixture
        .authorization
        .build_context(&TenantId::new("nowhere")?, None)
        .await;
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
    Ok(())
}
