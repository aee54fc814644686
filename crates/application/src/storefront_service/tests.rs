use marquee_core::{AppError, AppResult, IdentityType, SecurityIdentity, TenantId};
use marquee_domain::{EntryKind, Tenant, TenantKind};

use crate::test_support::{FakeItemStore, full_access_context, root_tenant};
use crate::{EntryInput, EntryService, RequestContext, TenancyService};

use super::StorefrontService;

struct Fixture {
    entries: EntryService,
    storefront: StorefrontService,
    brand: Tenant,
}

async fn fixture() -> AppResult<Fixture> {
    let store = FakeItemStore::shared();
    let tenancy = TenancyService::new(store.clone());
    let entries = EntryService::new(store.clone(), "0.1.0");
    let storefront = StorefrontService::new(store, entries.clone(), tenancy.clone());

    tenancy.install_root("Root").await?;
    let brand = tenancy
        .create_tenant(Tenant::child(
            TenantId::new("brand-1")?,
            "Brand",
            TenantId::root(),
            TenantKind::Brand,
        )?)
        .await?;

    Ok(Fixture {
        entries,
        storefront,
        brand,
    })
}

fn customer() -> SecurityIdentity {
    SecurityIdentity::new("c-1", IdentityType::Customer, "Grace Hopper").with_profile(
        "Grace",
        "Hopper",
        Some("grace@example.com".to_owned()),
        None,
    )
}

fn product(title: &str) -> EntryInput {
    EntryInput {
        title: title.to_owned(),
        description: Some(format!("{title} description")),
    }
}

#[tokio::test]
async fn customer_login_creates_profile_once() -> AppResult<()> {
    let fixture = fixture().await?;
    let context = full_access_context(fixture.brand.clone(), Some(customer()));

    let first = fixture.storefront.customer_login(&context).await?;
    let second = fixture.storefront.customer_login(&context).await?;

    assert!(matches!(&first, Some(profile) if profile.first_name == "Grace"));
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn anonymous_customer_login_is_none() -> AppResult<()> {
    let fixture = fixture().await?;
    let context = RequestContext::new(fixture.brand.clone(), None, Vec::new());
    assert!(fixture.storefront.customer_login(&context).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn purchases_flag_public_products() -> AppResult<()> {
    let fixture = fixture().await?;
    let context = full_access_context(fixture.brand.clone(), Some(customer()));
    let course = fixture
        .entries
        .create(&context, EntryKind::Product, product("Course"))
        .await?;
    fixture
        .entries
        .create(&context, EntryKind::Product, product("Book"))
        .await?;

    assert!(
        fixture
            .storefront
            .purchase_product(&context, course.id().as_str())
            .await?
    );

    let listed = fixture.storefront.list_public_products(&context).await?;
    let flags: Vec<(&str, bool)> = listed
        .iter()
        .map(|product| (product.entry.title(), product.purchased()))
        .collect();
    assert_eq!(flags, vec![("Book", false), ("Course", true)]);

    let purchased = fixture.storefront.purchased_products(&context).await?;
    assert_eq!(purchased.len(), 1);
    assert_eq!(purchased[0].product_id, course.id().as_str());
    Ok(())
}

#[tokio::test]
async fn purchasing_requires_customer_and_existing_product() -> AppResult<()> {
    let fixture = fixture().await?;
    let admin = SecurityIdentity::new("ada@example.com", IdentityType::Admin, "Ada");
    let admin_context = full_access_context(fixture.brand.clone(), Some(admin));
    let customer_context = full_access_context(fixture.brand.clone(), Some(customer()));

    let as_admin = fixture.storefront.purchase_product(&admin_context, "p-1").await;
    let missing = fixture
        .storefront
        .purchase_product(&customer_context, "p-1")
        .await;

    assert!(matches!(as_admin, Err(AppError::Forbidden(_))));
    assert!(matches!(missing, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn products_are_copied_from_a_brand() -> AppResult<()> {
    let fixture = fixture().await?;
    let brand_context = full_access_context(fixture.brand.clone(), None);
    let source = fixture
        .entries
        .create(&brand_context, EntryKind::Product, product("Course"))
        .await?;
    let root_context = full_access_context(root_tenant()?, None);

    let copy = fixture
        .storefront
        .purchase_product_from_brand(&root_context, "brand-1", source.id().as_str())
        .await?;
    let unknown_brand = fixture
        .storefront
        .purchase_product_from_brand(&root_context, "brand-9", source.id().as_str())
        .await;
    let unknown_product = fixture
        .storefront
        .purchase_product_from_brand(&root_context, "brand-1", "missing")
        .await;

    assert_ne!(copy.id(), source.id());
    assert_eq!(copy.title(), "Course");
    assert_eq!(copy.description(), Some("Course description"));
    assert!(matches!(unknown_brand, Err(AppError::NotFound(_))));
    assert!(matches!(unknown_product, Err(AppError::NotFound(_))));
    Ok(())
}
