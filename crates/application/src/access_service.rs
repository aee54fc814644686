use marquee_core::{AppResult, IdentityType, SecurityIdentity, TenantId};
use marquee_domain::{EntryKind, ListRequest, MAX_PAGE_LIMIT, Permission, TenantKind};

use crate::{EntryService, SecurityService, TenancyService};

/// Tenant the identity may switch to in the admin console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantAccess {
    /// Tenant id.
    pub id: TenantId,
    /// Tenant display name.
    pub name: String,
    /// Tenant level.
    pub kind: TenantKind,
    /// Permissions the identity holds there.
    pub permissions: Vec<Permission>,
}

/// Projects an identity's tenant links into the tenants it can reach.
#[derive(Clone)]
pub struct AccessService {
    security: SecurityService,
    tenancy: TenancyService,
    entries: EntryService,
}

impl AccessService {
    /// Creates the service.
    #[must_use]
    pub fn new(security: SecurityService, tenancy: TenancyService, entries: EntryService) -> Self {
        Self {
            security,
            tenancy,
            entries,
        }
    }

    /// Lists the tenants reachable by an admin identity.
    ///
    /// Root links expand to every agency; agency links expand to their
    /// brands. Other identity types reach no tenant through links.
    pub async fn identity_access(&self, identity: &SecurityIdentity) -> AppResult<Vec<TenantAccess>> {
        if identity.identity_type() != IdentityType::Admin {
            return Ok(Vec::new());
        }

        let links = self.security.list_user_links(identity.id()).await?;
        let mut access = Vec::with_capacity(links.len());
        for link in &links {
            if let Some(tenant) = self.tenancy.find_tenant(link.tenant_id()).await? {
                access.push(TenantAccess {
                    id: tenant.id().clone(),
                    name: tenant.name().to_owned(),
                    kind: tenant.kind(),
                    permissions: link.permissions().to_vec(),
                });
            }
        }

        let mut derived = Vec::new();
        if links.iter().any(|link| link.tenant_id().is_root()) {
            let agencies = self
                .entries
                .list_in_tenant(
                    &TenantId::root(),
                    EntryKind::Agency,
                    &ListRequest::first(MAX_PAGE_LIMIT)?,
                )
                .await?;
            for agency in agencies.data {
                derived.push(TenantAccess {
                    id: TenantId::new(agency.id().as_str())?,
                    name: agency.title().to_owned(),
                    kind: TenantKind::Agency,
                    permissions: vec![Permission::wildcard()],
                });
            }
        } else {
            let agency_ids = access
                .iter()
                .filter(|row| row.kind == TenantKind::Agency)
                .map(|row| row.id.clone())
                .collect::<Vec<_>>();
            for agency_id in agency_ids {
                for brand in self.tenancy.list_tenants(&agency_id).await? {
                    derived.push(TenantAccess {
                        id: brand.id().clone(),
                        name: brand.name().to_owned(),
                        kind: TenantKind::Brand,
                        permissions: vec![Permission::wildcard()],
                    });
                }
            }
        }

        for row in derived {
            if !access.iter().any(|existing| existing.id == row.id) {
                access.push(row);
            }
        }

        Ok(access)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use marquee_core::{AppResult, IdentityType, SecurityIdentity, TenantId};
    use marquee_domain::{EntryKind, Permission, Tenant, TenantKind};

    use crate::test_support::{FakeItemStore, FakePasswordHasher, full_access_context};
    use crate::{
        CreateAdminUserInput, EntryInput, EntryService, SecurityService, TenancyService,
    };

    use super::AccessService;

    struct Fixture {
        tenancy: TenancyService,
        security: SecurityService,
        entries: EntryService,
        access: AccessService,
    }

    async fn fixture() -> AppResult<Fixture> {
        let store = FakeItemStore::shared();
        let tenancy = TenancyService::new(store.clone());
        let security = SecurityService::new(store.clone(), Arc::new(FakePasswordHasher));
        let entries = EntryService::new(store, "0.1.0");
        let access = AccessService::new(security.clone(), tenancy.clone(), entries.clone());
        tenancy.install_root("Root").await?;
        Ok(Fixture {
            tenancy,
            security,
            entries,
            access,
        })
    }

    async fn link_admin(fixture: &Fixture, tenant: &Tenant) -> AppResult<SecurityIdentity> {
        let groups = fixture.security.ensure_default_groups(tenant.id()).await?;
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
            .link_user_to_tenant(&user, tenant, &groups.full_access)
            .await?;
        Ok(SecurityIdentity::new(
            "ada@example.com",
            IdentityType::Admin,
            "Ada Lovelace",
        ))
    }

    #[tokio::test]
    async fn root_admin_reaches_every_agency() -> AppResult<()> {
        let fixture = fixture().await?;
        let root = fixture.tenancy.get_tenant_by_id(&TenantId::root()).await?;
        let context = full_access_context(root.clone(), None);
        for title in ["Agency 0", "Agency 1"] {
            fixture
                .entries
                .create(
                    &context,
                    EntryKind::Agency,
                    EntryInput {
                        title: title.to_owned(),
                        description: None,
                    },
                )
                .await?;
        }
        let identity = link_admin(&fixture, &root).await?;

        let access = fixture.access.identity_access(&identity).await?;

        let rows: Vec<(&str, TenantKind)> = access
            .iter()
            .map(|row| (row.name.as_str(), row.kind))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Root", TenantKind::System),
                ("Agency 1", TenantKind::Agency),
                ("Agency 0", TenantKind::Agency),
            ]
        );
        assert!(access.iter().all(|row| row.permissions == [Permission::wildcard()]));
        Ok(())
    }

    #[tokio::test]
    async fn agency_admin_reaches_its_brands() -> AppResult<()> {
        let fixture = fixture().await?;
        let agency = fixture
            .tenancy
            .create_tenant(Tenant::child(
                TenantId::new("agency-1")?,
                "Agency",
                TenantId::root(),
                TenantKind::Agency,
            )?)
            .await?;
        fixture
            .tenancy
            .create_tenant(Tenant::child(
                TenantId::new("brand-1")?,
                "Brand",
                agency.id().clone(),
                TenantKind::Brand,
            )?)
            .await?;
        let identity = link_admin(&fixture, &agency).await?;

        let access = fixture.access.identity_access(&identity).await?;

        let ids: Vec<&str> = access.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, vec!["agency-1", "brand-1"]);
        Ok(())
    }

    #[tokio::test]
    async fn customers_have_no_linked_access() -> AppResult<()> {
        let fixture = fixture().await?;
        let identity = SecurityIdentity::new("c-1", IdentityType::Customer, "Grace");
        assert!(fixture.access.identity_access(&identity).await?.is_empty());
        Ok(())
    }
}
