use marquee_core::{AppError, AppResult, TenantId};
use marquee_domain::{Entry, EntryKind, EntryPatch, TenantKind};
use tracing::warn;

use crate::{
    CreateAdminUserInput, EntryInput, EntryService, ProvisioningReport, ProvisioningService,
    RequestContext, TenancyService, TenantRequest,
};

/// Agency or brand entry together with the tenant provisioned for it.
#[derive(Debug, Clone)]
pub struct ProvisionedEntry {
    /// The stored entry.
    pub entry: Entry,
    /// Provisioning outcome of the entry's tenant.
    pub report: ProvisioningReport,
}

/// Agencies and brands: entries that own a tenant of the same id.
#[derive(Clone)]
pub struct TenantEntryService {
    entries: EntryService,
    tenancy: TenancyService,
    provisioning: ProvisioningService,
}

impl TenantEntryService {
    /// Creates the service.
    #[must_use]
    pub fn new(
        entries: EntryService,
        tenancy: TenancyService,
        provisioning: ProvisioningService,
    ) -> Self {
        Self {
            entries,
            tenancy,
            provisioning,
        }
    }

    /// Stores the entry, then provisions its tenant and admin user.
    pub async fn create(
        &self,
        context: &RequestContext,
        kind: EntryKind,
        input: EntryInput,
        admin: CreateAdminUserInput,
    ) -> AppResult<ProvisionedEntry> {
        let tenant_kind = tenant_kind(kind)?;
        let entry = self.entries.create(context, kind, input).await?;

        let report = self
            .provisioning
            .provision_tenant(
                context,
                TenantRequest {
                    id: TenantId::new(entry.id().as_str())?,
                    name: entry.title().to_owned(),
                    kind: tenant_kind,
                },
                admin,
            )
            .await?;

        Ok(ProvisionedEntry { entry, report })
    }

    /// Updates the entry and renames its tenant to the new title.
    pub async fn update(
        &self,
        context: &RequestContext,
        kind: EntryKind,
        id: &str,
        patch: EntryPatch,
    ) -> AppResult<Entry> {
        tenant_kind(kind)?;
        let entry = self.entries.update(context, kind, id, patch).await?;

        let tenant_id = TenantId::new(entry.id().as_str())?;
        if self.tenancy.find_tenant(&tenant_id).await?.is_some() {
            self.tenancy.update_tenant(&tenant_id, entry.title()).await?;
        } else {
            warn!(tenant_id = %tenant_id, entry_id = %entry.id(), "entry has no tenant to rename");
        }

        Ok(entry)
    }
}

fn tenant_kind(kind: EntryKind) -> AppResult<TenantKind> {
    match kind {
        EntryKind::Agency => Ok(TenantKind::Agency),
        EntryKind::Brand => Ok(TenantKind::Brand),
        EntryKind::Product => Err(AppError::Validation(
            "products do not own a tenant".to_owned(),
        )),
    }
}
