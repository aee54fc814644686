use std::sync::Arc;

use chrono::{DateTime, Utc};
use marquee_core::{AppError, AppResult, TenantId};
use serde::{Deserialize, Serialize};

use crate::item_store::{get_as, query_as, to_item};
use crate::{ItemStore, RangeQuery, keys};

/// Locale installed in every new tenant.
pub const DEFAULT_LOCALE: &str = "en-US";

/// Default largest accepted upload, in bytes.
pub const DEFAULT_UPLOAD_MAX_FILE_SIZE: u64 = 26_214_401;

const FILE_MANAGER_SORT_KEY: &str = "SETTINGS";

/// Locale installed in a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    /// BCP 47 code.
    pub code: String,
    /// Whether this is the tenant's default locale.
    pub default: bool,
    /// Installation timestamp.
    pub created_on: DateTime<Utc>,
}

/// File manager settings of a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileManagerSettings {
    /// Prefix prepended to file keys when serving files.
    pub src_prefix: String,
    /// Smallest accepted upload, in bytes.
    pub upload_min_file_size: u64,
    /// Largest accepted upload, in bytes.
    pub upload_max_file_size: u64,
}

impl FileManagerSettings {
    /// Creates settings with the default upload bounds.
    #[must_use]
    pub fn with_src_prefix(src_prefix: impl Into<String>) -> Self {
        Self {
            src_prefix: src_prefix.into(),
            upload_min_file_size: 0,
            upload_max_file_size: DEFAULT_UPLOAD_MAX_FILE_SIZE,
        }
    }
}

/// Installs the per-tenant apps a new tenant needs: i18n and file manager.
#[derive(Clone)]
pub struct TenantAppsService {
    store: Arc<dyn ItemStore>,
}

impl TenantAppsService {
    /// Creates the service.
    #[must_use]
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Installs `code` as the default locale of a tenant.
    pub async fn install_locale(&self, tenant_id: &TenantId, code: &str) -> AppResult<Locale> {
        if code.trim().is_empty() {
            return Err(AppError::Validation("locale code must not be empty".to_owned()));
        }

        let sort_key = format!("L#{code}");
        let existing: Option<Locale> =
            get_as(self.store.as_ref(), &keys::locales(tenant_id), &sort_key).await?;
        if let Some(existing) = existing {
            return Ok(existing);
        }

        let locale = Locale {
            code: code.to_owned(),
            default: true,
            created_on: Utc::now(),
        };
        self.store
            .put(to_item(keys::locales(tenant_id), sort_key, &locale)?)
            .await?;
        Ok(locale)
    }

    /// Lists the locales of a tenant.
    pub async fn list_locales(&self, tenant_id: &TenantId) -> AppResult<Vec<Locale>> {
        query_as(
            self.store.as_ref(),
            &keys::locales(tenant_id),
            RangeQuery::prefixed("L#"),
        )
        .await
    }

    /// Stores the file manager settings of a tenant.
    pub async fn install_file_manager(
        &self,
        tenant_id: &TenantId,
        settings: &FileManagerSettings,
    ) -> AppResult<()> {
        self.store
            .put(to_item(
                keys::file_manager(tenant_id),
                FILE_MANAGER_SORT_KEY,
                settings,
            )?)
            .await
    }

    /// Returns the file manager settings of a tenant, if installed.
    pub async fn file_manager_settings(
        &self,
        tenant_id: &TenantId,
    ) -> AppResult<Option<FileManagerSettings>> {
        get_as(
            self.store.as_ref(),
            &keys::file_manager(tenant_id),
            FILE_MANAGER_SORT_KEY,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use marquee_core::{AppResult, TenantId};

    use crate::test_support::FakeItemStore;

    use super::{DEFAULT_LOCALE, FileManagerSettings, TenantAppsService};

    #[tokio::test]
    async fn locale_install_is_idempotent() -> AppResult<()> {
        let service = TenantAppsService::new(FakeItemStore::shared());
        let tenant_id = TenantId::new("brand-1")?;

        let first = service.install_locale(&tenant_id, DEFAULT_LOCALE).await?;
        let second = service.install_locale(&tenant_id, DEFAULT_LOCALE).await?;

        assert_eq!(first, second);
        assert_eq!(service.list_locales(&tenant_id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn file_manager_settings_are_tenant_scoped() -> AppResult<()> {
        let service = TenantAppsService::new(FakeItemStore::shared());
        let settings = FileManagerSettings::with_src_prefix("https://cdn.example.com/files/");

        service
            .install_file_manager(&TenantId::root(), &settings)
            .await?;

        assert_eq!(
            service.file_manager_settings(&TenantId::root()).await?,
            Some(settings)
        );
        assert!(
            service
                .file_manager_settings(&TenantId::new("agency-1")?)
                .await?
                .is_none()
        );
        Ok(())
    }
}
