use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use marquee_core::{AppError, AppResult, NonEmptyString, SecurityIdentity, TenantId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Business entity types stored under a tenant partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Agency entry; creating one provisions an agency tenant.
    Agency,
    /// Brand entry; creating one provisions a brand tenant.
    Brand,
    /// Product entry.
    Product,
}

impl EntryKind {
    /// Returns the key base and type name used in partition keys and errors.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Agency => "Agency",
            Self::Brand => "Brand",
            Self::Product => "Product",
        }
    }

    /// Returns the permission name guarding operations on this kind.
    #[must_use]
    pub fn permission_name(&self) -> &'static str {
        match self {
            Self::Agency => "agencies.agency",
            Self::Brand => "brands.brand",
            Self::Product => "products.product",
        }
    }

    /// Builds the tenant-scoped partition key for this kind.
    #[must_use]
    pub fn partition_key(&self, tenant_id: &TenantId) -> String {
        format!("T#{tenant_id}#{}", self.as_str())
    }
}

impl Display for EntryKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Sortable, time-ordered entry identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generates a new identifier whose lexicographic order follows creation order.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().as_simple().to_string())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for EntryId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = NonEmptyString::new(value)
            .map_err(|_| AppError::Validation("entry id must not be empty".to_owned()))?;
        Ok(Self(value.into()))
    }
}

impl Display for EntryId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Denormalized snapshot of the identity that created an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBy {
    /// Identity id.
    pub id: String,
    /// Identity type transport value.
    #[serde(rename = "type")]
    pub identity_type: String,
    /// Display name at creation time.
    pub display_name: String,
}

impl From<&SecurityIdentity> for CreatedBy {
    fn from(identity: &SecurityIdentity) -> Self {
        Self {
            id: identity.id().to_owned(),
            identity_type: identity.identity_type().as_str().to_owned(),
            display_name: identity.display_name().to_owned(),
        }
    }
}

/// Partial update applied to an entry with merge semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryPatch {
    /// New title, if changing.
    pub title: Option<String>,
    /// New description, if changing. `Some(None)` clears it.
    pub description: Option<Option<String>>,
}

/// Agency, brand, or product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    kind: EntryKind,
    id: EntryId,
    title: NonEmptyString,
    description: Option<String>,
    created_on: DateTime<Utc>,
    saved_on: DateTime<Utc>,
    created_by: Option<CreatedBy>,
    app_version: Option<String>,
}

impl Entry {
    /// Creates a new entry with a freshly generated id.
    pub fn new(
        kind: EntryKind,
        title: impl Into<String>,
        description: Option<String>,
        created_by: Option<CreatedBy>,
        app_version: Option<String>,
    ) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            kind,
            id: EntryId::generate(),
            title: NonEmptyString::new(title)
                .map_err(|_| AppError::Validation(format!("{kind} title must not be empty")))?,
            description,
            created_on: now,
            saved_on: now,
            created_by,
            app_version,
        })
    }

    /// Applies a partial update; fields absent from the patch stay unchanged.
    pub fn apply(&mut self, patch: EntryPatch) -> AppResult<()> {
        if let Some(title) = patch.title {
            self.title = NonEmptyString::new(title).map_err(|_| {
                AppError::Validation(format!("{} title must not be empty", self.kind))
            })?;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        self.saved_on = Utc::now();
        Ok(())
    }

    /// Returns the entry kind.
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns the entry id.
    #[must_use]
    pub fn id(&self) -> &EntryId {
        &self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }

    /// Returns the last save timestamp.
    #[must_use]
    pub fn saved_on(&self) -> DateTime<Utc> {
        self.saved_on
    }

    /// Returns the creator snapshot.
    #[must_use]
    pub fn created_by(&self) -> Option<&CreatedBy> {
        self.created_by.as_ref()
    }

    /// Returns the application version that wrote the entry.
    #[must_use]
    pub fn app_version(&self) -> Option<&str> {
        self.app_version.as_deref()
    }
}
