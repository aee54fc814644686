use chrono::{DateTime, Utc};
use marquee_core::{AppError, AppResult, NonEmptyString, TenantId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the permission that matches every action.
pub const WILDCARD_PERMISSION: &str = "*";

/// Slug of the default group granting every permission.
pub const FULL_ACCESS_GROUP_SLUG: &str = "full-access";

/// Slug of the default group used for unauthenticated requests.
pub const ANONYMOUS_GROUP_SLUG: &str = "anonymous";

/// Named permission rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Permission {
    name: String,
}

impl Permission {
    /// Creates a permission rule.
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = NonEmptyString::new(name)
            .map_err(|_| AppError::Validation("permission name must not be empty".to_owned()))?;
        Ok(Self { name: name.into() })
    }

    /// Returns the single rule that matches every action.
    #[must_use]
    pub fn wildcard() -> Self {
        Self {
            name: WILDCARD_PERMISSION.to_owned(),
        }
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns whether this rule grants `required`.
    ///
    /// `*` matches everything, `prefix.*` matches names under `prefix.`.
    #[must_use]
    pub fn grants(&self, required: &str) -> bool {
        if self.name == WILDCARD_PERMISSION || self.name == required {
            return true;
        }

        self.name
            .strip_suffix('*')
            .is_some_and(|prefix| prefix.ends_with('.') && required.starts_with(prefix))
    }
}

/// Returns whether any rule in `permissions` grants `required`.
#[must_use]
pub fn permissions_grant(permissions: &[Permission], required: &str) -> bool {
    permissions.iter().any(|permission| permission.grants(required))
}

/// Tenant-scoped permission group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    tenant_id: TenantId,
    slug: NonEmptyString,
    name: NonEmptyString,
    description: String,
    system: bool,
    permissions: Vec<Permission>,
    created_on: DateTime<Utc>,
}

impl Group {
    /// Creates a group definition.
    pub fn new(
        tenant_id: TenantId,
        slug: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        system: bool,
        permissions: Vec<Permission>,
    ) -> AppResult<Self> {
        Ok(Self {
            tenant_id,
            slug: NonEmptyString::new(slug)?,
            name: NonEmptyString::new(name)?,
            description: description.into(),
            system,
            permissions,
            created_on: Utc::now(),
        })
    }

    /// Builds the default full-access group for a tenant.
    pub fn full_access(tenant_id: TenantId) -> AppResult<Self> {
        Self::new(
            tenant_id,
            FULL_ACCESS_GROUP_SLUG,
            "Full Access",
            "Grants full access to all apps.",
            true,
            vec![Permission::wildcard()],
        )
    }

    /// Builds the default anonymous group for a tenant.
    pub fn anonymous(tenant_id: TenantId) -> AppResult<Self> {
        Self::new(
            tenant_id,
            ANONYMOUS_GROUP_SLUG,
            "Anonymous",
            "Permissions for anonymous users (public access).",
            true,
            Vec::new(),
        )
    }

    /// Returns the owning tenant.
    #[must_use]
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns the slug.
    #[must_use]
    pub fn slug(&self) -> &str {
        self.slug.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns whether the group is managed by the system.
    #[must_use]
    pub fn system(&self) -> bool {
        self.system
    }

    /// Returns the permission rules.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

/// Tenant API key. The secret itself is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    id: String,
    tenant_id: TenantId,
    name: NonEmptyString,
    description: String,
    permissions: Vec<Permission>,
    created_on: DateTime<Utc>,
}

impl ApiKey {
    /// Creates an API key definition.
    pub fn new(
        tenant_id: TenantId,
        name: impl Into<String>,
        description: impl Into<String>,
        permissions: Vec<Permission>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: Uuid::new_v4().as_simple().to_string(),
            tenant_id,
            name: NonEmptyString::new(name)?,
            description: description.into(),
            permissions,
            created_on: Utc::now(),
        })
    }

    /// Returns the key id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the tenant the key is valid for.
    #[must_use]
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns the key name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Returns the permissions granted to the key.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }
}
