use std::str::FromStr;

use chrono::{DateTime, Utc};
use marquee_core::{AppError, AppResult, NonEmptyString, TenantId};
use serde::{Deserialize, Serialize};

/// Level of a tenant in the root → agency → brand hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantKind {
    /// The root tenant.
    System,
    /// A tenant created for an agency entry.
    Agency,
    /// A tenant created for a brand entry.
    Brand,
}

impl TenantKind {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Agency => "agency",
            Self::Brand => "brand",
        }
    }
}

impl FromStr for TenantKind {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "system" => Ok(Self::System),
            "agency" => Ok(Self::Agency),
            "brand" => Ok(Self::Brand),
            _ => Err(AppError::Validation(format!("unknown tenant kind '{value}'"))),
        }
    }
}

/// Isolated partition of data in the tenant hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    id: TenantId,
    name: NonEmptyString,
    description: Option<String>,
    parent: Option<TenantId>,
    kind: TenantKind,
    created_on: DateTime<Utc>,
}

impl Tenant {
    /// Creates the root tenant.
    #[must_use]
    pub fn root(name: NonEmptyString) -> Self {
        Self {
            id: TenantId::root(),
            name,
            description: None,
            parent: None,
            kind: TenantKind::System,
            created_on: Utc::now(),
        }
    }

    /// Creates a child tenant below `parent`.
    pub fn child(
        id: TenantId,
        name: impl Into<String>,
        parent: TenantId,
        kind: TenantKind,
    ) -> AppResult<Self> {
        if kind == TenantKind::System || id.is_root() {
            return Err(AppError::Validation(
                "only the root tenant may be a system tenant".to_owned(),
            ));
        }

        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            description: None,
            parent: Some(parent),
            kind,
            created_on: Utc::now(),
        })
    }

    /// Renames the tenant.
    pub fn rename(&mut self, name: impl Into<String>) -> AppResult<()> {
        self.name = NonEmptyString::new(name)?;
        Ok(())
    }

    /// Returns the tenant id.
    #[must_use]
    pub fn id(&self) -> &TenantId {
        &self.id
    }

    /// Returns the tenant name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the parent tenant id; `None` only for root.
    #[must_use]
    pub fn parent(&self) -> Option<&TenantId> {
        self.parent.as_ref()
    }

    /// Returns the hierarchy level.
    #[must_use]
    pub fn kind(&self) -> TenantKind {
        self.kind
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }
}
