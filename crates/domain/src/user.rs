//! Admin users, their tenant links, and storefront customer accounts.

use chrono::{DateTime, Utc};
use marquee_core::{AppError, AppResult, NonEmptyString, TenantId};
use serde::{Deserialize, Serialize};

use crate::{Group, Permission};

/// Validated, lower-cased email address. Used as the login of admin users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Performs basic structural validation: one `@`, non-empty local part, and
    /// a domain containing at least one `.`.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(format!(
                "'{trimmed}' is not a valid email address"
            )));
        };

        if local.is_empty() || domain.contains('@') || !domain.contains('.') {
            return Err(AppError::Validation(format!(
                "'{trimmed}' is not a valid email address"
            )));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Minimum password length accepted for new accounts.
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Maximum password length (bounds Argon2 input size).
pub const PASSWORD_MAX_LENGTH: usize = 128;

/// Validates a plaintext password before it is hashed.
pub fn validate_password(password: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if char_count < PASSWORD_MIN_LENGTH {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    if char_count > PASSWORD_MAX_LENGTH {
        return Err(AppError::Validation(format!(
            "password must not exceed {PASSWORD_MAX_LENGTH} characters"
        )));
    }

    let lowered = password.to_lowercase();
    if COMMON_PASSWORDS.iter().any(|entry| *entry == lowered) {
        return Err(AppError::Validation(
            "this password is too common and has appeared in data breaches".to_owned(),
        ));
    }

    Ok(())
}

static COMMON_PASSWORDS: &[&str] = &[
    "password",
    "12345678",
    "123456789",
    "1234567890",
    "qwertyuiop",
    "iloveyou",
    "password1",
    "password123",
    "sunshine",
    "football",
    "baseball",
    "letmein1",
    "welcome1",
    "trustno1",
];

/// Admin console user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    login: EmailAddress,
    first_name: NonEmptyString,
    last_name: NonEmptyString,
    password_hash: String,
    created_on: DateTime<Utc>,
}

impl AdminUser {
    /// Creates an admin user from an already hashed password.
    pub fn new(
        login: EmailAddress,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            login,
            first_name: NonEmptyString::new(first_name)?,
            last_name: NonEmptyString::new(last_name)?,
            password_hash: password_hash.into(),
            created_on: Utc::now(),
        })
    }

    /// Returns the login email.
    #[must_use]
    pub fn login(&self) -> &EmailAddress {
        &self.login
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Returns `First Last`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.as_str(), self.last_name.as_str())
    }

    /// Returns the stored Argon2 hash.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        self.password_hash.as_str()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }
}

/// Direct identity-to-tenant link carrying the group granted in that tenant.
///
/// The group's permissions are copied at link time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantLink {
    login: String,
    tenant_id: TenantId,
    tenant_name: String,
    group_slug: String,
    permissions: Vec<Permission>,
}

impl TenantLink {
    /// Links `login` to the tenant through `group`.
    #[must_use]
    pub fn new(login: impl Into<String>, tenant_name: impl Into<String>, group: &Group) -> Self {
        Self {
            login: login.into(),
            tenant_id: group.tenant_id().clone(),
            tenant_name: tenant_name.into(),
            group_slug: group.slug().to_owned(),
            permissions: group.permissions().to_vec(),
        }
    }

    /// Returns the linked login.
    #[must_use]
    pub fn login(&self) -> &str {
        self.login.as_str()
    }

    /// Returns the linked tenant.
    #[must_use]
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns the tenant name at link time.
    #[must_use]
    pub fn tenant_name(&self) -> &str {
        self.tenant_name.as_str()
    }

    /// Returns the slug of the granting group.
    #[must_use]
    pub fn group_slug(&self) -> &str {
        self.group_slug.as_str()
    }

    /// Returns the permissions granted in the linked tenant.
    #[must_use]
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }
}

/// Storefront customer credentials, shared by every brand storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccount {
    id: String,
    email: EmailAddress,
    first_name: NonEmptyString,
    last_name: NonEmptyString,
    phone: Option<String>,
    password_hash: String,
}

impl CustomerAccount {
    /// Creates a customer account from an already hashed password.
    pub fn new(
        email: EmailAddress,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: Option<String>,
        password_hash: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            id: uuid::Uuid::new_v4().as_simple().to_string(),
            email,
            first_name: NonEmptyString::new(first_name)?,
            last_name: NonEmptyString::new(last_name)?,
            phone: phone.filter(|value| !value.trim().is_empty()),
            password_hash: password_hash.into(),
        })
    }

    /// Returns the stable subject id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the sign-in email.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Returns the phone number.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// Returns the stored Argon2 hash.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        self.password_hash.as_str()
    }
}
