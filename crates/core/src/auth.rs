use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Kind of authenticated principal, used to pick the authorization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityType {
    /// Admin console user.
    Admin,
    /// Programmatic client holding a tenant API key.
    ApiKey,
    /// Storefront customer.
    Customer,
}

impl IdentityType {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::ApiKey => "api-key",
            Self::Customer => "customer",
        }
    }
}

impl Display for IdentityType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for IdentityType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "api-key" => Ok(Self::ApiKey),
            "customer" => Ok(Self::Customer),
            _ => Err(AppError::Validation(format!(
                "unknown identity type '{value}'"
            ))),
        }
    }
}

/// Authenticated principal attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityIdentity {
    id: String,
    identity_type: IdentityType,
    display_name: String,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

impl SecurityIdentity {
    /// Creates an identity with the mandatory fields only.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        identity_type: IdentityType,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            identity_type,
            display_name: display_name.into(),
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
        }
    }

    /// Attaches profile fields carried by customer identities.
    #[must_use]
    pub fn with_profile(
        mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: Option<String>,
        phone: Option<String>,
    ) -> Self {
        self.first_name = Some(first_name.into());
        self.last_name = Some(last_name.into());
        self.email = email;
        self.phone = phone;
        self
    }

    /// Returns the stable identity id (login for admins).
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the identity type.
    #[must_use]
    pub fn identity_type(&self) -> IdentityType {
        self.identity_type
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the first name, if known.
    #[must_use]
    pub fn first_name(&self) -> Option<&str> {
        self.first_name.as_deref()
    }

    /// Returns the last name, if known.
    #[must_use]
    pub fn last_name(&self) -> Option<&str> {
        self.last_name.as_deref()
    }

    /// Returns the email, if known.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the phone number, if known.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}
