//! Security ports and application service.
//!
//! Owns groups, admin users and their tenant links, API keys, customer
//! accounts, and the opaque bearer tokens issued to all of them.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use marquee_core::{AppError, AppResult, SecurityIdentity, TenantId};
use serde::{Deserialize, Serialize};

use crate::ItemStore;
use crate::item_store::{get_as, to_item};
use crate::keys;

mod api_keys;
mod customers;
mod groups;
mod token_crypto;
mod users;


pub use groups::DefaultGroups;

/// Default lifetime of tokens issued to admin users and customers.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 12;

const SECURITY_VERSION_SORT_KEY: &str = "VERSION";

/// Port for password hashing operations. Keeps application code free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Bearer token handed to a client once. Only its digest is stored.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Raw token value.
    pub token: String,
    /// Identity the token authenticates.
    pub identity: SecurityIdentity,
    /// Expiry, or `None` for API keys.
    pub expires_on: Option<DateTime<Utc>>,
}

/// Input for creating an admin user.
#[derive(Debug, Clone)]
pub struct CreateAdminUserInput {
    /// Login email.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Plaintext password.
    pub password: String,
}

/// Input for creating a tenant API key.
#[derive(Debug, Clone)]
pub struct CreateApiKeyInput {
    /// Key name.
    pub name: String,
    /// Key description.
    pub description: String,
    /// Permission rule names granted to the key.
    pub permissions: Vec<String>,
}

/// Input for creating a tenant group.
#[derive(Debug, Clone)]
pub struct CreateGroupInput {
    /// Unique slug within the tenant.
    pub slug: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Permission rule names.
    pub permissions: Vec<String>,
}

/// Input for a storefront customer sign-up.
#[derive(Debug, Clone)]
pub struct CustomerSignUpInput {
    /// Sign-in email.
    pub email: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Plaintext password.
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenRecord {
    identity: SecurityIdentity,
    expires_on: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SecurityVersion {
    version: String,
}

/// Application service for identities, groups, and credentials.
#[derive(Clone)]
pub struct SecurityService {
    store: Arc<dyn ItemStore>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_ttl: Duration,
}

impl SecurityService {
    /// Creates a security service with the default token lifetime.
    #[must_use]
    pub fn new(store: Arc<dyn ItemStore>, password_hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            password_hasher,
            token_ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        }
    }

    /// Overrides the lifetime of user and customer tokens.
    #[must_use]
    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    /// Resolves a raw bearer token to the identity it was issued for.
    ///
    /// Returns `None` for unknown or expired tokens.
    pub async fn authenticate(&self, raw_token: &str) -> AppResult<Option<SecurityIdentity>> {
        let token_hash = token_crypto::hash_token(raw_token);
        let partition_key = keys::access_token(&token_hash);
        let record: Option<AccessTokenRecord> =
            get_as(self.store.as_ref(), &partition_key, keys::RECORD).await?;
        let Some(record) = record else {
            return Ok(None);
        };

        if record
            .expires_on
            .is_some_and(|expires_on| expires_on <= Utc::now())
        {
            self.store.delete(&partition_key, keys::RECORD).await?;
            return Ok(None);
        }

        Ok(Some(record.identity))
    }

    /// Stores the application version that installed security in a tenant.
    pub async fn set_version(&self, tenant_id: &TenantId, version: &str) -> AppResult<()> {
        self.store
            .put(to_item(
                keys::security_settings(tenant_id),
                SECURITY_VERSION_SORT_KEY,
                &SecurityVersion {
                    version: version.to_owned(),
                },
            )?)
            .await
    }

    /// Returns the version that installed security in a tenant, if installed.
    pub async fn version(&self, tenant_id: &TenantId) -> AppResult<Option<String>> {
        let stored: Option<SecurityVersion> = get_as(
            self.store.as_ref(),
            &keys::security_settings(tenant_id),
            SECURITY_VERSION_SORT_KEY,
        )
        .await?;
        Ok(stored.map(|stored| stored.version))
    }

    pub(crate) async fn issue_token(
        &self,
        identity: SecurityIdentity,
        expires: bool,
    ) -> AppResult<IssuedToken> {
        let (token, token_hash) = token_crypto::generate_token()?;
        let expires_on = expires.then(|| Utc::now() + self.token_ttl);

        self.store
            .insert(to_item(
                keys::access_token(&token_hash),
                keys::RECORD,
                &AccessTokenRecord {
                    identity: identity.clone(),
                    expires_on,
                },
            )?)
            .await?;

        Ok(IssuedToken {
            token,
            identity,
            expires_on,
        })
    }

    fn invalid_credentials() -> AppError {
        AppError::Unauthorized("invalid login or password".to_owned())
    }
}
