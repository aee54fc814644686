use marquee_core::{IdentityType, SecurityIdentity};
use marquee_domain::{AdminUser, EmailAddress, Group, Tenant, TenantLink, validate_password};
use tracing::info;

use crate::item_store::{query_as, to_item};
use crate::{RangeQuery, RequestContext};

use super::*;

/// Permission required to manage admin users.
const USER_PERMISSION: &str = "security.user";

impl SecurityService {
    /// Creates an admin user with an Argon2-hashed password.
    pub async fn create_user(&self, input: CreateAdminUserInput) -> AppResult<AdminUser> {
        let login = EmailAddress::new(input.email)?;
        validate_password(&input.password)?;
        let password_hash = self.password_hasher.hash_password(&input.password)?;
        let user = AdminUser::new(login, input.first_name, input.last_name, password_hash)?;

        self.store
            .insert(to_item(
                keys::admin_user(user.login().as_str()),
                keys::RECORD,
                &user,
            )?)
            .await
            .map_err(|error| match error {
                AppError::Conflict(_) => AppError::Conflict(format!(
                    "user '{}' already exists",
                    user.login().as_str()
                )),
                other => other,
            })?;

        info!(login = %user.login().as_str(), "created admin user");
        Ok(user)
    }

    /// Creates an admin user and links it to the current tenant through the
    /// group identified by `group_slug`.
    pub async fn create_tenant_user(
        &self,
        context: &RequestContext,
        input: CreateAdminUserInput,
        group_slug: &str,
    ) -> AppResult<AdminUser> {
        context.require_permission(USER_PERMISSION)?;
        let tenant = context.tenant();
        let group = self
            .find_group(tenant.id(), group_slug)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group \"{group_slug}\" not found.")))?;

        let user = self.create_user(input).await?;
        self.link_user_to_tenant(&user, tenant, &group).await?;
        Ok(user)
    }

    /// Returns an admin user by login, if it exists.
    pub async fn find_user(&self, login: &str) -> AppResult<Option<AdminUser>> {
        get_as(
            self.store.as_ref(),
            &keys::admin_user(&login.trim().to_lowercase()),
            keys::RECORD,
        )
        .await
    }

    /// Links an admin user to a tenant, snapshotting the group's permissions.
    pub async fn link_user_to_tenant(
        &self,
        user: &AdminUser,
        tenant: &Tenant,
        group: &Group,
    ) -> AppResult<TenantLink> {
        if group.tenant_id() != tenant.id() {
            return Err(AppError::Validation(format!(
                "group '{}' does not belong to tenant '{}'",
                group.slug(),
                tenant.id()
            )));
        }

        let link = TenantLink::new(user.login().as_str(), tenant.name(), group);
        self.store
            .put(to_item(
                keys::admin_user(user.login().as_str()),
                keys::tenant_link(tenant.id()),
                &link,
            )?)
            .await?;

        info!(
            login = %user.login().as_str(),
            tenant_id = %tenant.id(),
            group = group.slug(),
            "linked admin user to tenant"
        );
        Ok(link)
    }

    /// Lists every tenant link of an admin user.
    pub async fn list_user_links(&self, login: &str) -> AppResult<Vec<TenantLink>> {
        query_as(
            self.store.as_ref(),
            &keys::admin_user(&login.trim().to_lowercase()),
            RangeQuery::prefixed(keys::TENANT_LINK_PREFIX),
        )
        .await
    }

    /// Verifies admin credentials and issues an admin token.
    pub async fn login(&self, login: &str, password: &str) -> AppResult<IssuedToken> {
        let Some(user) = self.find_user(login).await? else {
            return Err(Self::invalid_credentials());
        };

        if !self
            .password_hasher
            .verify_password(password, user.password_hash())?
        {
            return Err(Self::invalid_credentials());
        }

        let identity = SecurityIdentity::new(
            user.login().as_str(),
            IdentityType::Admin,
            user.display_name(),
        );
        self.issue_token(identity, true).await
    }
}
