use async_graphql::{Context, ID, InputObject, Object, SimpleObject};
use chrono::{DateTime, Utc};
use marquee_application::{CreateApiKeyInput, CreateGroupInput, IssuedToken, TenantAccess};
use marquee_core::SecurityIdentity;
use marquee_domain::{AdminUser, ApiKey, Group, Permission};

use crate::error::GraphqlResultExt;

use super::entries::AdminUserInput;
use super::scope;

pub struct SecurityQuery;

#[Object]
impl SecurityQuery {
    /// Identity of the caller; null for anonymous requests.
    async fn identity(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<IdentityObject>> {
        let (_, context) = scope(ctx)?;
        Ok(context.identity().cloned().map(IdentityObject))
    }

    async fn list_groups(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<GroupObject>> {
        let (services, context) = scope(ctx)?;
        services
            .security
            .list_groups(context)
            .await
            .map(|groups| groups.into_iter().map(GroupObject).collect())
            .into_graphql()
    }

    async fn list_api_keys(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<ApiKeyObject>> {
        let (services, context) = scope(ctx)?;
        services
            .security
            .list_api_keys(context)
            .await
            .map(|keys| keys.into_iter().map(ApiKeyObject).collect())
            .into_graphql()
    }
}

pub struct SecurityMutation;

#[Object]
impl SecurityMutation {
    /// Exchanges admin credentials for a bearer token.
    async fn login(
        &self,
        ctx: &Context<'_>,
        login: String,
        password: String,
    ) -> async_graphql::Result<AuthToken> {
        let (services, _) = scope(ctx)?;
        services
            .security
            .login(&login, &password)
            .await
            .map(AuthToken::from)
            .into_graphql()
    }

    /// Creates an API key in the current tenant. The token is returned only once.
    async fn create_api_key(
        &self,
        ctx: &Context<'_>,
        data: ApiKeyInput,
    ) -> async_graphql::Result<CreatedApiKey> {
        let (services, context) = scope(ctx)?;
        let (api_key, token) = services
            .security
            .create_api_key(
                context,
                CreateApiKeyInput {
                    name: data.name,
                    description: data.description.unwrap_or_default(),
                    permissions: data.permissions,
                },
            )
            .await
            .into_graphql()?;
        Ok(CreatedApiKey {
            api_key: ApiKeyObject(api_key),
            token: token.token,
        })
    }

    async fn create_group(
        &self,
        ctx: &Context<'_>,
        data: GroupInput,
    ) -> async_graphql::Result<GroupObject> {
        let (services, context) = scope(ctx)?;
        services
            .security
            .create_group(
                context,
                CreateGroupInput {
                    slug: data.slug,
                    name: data.name,
                    description: data.description.unwrap_or_default(),
                    permissions: data.permissions,
                },
            )
            .await
            .map(GroupObject)
            .into_graphql()
    }

    /// Creates an admin user and links it to the current tenant through `group`.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        data: AdminUserInput,
        group: String,
    ) -> async_graphql::Result<AdminUserObject> {
        let (services, context) = scope(ctx)?;
        services
            .security
            .create_tenant_user(context, data.into(), &group)
            .await
            .map(AdminUserObject)
            .into_graphql()
    }
}

pub struct IdentityObject(SecurityIdentity);

#[Object(name = "SecurityIdentity")]
impl IdentityObject {
    async fn id(&self) -> &str {
        self.0.id()
    }

    #[graphql(name = "type")]
    async fn identity_type(&self) -> &'static str {
        self.0.identity_type().as_str()
    }

    async fn display_name(&self) -> &str {
        self.0.display_name()
    }

    /// Tenants the identity can switch to.
    async fn access(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<TenantAccessObject>> {
        let (services, _) = scope(ctx)?;
        services
            .access
            .identity_access(&self.0)
            .await
            .map(|rows| rows.into_iter().map(TenantAccessObject).collect())
            .into_graphql()
    }
}

/// Bearer token issued by a sign-in.
#[derive(SimpleObject)]
pub struct AuthToken {
    token: String,
    expires_on: Option<DateTime<Utc>>,
    identity: IdentityObject,
}

impl From<IssuedToken> for AuthToken {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            expires_on: issued.expires_on,
            identity: IdentityObject(issued.identity),
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Permission")]
pub struct PermissionObject {
    name: String,
}

fn permission_objects(permissions: &[Permission]) -> Vec<PermissionObject> {
    permissions
        .iter()
        .map(|permission| PermissionObject {
            name: permission.name().to_owned(),
        })
        .collect()
}

pub struct TenantAccessObject(TenantAccess);

#[Object(name = "TenantAccess")]
impl TenantAccessObject {
    async fn id(&self) -> ID {
        ID(self.0.id.to_string())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    #[graphql(name = "type")]
    async fn kind(&self) -> &'static str {
        self.0.kind.as_str()
    }

    async fn permissions(&self) -> Vec<PermissionObject> {
        permission_objects(&self.0.permissions)
    }
}

pub struct GroupObject(Group);

#[Object(name = "SecurityGroup")]
impl GroupObject {
    async fn slug(&self) -> &str {
        self.0.slug()
    }

    async fn name(&self) -> &str {
        self.0.name()
    }

    async fn description(&self) -> &str {
        self.0.description()
    }

    async fn system(&self) -> bool {
        self.0.system()
    }

    async fn permissions(&self) -> Vec<PermissionObject> {
        permission_objects(self.0.permissions())
    }
}

pub struct ApiKeyObject(ApiKey);

#[Object(name = "ApiKey")]
impl ApiKeyObject {
    async fn id(&self) -> ID {
        ID(self.0.id().to_owned())
    }

    async fn name(&self) -> &str {
        self.0.name()
    }

    async fn description(&self) -> &str {
        self.0.description()
    }

    async fn permissions(&self) -> Vec<PermissionObject> {
        permission_objects(self.0.permissions())
    }

    async fn created_on(&self) -> DateTime<Utc> {
        self.0.created_on()
    }
}

#[derive(SimpleObject)]
pub struct CreatedApiKey {
    api_key: ApiKeyObject,
    token: String,
}

pub struct AdminUserObject(AdminUser);

#[Object(name = "AdminUser")]
impl AdminUserObject {
    async fn login(&self) -> &str {
        self.0.login().as_str()
    }

    async fn first_name(&self) -> &str {
        self.0.first_name()
    }

    async fn last_name(&self) -> &str {
        self.0.last_name()
    }

    async fn created_on(&self) -> DateTime<Utc> {
        self.0.created_on()
    }
}

#[derive(InputObject)]
pub struct ApiKeyInput {
    name: String,
    description: Option<String>,
    permissions: Vec<String>,
}

#[derive(InputObject)]
pub struct GroupInput {
    slug: String,
    name: String,
    description: Option<String>,
    permissions: Vec<String>,
}
