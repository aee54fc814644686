use marquee_core::{IdentityType, SecurityIdentity};
use marquee_domain::{ApiKey, Permission};

use crate::item_store::{query_as, to_item};
use crate::{RangeQuery, RequestContext};

use super::*;

/// Permission required to manage API keys.
const API_KEY_PERMISSION: &str = "security.apiKey";

impl SecurityService {
    /// Creates an API key bound to the current tenant and returns its token.
    pub async fn create_api_key(
        &self,
        context: &RequestContext,
        input: CreateApiKeyInput,
    ) -> AppResult<(ApiKey, IssuedToken)> {
        context.require_permission(API_KEY_PERMISSION)?;
        let permissions = input
            .permissions
            .into_iter()
            .map(Permission::new)
            .collect::<AppResult<Vec<_>>>()?;
        let api_key = ApiKey::new(
            context.tenant().id().clone(),
            input.name,
            input.description,
            permissions,
        )?;

        self.store
            .insert(to_item(
                keys::api_keys(api_key.tenant_id()),
                api_key.id(),
                &api_key,
            )?)
            .await?;

        let identity = SecurityIdentity::new(api_key.id(), IdentityType::ApiKey, api_key.name());
        let token = self.issue_token(identity, false).await?;
        Ok((api_key, token))
    }

    /// Lists the API keys of the current tenant.
    pub async fn list_api_keys(&self, context: &RequestContext) -> AppResult<Vec<ApiKey>> {
        context.require_permission(API_KEY_PERMISSION)?;
        query_as(
            self.store.as_ref(),
            &keys::api_keys(context.tenant().id()),
            RangeQuery::default(),
        )
        .await
    }

    /// Returns an API key of a tenant, if it exists there.
    pub async fn find_api_key(&self, tenant_id: &TenantId, id: &str) -> AppResult<Option<ApiKey>> {
        get_as(self.store.as_ref(), &keys::api_keys(tenant_id), id).await
    }
}
