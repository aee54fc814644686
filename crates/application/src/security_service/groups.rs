use marquee_domain::{ANONYMOUS_GROUP_SLUG, FULL_ACCESS_GROUP_SLUG, Group, Permission};

use crate::item_store::{query_as, to_item};
use crate::{RangeQuery, RequestContext};

use super::*;

/// Permission required to manage groups.
const GROUP_PERMISSION: &str = "security.group";

/// The two groups every tenant is provisioned with.
#[derive(Debug, Clone)]
pub struct DefaultGroups {
    /// Group granting `*`.
    pub full_access: Group,
    /// Group whose permissions apply to anonymous requests.
    pub anonymous: Group,
}

impl SecurityService {
    /// Ensures the default groups exist in a tenant, creating missing ones.
    pub async fn ensure_default_groups(&self, tenant_id: &TenantId) -> AppResult<DefaultGroups> {
        let full_access = match self.find_group(tenant_id, FULL_ACCESS_GROUP_SLUG).await? {
            Some(group) => group,
            None => self.save_group(Group::full_access(tenant_id.clone())?).await?,
        };
        let anonymous = match self.find_group(tenant_id, ANONYMOUS_GROUP_SLUG).await? {
            Some(group) => group,
            None => self.save_group(Group::anonymous(tenant_id.clone())?).await?,
        };

        Ok(DefaultGroups {
            full_access,
            anonymous,
        })
    }

    /// Returns a group by slug, if it exists.
    pub async fn find_group(&self, tenant_id: &TenantId, slug: &str) -> AppResult<Option<Group>> {
        get_as(self.store.as_ref(), &keys::groups(tenant_id), slug).await
    }

    /// Lists the groups of the current tenant.
    pub async fn list_groups(&self, context: &RequestContext) -> AppResult<Vec<Group>> {
        context.require_permission(GROUP_PERMISSION)?;
        query_as(
            self.store.as_ref(),
            &keys::groups(context.tenant().id()),
            RangeQuery::default(),
        )
        .await
    }

    /// Creates a custom group in the current tenant.
    pub async fn create_group(
        &self,
        context: &RequestContext,
        input: CreateGroupInput,
    ) -> AppResult<Group> {
        context.require_permission(GROUP_PERMISSION)?;
        let permissions = input
            .permissions
            .into_iter()
            .map(Permission::new)
            .collect::<AppResult<Vec<_>>>()?;
        let group = Group::new(
            context.tenant().id().clone(),
            input.slug,
            input.name,
            input.description,
            false,
            permissions,
        )?;

        self.store
            .insert(to_item(keys::groups(group.tenant_id()), group.slug(), &group)?)
            .await
            .map_err(|error| match error {
                AppError::Conflict(_) => {
                    AppError::Conflict(format!("group '{}' already exists", group.slug()))
                }
                other => other,
            })?;
        Ok(group)
    }

    async fn save_group(&self, group: Group) -> AppResult<Group> {
        self.store
            .put(to_item(keys::groups(group.tenant_id()), group.slug(), &group)?)
            .await?;
        Ok(group)
    }
}
