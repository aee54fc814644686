use async_graphql::{Context, ID, Object};
use marquee_domain::EntryKind;

use crate::error::GraphqlResultExt;

use super::entries::{
    Agency, AgencyList, EntryListSort, EntryUpdateInput, TenantEntryCreateInput, list_request,
};
use super::scope;

pub struct AgencyQuery;

#[Object]
impl AgencyQuery {
    async fn get_agency(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Agency> {
        let (services, context) = scope(ctx)?;
        services
            .entries
            .get(context, EntryKind::Agency, id.as_str())
            .await
            .map(Agency)
            .into_graphql()
    }

    async fn list_agencies(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        sort: Option<EntryListSort>,
        after: Option<ID>,
        before: Option<ID>,
    ) -> async_graphql::Result<AgencyList> {
        let (services, context) = scope(ctx)?;
        let request = list_request(limit, sort, after, before).into_graphql()?;
        services
            .entries
            .list(context, EntryKind::Agency, &request)
            .await
            .map(AgencyList::from)
            .into_graphql()
    }
}

pub struct AgencyMutation;

#[Object]
impl AgencyMutation {
    /// Creates the agency and provisions its tenant with a first admin user.
    async fn create_agency(
        &self,
        ctx: &Context<'_>,
        data: TenantEntryCreateInput,
    ) -> async_graphql::Result<Agency> {
        let (services, context) = scope(ctx)?;
        let (input, admin) = data.into_parts();
        services
            .tenant_entries
            .create(context, EntryKind::Agency, input, admin)
            .await
            .map(|provisioned| Agency(provisioned.entry))
            .into_graphql()
    }

    async fn update_agency(
        &self,
        ctx: &Context<'_>,
        id: ID,
        data: EntryUpdateInput,
    ) -> async_graphql::Result<Agency> {
        let (services, context) = scope(ctx)?;
        services
            .tenant_entries
            .update(context, EntryKind::Agency, id.as_str(), data.into())
            .await
            .map(Agency)
            .into_graphql()
    }

    async fn delete_agency(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Agency> {
        let (services, context) = scope(ctx)?;
        services
            .entries
            .delete(context, EntryKind::Agency, id.as_str())
            .await
            .map(Agency)
            .into_graphql()
    }
}
