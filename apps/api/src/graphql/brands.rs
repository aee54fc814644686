use async_graphql::{Context, ID, Object};
use marquee_domain::EntryKind;

use crate::error::GraphqlResultExt;

use super::entries::{
    Brand, BrandList, EntryListSort, EntryUpdateInput, TenantEntryCreateInput, list_request,
};
use super::scope;

pub struct BrandQuery;

#[Object]
impl BrandQuery {
    async fn get_brand(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Brand> {
        let (services, context) = scope(ctx)?;
        services
            .entries
            .get(context, EntryKind::Brand, id.as_str())
            .await
            .map(Brand)
            .into_graphql()
    }

    async fn list_brands(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        sort: Option<EntryListSort>,
        after: Option<ID>,
        before: Option<ID>,
    ) -> async_graphql::Result<BrandList> {
        let (services, context) = scope(ctx)?;
        let request = list_request(limit, sort, after, before).into_graphql()?;
        services
            .entries
            .list(context, EntryKind::Brand, &request)
            .await
            .map(BrandList::from)
            .into_graphql()
    }
}

pub struct BrandMutation;

#[Object]
impl BrandMutation {
    /// Creates the brand and provisions its tenant under the current agency.
    async fn create_brand(
        &self,
        ctx: &Context<'_>,
        data: TenantEntryCreateInput,
    ) -> async_graphql::Result<Brand> {
        let (services, context) = scope(ctx)?;
        let (input, admin) = data.into_parts();
        services
            .tenant_entries
            .create(context, EntryKind::Brand, input, admin)
            .await
            .map(|provisioned| Brand(provisioned.entry))
            .into_graphql()
    }

    async fn update_brand(
        &self,
        ctx: &Context<'_>,
        id: ID,
        data: EntryUpdateInput,
    ) -> async_graphql::Result<Brand> {
        let (services, context) = scope(ctx)?;
        services
            .tenant_entries
            .update(context, EntryKind::Brand, id.as_str(), data.into())
            .await
            .map(Brand)
            .into_graphql()
    }

    async fn delete_brand(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Brand> {
        let (services, context) = scope(ctx)?;
        services
            .entries
            .delete(context, EntryKind::Brand, id.as_str())
            .await
            .map(Brand)
            .into_graphql()
    }
}
