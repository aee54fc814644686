//! GraphQL schema: per-entity namespaces on `Query` and `Mutation`.

mod agencies;
mod brands;
mod customers;
mod entries;
mod products;
mod security;


use async_graphql::{Context, EmptySubscription, ID, Object, Schema};
use marquee_application::RequestContext;

use crate::error::GraphqlResultExt;
use crate::state::AppServices;

use self::agencies::{AgencyMutation, AgencyQuery};
use self::brands::{BrandMutation, BrandQuery};
use self::customers::{CustomerObject, CustomersMutation};
use self::products::{ProductMutation, ProductQuery};
use self::security::{SecurityMutation, SecurityQuery};

pub type MarqueeSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(services: AppServices) -> MarqueeSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services)
        .finish()
}

/// Services and request context of the executing operation.
fn scope<'a>(ctx: &Context<'a>) -> async_graphql::Result<(&'a AppServices, &'a RequestContext)> {
    Ok((ctx.data::<AppServices>()?, ctx.data::<RequestContext>()?))
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn agencies(&self) -> AgencyQuery {
        AgencyQuery
    }

    async fn brands(&self) -> BrandQuery {
        BrandQuery
    }

    async fn products(&self) -> ProductQuery {
        ProductQuery
    }

    async fn security(&self) -> SecurityQuery {
        SecurityQuery
    }

    /// Storefront profile of the calling customer; null for anonymous callers.
    async fn customer_login(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<CustomerObject>> {
        let (services, context) = scope(ctx)?;
        services
            .storefront
            .customer_login(context)
            .await
            .map(|customer| customer.map(CustomerObject))
            .into_graphql()
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn agencies(&self) -> AgencyMutation {
        AgencyMutation
    }

    async fn brands(&self) -> BrandMutation {
        BrandMutation
    }

    async fn products(&self) -> ProductMutation {
        ProductMutation
    }

    async fn security(&self) -> SecurityMutation {
        SecurityMutation
    }

    async fn customers(&self) -> CustomersMutation {
        CustomersMutation
    }

    /// Records a purchase of a product of the current tenant by the calling customer.
    async fn purchase_product(&self, ctx: &Context<'_>, product_id: ID) -> async_graphql::Result<bool> {
        let (services, context) = scope(ctx)?;
        services
            .storefront
            .purchase_product(context, product_id.as_str())
            .await
            .into_graphql()
    }
}
