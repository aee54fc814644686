use async_graphql::{Context, ID, Object, SimpleObject};
use chrono::{DateTime, Utc};
use marquee_application::PublicProduct;
use marquee_domain::EntryKind;

use crate::error::GraphqlResultExt;

use super::entries::{
    EntryCreateInput, EntryListSort, EntryUpdateInput, Product, ProductList, list_request,
};
use super::scope;

pub struct ProductQuery;

#[Object]
impl ProductQuery {
    async fn get_product(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Product> {
        let (services, context) = scope(ctx)?;
        services
            .entries
            .get(context, EntryKind::Product, id.as_str())
            .await
            .map(Product)
            .into_graphql()
    }

    async fn list_products(
        &self,
        ctx: &Context<'_>,
        limit: Option<i32>,
        sort: Option<EntryListSort>,
        after: Option<ID>,
        before: Option<ID>,
    ) -> async_graphql::Result<ProductList> {
        let (services, context) = scope(ctx)?;
        let request = list_request(limit, sort, after, before).into_graphql()?;
        services
            .entries
            .list(context, EntryKind::Product, &request)
            .await
            .map(ProductList::from)
            .into_graphql()
    }

    /// Newest products of the current tenant, flagged with the caller's purchases.
    async fn list_public_products(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<PublicProductList> {
        let (services, context) = scope(ctx)?;
        let products = services
            .storefront
            .list_public_products(context)
            .await
            .into_graphql()?;
        Ok(PublicProductList {
            data: products.into_iter().map(PublicProductObject).collect(),
        })
    }
}

pub struct ProductMutation;

#[Object]
impl ProductMutation {
    async fn create_product(
        &self,
        ctx: &Context<'_>,
        data: EntryCreateInput,
    ) -> async_graphql::Result<Product> {
        let (services, context) = scope(ctx)?;
        services
            .entries
            .create(context, EntryKind::Product, data.into())
            .await
            .map(Product)
            .into_graphql()
    }

    async fn update_product(
        &self,
        ctx: &Context<'_>,
        id: ID,
        data: EntryUpdateInput,
    ) -> async_graphql::Result<Product> {
        let (services, context) = scope(ctx)?;
        services
            .entries
            .update(context, EntryKind::Product, id.as_str(), data.into())
            .await
            .map(Product)
            .into_graphql()
    }

    async fn delete_product(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Product> {
        let (services, context) = scope(ctx)?;
        services
            .entries
            .delete(context, EntryKind::Product, id.as_str())
            .await
            .map(Product)
            .into_graphql()
    }

    /// Copies a product of a brand into the current tenant.
    async fn purchase_product_from_brand(
        &self,
        ctx: &Context<'_>,
        brand_id: ID,
        product_id: ID,
    ) -> async_graphql::Result<Product> {
        let (services, context) = scope(ctx)?;
        services
            .storefront
            .purchase_product_from_brand(context, brand_id.as_str(), product_id.as_str())
            .await
            .map(Product)
            .into_graphql()
    }
}

pub struct PublicProductObject(PublicProduct);

#[Object(name = "PublicProduct")]
impl PublicProductObject {
    async fn id(&self) -> ID {
        ID(self.0.entry.id().to_string())
    }

    async fn title(&self) -> &str {
        self.0.entry.title()
    }

    async fn description(&self) -> Option<&str> {
        self.0.entry.description()
    }

    async fn created_on(&self) -> DateTime<Utc> {
        self.0.entry.created_on()
    }

    async fn purchased(&self) -> bool {
        self.0.purchased()
    }

    async fn date_purchased(&self) -> Option<DateTime<Utc>> {
        self.0.date_purchased
    }
}

#[derive(SimpleObject)]
pub struct PublicProductList {
    data: Vec<PublicProductObject>,
}
