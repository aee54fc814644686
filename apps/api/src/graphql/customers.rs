use async_graphql::{Context, ID, InputObject, Object, SimpleObject};
use chrono::{DateTime, Utc};
use marquee_application::CustomerSignUpInput;
use marquee_domain::{Customer, PurchasedProduct};

use crate::error::GraphqlResultExt;

use super::scope;
use super::security::AuthToken;

pub struct CustomersMutation;

#[Object]
impl CustomersMutation {
    async fn sign_up(
        &self,
        ctx: &Context<'_>,
        data: CustomerSignUpData,
    ) -> async_graphql::Result<AuthToken> {
        let (services, _) = scope(ctx)?;
        services
            .security
            .sign_up_customer(data.into())
            .await
            .map(AuthToken::from)
            .into_graphql()
    }

    async fn sign_in(
        &self,
        ctx: &Context<'_>,
        email: String,
        password: String,
    ) -> async_graphql::Result<AuthToken> {
        let (services, _) = scope(ctx)?;
        services
            .security
            .sign_in_customer(&email, &password)
            .await
            .map(AuthToken::from)
            .into_graphql()
    }
}

pub struct CustomerObject(pub Customer);

#[Object(name = "Customer")]
impl CustomerObject {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn first_name(&self) -> &str {
        &self.0.first_name
    }

    async fn last_name(&self) -> &str {
        &self.0.last_name
    }

    async fn email(&self) -> Option<&str> {
        self.0.email.as_deref()
    }

    async fn phone(&self) -> Option<&str> {
        self.0.phone.as_deref()
    }

    /// Products this customer bought in the current tenant.
    async fn products(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<PurchasedProductObject>> {
        let (services, context) = scope(ctx)?;
        services
            .storefront
            .purchased_products(context)
            .await
            .map(|products| products.into_iter().map(PurchasedProductObject::from).collect())
            .into_graphql()
    }
}

#[derive(SimpleObject)]
#[graphql(name = "PurchasedProduct")]
pub struct PurchasedProductObject {
    product_id: ID,
    date_purchased: DateTime<Utc>,
}

impl From<PurchasedProduct> for PurchasedProductObject {
    fn from(purchase: PurchasedProduct) -> Self {
        Self {
            product_id: ID(purchase.product_id),
            date_purchased: purchase.date_purchased,
        }
    }
}

#[derive(InputObject)]
pub struct CustomerSignUpData {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
    phone: Option<String>,
}

impl From<CustomerSignUpData> for CustomerSignUpInput {
    fn from(data: CustomerSignUpData) -> Self {
        Self {
            email: data.email,
            first_name: data.first_name,
            last_name: data.last_name,
            phone: data.phone,
            password: data.password,
        }
    }
}
