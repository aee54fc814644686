//! Customer storefront: profiles, purchases, and the public product list.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use marquee_core::{AppError, AppResult, IdentityType, SecurityIdentity, TenantId};
use marquee_domain::{Customer, Entry, EntryKind, ListRequest, PurchasedProduct};

use crate::entry_service::not_found;
use crate::item_store::{get_as, query_as, to_item};
use crate::{EntryInput, EntryService, ItemStore, RangeQuery, RequestContext, TenancyService, keys};

#[cfg(test)]
mod tests;

/// Size of the public product list.
pub const PUBLIC_PRODUCTS_LIMIT: usize = 100;

/// Product as shown to a storefront visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicProduct {
    /// The product entry.
    pub entry: Entry,
    /// When the calling customer bought it, if they did.
    pub date_purchased: Option<DateTime<Utc>>,
}

impl PublicProduct {
    /// Returns whether the calling customer bought the product.
    #[must_use]
    pub fn purchased(&self) -> bool {
        self.date_purchased.is_some()
    }
}

/// Application service for the customer storefront.
#[derive(Clone)]
pub struct StorefrontService {
    store: Arc<dyn ItemStore>,
    entries: EntryService,
    tenancy: TenancyService,
}

impl StorefrontService {
    /// Creates the service.
    #[must_use]
    pub fn new(store: Arc<dyn ItemStore>, entries: EntryService, tenancy: TenancyService) -> Self {
        Self {
            store,
            entries,
            tenancy,
        }
    }

    /// Returns the customer profile in the current tenant, creating it from
    /// the identity on first call. Anonymous requests get `None`.
    pub async fn customer_login(&self, context: &RequestContext) -> AppResult<Option<Customer>> {
        if context.identity().is_none() {
            return Ok(None);
        }
        let identity = require_customer(context)?;
        let partition_key = keys::customer(context.tenant().id(), identity.id());

        if let Some(customer) = get_as(self.store.as_ref(), &partition_key, keys::RECORD).await? {
            return Ok(Some(customer));
        }

        let customer = Customer::from_identity(identity)?;
        self.store
            .put(to_item(partition_key, keys::RECORD, &customer)?)
            .await?;
        Ok(Some(customer))
    }

    /// Lists the products the calling customer bought in the current tenant.
    pub async fn purchased_products(
        &self,
        context: &RequestContext,
    ) -> AppResult<Vec<PurchasedProduct>> {
        let identity = require_customer(context)?;
        self.purchases_of(context.tenant().id(), identity).await
    }

    /// Records a purchase of a product of the current tenant.
    ///
    /// Buying the same product again keeps the first purchase date.
    pub async fn purchase_product(
        &self,
        context: &RequestContext,
        product_id: &str,
    ) -> AppResult<bool> {
        let identity = require_customer(context)?;
        let tenant_id = context.tenant().id();
        self.entries
            .get(context, EntryKind::Product, product_id)
            .await?;

        let partition_key = keys::customer(tenant_id, identity.id());
        let sort_key = keys::purchased_product(product_id);
        let existing: Option<PurchasedProduct> =
            get_as(self.store.as_ref(), &partition_key, &sort_key).await?;
        if existing.is_none() {
            let purchase = PurchasedProduct {
                product_id: product_id.to_owned(),
                date_purchased: Utc::now(),
            };
            self.store
                .put(to_item(partition_key, sort_key, &purchase)?)
                .await?;
        }

        Ok(true)
    }

    /// Lists the products of the current tenant flagged with the caller's
    /// purchases.
    pub async fn list_public_products(
        &self,
        context: &RequestContext,
    ) -> AppResult<Vec<PublicProduct>> {
        let page = self
            .entries
            .list(
                context,
                EntryKind::Product,
                &ListRequest::first(PUBLIC_PRODUCTS_LIMIT)?,
            )
            .await?;

        let purchases: HashMap<String, DateTime<Utc>> = match context
            .identity()
            .filter(|identity| identity.identity_type() == IdentityType::Customer)
        {
            Some(identity) => self
                .purchases_of(context.tenant().id(), identity)
                .await?
                .into_iter()
                .map(|purchase| (purchase.product_id, purchase.date_purchased))
                .collect(),
            None => HashMap::new(),
        };

        Ok(page
            .data
            .into_iter()
            .map(|entry| PublicProduct {
                date_purchased: purchases.get(entry.id().as_str()).copied(),
                entry,
            })
            .collect())
    }

    /// Copies a product of a brand into the current tenant.
    pub async fn purchase_product_from_brand(
        &self,
        context: &RequestContext,
        brand_id: &str,
        product_id: &str,
    ) -> AppResult<Entry> {
        context.require_permission(EntryKind::Product.permission_name())?;
        let brand = self.tenancy.get_tenant_by_id(&TenantId::new(brand_id)?).await?;
        let product = self
            .entries
            .find_in_tenant(brand.id(), EntryKind::Product, product_id)
            .await?
            .ok_or_else(|| not_found(EntryKind::Product, product_id))?;

        self.entries
            .create(
                context,
                EntryKind::Product,
                EntryInput {
                    title: product.title().to_owned(),
                    description: product.description().map(str::to_owned),
                },
            )
            .await
    }

    async fn purchases_of(
        &self,
        tenant_id: &TenantId,
        identity: &SecurityIdentity,
    ) -> AppResult<Vec<PurchasedProduct>> {
        query_as(
            self.store.as_ref(),
            &keys::customer(tenant_id, identity.id()),
            RangeQuery::prefixed(keys::purchased_product("")),
        )
        .await
    }
}

fn require_customer(context: &RequestContext) -> AppResult<&SecurityIdentity> {
    let identity = context.require_identity()?;
    if identity.identity_type() != IdentityType::Customer {
        return Err(AppError::Forbidden(format!(
            "identity '{}' is not a customer",
            identity.id()
        )));
    }
    Ok(identity)
}
