//! Partition and sort key layout of the item store.
//!
//! Tenant-owned partitions start with `T#{tenant}#` so no operation can reach
//! another tenant's rows by accident.

use marquee_core::TenantId;

/// Sort key of single-record partitions.
pub(crate) const RECORD: &str = "A";

pub(crate) const TENANT_LINK_PREFIX: &str = "LINK#T#";

pub(crate) fn tenant(tenant_id: &TenantId) -> String {
    format!("TENANT#{tenant_id}")
}

pub(crate) fn tenant_children(parent: &TenantId) -> String {
    format!("TENANT#{parent}#CHILDREN")
}

pub(crate) fn groups(tenant_id: &TenantId) -> String {
    format!("T#{tenant_id}#GROUP")
}

pub(crate) fn api_keys(tenant_id: &TenantId) -> String {
    format!("T#{tenant_id}#API_KEY")
}

pub(crate) fn security_settings(tenant_id: &TenantId) -> String {
    format!("T#{tenant_id}#SECURITY")
}

pub(crate) fn locales(tenant_id: &TenantId) -> String {
    format!("T#{tenant_id}#I18N")
}

pub(crate) fn file_manager(tenant_id: &TenantId) -> String {
    format!("T#{tenant_id}#FM")
}

pub(crate) fn customer(tenant_id: &TenantId, customer_id: &str) -> String {
    format!("T#{tenant_id}#C#{customer_id}")
}

pub(crate) fn purchased_product(product_id: &str) -> String {
    format!("PRODUCT#{product_id}")
}

pub(crate) fn admin_user(login: &str) -> String {
    format!("ADMIN_USER#{login}")
}

pub(crate) fn tenant_link(tenant_id: &TenantId) -> String {
    format!("{TENANT_LINK_PREFIX}{tenant_id}")
}

pub(crate) fn customer_account(email: &str) -> String {
    format!("CUSTOMER_ACCOUNT#{email}")
}

pub(crate) fn access_token(token_hash: &str) -> String {
    format!("TOKEN#{token_hash}")
}
