//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod customer;
mod entry;
mod pagination;
mod security;
mod tenant;
mod user;

pub use customer::{Customer, PurchasedProduct};
pub use entry::{CreatedBy, Entry, EntryId, EntryKind, EntryPatch};
pub use pagination::{
    DEFAULT_PAGE_LIMIT, ListRequest, ListSort, MAX_PAGE_LIMIT, Page, PageMeta, RangePlan,
};
pub use security::{
    ANONYMOUS_GROUP_SLUG, ApiKey, FULL_ACCESS_GROUP_SLUG, Group, Permission, WILDCARD_PERMISSION,
    permissions_grant,
};
pub use tenant::{Tenant, TenantKind};
pub use user::{
    AdminUser, CustomerAccount, EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH,
    TenantLink, validate_password,
};
