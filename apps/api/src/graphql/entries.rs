//! Output and input types shared by the agency, brand, and product namespaces.

use async_graphql::{Enum, ID, InputObject, MaybeUndefined, Object, SimpleObject};
use chrono::{DateTime, Utc};
use marquee_application::{CreateAdminUserInput, EntryInput};
use marquee_core::{AppError, AppResult};
use marquee_domain::{
    CreatedBy, Entry, EntryPatch, ListRequest, ListSort, MAX_PAGE_LIMIT, Page, PageMeta,
};

macro_rules! entry_object {
    ($object:ident, $list:ident) => {
        pub struct $object(pub Entry);

        #[Object]
        impl $object {
            async fn id(&self) -> ID {
                ID(self.0.id().to_string())
            }

            async fn title(&self) -> &str {
                self.0.title()
            }

            async fn description(&self) -> Option<&str> {
                self.0.description()
            }

            async fn created_on(&self) -> DateTime<Utc> {
                self.0.created_on()
            }

            async fn saved_on(&self) -> DateTime<Utc> {
                self.0.saved_on()
            }

            async fn created_by(&self) -> Option<CreatedByObject> {
                self.0.created_by().map(CreatedByObject::from)
            }
        }

        #[derive(SimpleObject)]
        pub struct $list {
            data: Vec<$object>,
            meta: ListMeta,
        }

        impl From<Page<Entry>> for $list {
            fn from(page: Page<Entry>) -> Self {
                Self {
                    data: page.data.into_iter().map($object).collect(),
                    meta: ListMeta::from(page.meta),
                }
            }
        }
    };
}

entry_object!(Agency, AgencyList);
entry_object!(Brand, BrandList);
entry_object!(Product, ProductList);

/// Identity that created an entry, as it was at creation time.
#[derive(SimpleObject)]
#[graphql(name = "CreatedBy")]
pub struct CreatedByObject {
    id: String,
    #[graphql(name = "type")]
    identity_type: String,
    display_name: String,
}

impl From<&CreatedBy> for CreatedByObject {
    fn from(created_by: &CreatedBy) -> Self {
        Self {
            id: created_by.id.clone(),
            identity_type: created_by.identity_type.clone(),
            display_name: created_by.display_name.clone(),
        }
    }
}

/// Cursors of the pages adjacent to a list page.
#[derive(SimpleObject)]
pub struct ListMeta {
    limit: i32,
    after: Option<String>,
    before: Option<String>,
}

impl From<PageMeta> for ListMeta {
    fn from(meta: PageMeta) -> Self {
        Self {
            limit: i32::try_from(meta.limit).unwrap_or(i32::MAX),
            after: meta.after,
            before: meta.before,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq)]
pub enum EntryListSort {
    #[graphql(name = "createdOn_ASC")]
    CreatedOnAsc,
    #[graphql(name = "createdOn_DESC")]
    CreatedOnDesc,
}

impl From<EntryListSort> for ListSort {
    fn from(sort: EntryListSort) -> Self {
        match sort {
            EntryListSort::CreatedOnAsc => Self::CreatedAsc,
            EntryListSort::CreatedOnDesc => Self::CreatedDesc,
        }
    }
}

/// Builds a validated list request from resolver arguments.
pub fn list_request(
    limit: Option<i32>,
    sort: Option<EntryListSort>,
    after: Option<ID>,
    before: Option<ID>,
) -> AppResult<ListRequest> {
    let limit = limit
        .map(|limit| {
            usize::try_from(limit).map_err(|_| {
                AppError::Validation(format!(
                    "limit must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"
                ))
            })
        })
        .transpose()?;

    ListRequest::new(
        limit,
        sort.map(ListSort::from),
        after.map(|cursor| cursor.0),
        before.map(|cursor| cursor.0),
    )
}

#[derive(InputObject)]
pub struct EntryCreateInput {
    title: String,
    description: Option<String>,
}

impl From<EntryCreateInput> for EntryInput {
    fn from(input: EntryCreateInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
        }
    }
}

#[derive(InputObject)]
pub struct EntryUpdateInput {
    title: Option<String>,
    description: MaybeUndefined<String>,
}

impl From<EntryUpdateInput> for EntryPatch {
    fn from(input: EntryUpdateInput) -> Self {
        Self {
            title: input.title,
            description: match input.description {
                MaybeUndefined::Undefined => None,
                MaybeUndefined::Null => Some(None),
                MaybeUndefined::Value(description) => Some(Some(description)),
            },
        }
    }
}

/// First admin user of a newly provisioned tenant.
#[derive(InputObject)]
pub struct AdminUserInput {
    email: String,
    password: String,
    first_name: String,
    last_name: String,
}

impl From<AdminUserInput> for CreateAdminUserInput {
    fn from(input: AdminUserInput) -> Self {
        Self {
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            password: input.password,
        }
    }
}

/// Agency or brand to create together with its tenant.
#[derive(InputObject)]
pub struct TenantEntryCreateInput {
    title: String,
    description: Option<String>,
    admin: AdminUserInput,
}

impl TenantEntryCreateInput {
    pub fn into_parts(self) -> (EntryInput, CreateAdminUserInput) {
        (
            EntryInput {
                title: self.title,
                description: self.description,
            },
            self.admin.into(),
        )
    }
}
