use marquee_core::{AppError, AppResult, IdentityType, SecurityIdentity, TenantId};
use marquee_domain::{EntryKind, EntryPatch, ListRequest, ListSort, Tenant, TenantKind};

use crate::RequestContext;
use crate::test_support::{FakeItemStore, full_access_context, root_tenant};

use super::{EntryInput, EntryService};

fn service() -> EntryService {
    EntryService::new(FakeItemStore::shared(), "0.1.0")
}

fn admin_context() -> AppResult<RequestContext> {
    Ok(full_access_context(
        root_tenant()?,
        Some(SecurityIdentity::new(
            "ada@example.com",
            IdentityType::Admin,
            "Ada Lovelace",
        )),
    ))
}

fn titled(title: &str) -> EntryInput {
    EntryInput {
        title: title.to_owned(),
        description: None,
    }
}

async fn create_many(
    service: &EntryService,
    context: &RequestContext,
    kind: EntryKind,
    count: usize,
) -> AppResult<Vec<String>> {
    let mut ids = Vec::with_capacity(count);
    for index in 0..count {
        let entry = service
            .create(context, kind, titled(&format!("{kind} {index}")))
            .await?;
        ids.push(entry.id().to_string());
    }
    Ok(ids)
}

fn page_ids(page: &marquee_domain::Page<marquee_domain::Entry>) -> Vec<String> {
    page.data.iter().map(|entry| entry.id().to_string()).collect()
}

#[tokio::test]
async fn create_then_get_round_trips() -> AppResult<()> {
    let service = service();
    let context = admin_context()?;

    let created = service
        .create(
            &context,
            EntryKind::Product,
            EntryInput {
                title: "Course".to_owned(),
                description: Some("Rust for agencies".to_owned()),
            },
        )
        .await?;
    let fetched = service
        .get(&context, EntryKind::Product, created.id().as_str())
        .await?;

    assert_eq!(created, fetched);
    assert_eq!(fetched.app_version(), Some("0.1.0"));
    assert!(matches!(
        fetched.created_by(),
        Some(created_by) if created_by.id == "ada@example.com" && created_by.identity_type == "admin"
    ));
    Ok(())
}

#[tokio::test]
async fn agency_scenario_lists_deletes_and_updates() -> AppResult<()> {
    let service = service();
    let context = admin_context()?;
    let ids = create_many(&service, &context, EntryKind::Agency, 3).await?;

    let page = service
        .list(&context, EntryKind::Agency, &ListRequest::first(3)?)
        .await?;
    let titles: Vec<&str> = page.data.iter().map(|entry| entry.title()).collect();
    assert_eq!(titles, vec!["Agency 2", "Agency 1", "Agency 0"]);
    assert!(page.meta.after.is_none() && page.meta.before.is_none());

    service.delete(&context, EntryKind::Agency, &ids[1]).await?;
    let page = service
        .list(&context, EntryKind::Agency, &ListRequest::first(2)?)
        .await?;
    let titles: Vec<&str> = page.data.iter().map(|entry| entry.title()).collect();
    assert_eq!(titles, vec!["Agency 2", "Agency 0"]);
    assert!(page.meta.after.is_none() && page.meta.before.is_none());

    service
        .update(
            &context,
            EntryKind::Agency,
            &ids[0],
            EntryPatch {
                title: Some("Agency 0 - UPDATED".to_owned()),
                description: None,
            },
        )
        .await?;
    let updated = service.get(&context, EntryKind::Agency, &ids[0]).await?;
    assert_eq!(updated.title(), "Agency 0 - UPDATED");
    Ok(())
}

#[tokio::test]
async fn title_patch_leaves_other_fields_unchanged() -> AppResult<()> {
    let service = service();
    let context = admin_context()?;
    let created = service
        .create(
            &context,
            EntryKind::Product,
            EntryInput {
                title: "Course".to_owned(),
                description: Some("Rust for agencies".to_owned()),
            },
        )
        .await?;

    service
        .update(
            &context,
            EntryKind::Product,
            created.id().as_str(),
            EntryPatch {
                title: Some("Course - UPDATED".to_owned()),
                description: None,
            },
        )
        .await?;
    let fetched = service
        .get(&context, EntryKind::Product, created.id().as_str())
        .await?;

    assert_eq!(fetched.title(), "Course - UPDATED");
    assert_eq!(fetched.id(), created.id());
    assert_eq!(fetched.description(), Some("Rust for agencies"));
    assert_eq!(fetched.created_on(), created.created_on());
    assert_eq!(fetched.created_by(), created.created_by());
    assert_eq!(fetched.app_version(), created.app_version());
    assert!(fetched.saved_on() >= created.saved_on());
    Ok(())
}

#[tokio::test]
async fn null_description_patch_clears_it() -> AppResult<()> {
    let service = service();
    let context = admin_context()?;
    let created = service
        .create(
            &context,
            EntryKind::Product,
            EntryInput {
                title: "Poster".to_owned(),
                description: Some("old".to_owned()),
            },
        )
        .await?;

    service
        .update(
            &context,
            EntryKind::Product,
            created.id().as_str(),
            EntryPatch {
                title: None,
                description: Some(None),
            },
        )
        .await?;
    let fetched = service
        .get(&context, EntryKind::Product, created.id().as_str())
        .await?;

    assert_eq!(fetched.title(), "Poster");
    assert_eq!(fetched.description(), None);
    Ok(())
}

#[tokio::test]
async fn missing_entries_are_not_found_with_kind_and_id() -> AppResult<()> {
    let service = service();
    let context = admin_context()?;
    let ids = create_many(&service, &context, EntryKind::Brand, 1).await?;

    service.delete(&context, EntryKind::Brand, &ids[0]).await?;
    let second_delete = service.delete(&context, EntryKind::Brand, &ids[0]).await;
    let missing_get = service.get(&context, EntryKind::Brand, "nope").await;
    let missing_update = service
        .update(&context, EntryKind::Brand, "nope", EntryPatch::default())
        .await;

    assert!(matches!(
        second_delete,
        Err(AppError::NotFound(message)) if message == format!("Brand \"{}\" not found.", ids[0])
    ));
    assert!(matches!(missing_get, Err(AppError::NotFound(_))));
    assert!(matches!(missing_update, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn entries_never_leak_across_tenants() -> AppResult<()> {
    let service = service();
    let root_context = admin_context()?;
    let agency = Tenant::child(
        TenantId::new("agency-1")?,
        "Agency",
        TenantId::root(),
        TenantKind::Agency,
    )?;
    let agency_context = root_context.scoped_to(agency);

    let ids = create_many(&service, &agency_context, EntryKind::Product, 2).await?;

    let in_root = service
        .list(&root_context, EntryKind::Product, &ListRequest::first(10)?)
        .await?;
    let in_agency = service
        .list(&agency_context, EntryKind::Product, &ListRequest::first(10)?)
        .await?;

    assert!(in_root.data.is_empty());
    assert_eq!(in_agency.data.len(), 2);
    assert!(
        service
            .get(&root_context, EntryKind::Product, &ids[0])
            .await
            .is_err()
    );
    Ok(())
}

#[tokio::test]
async fn descending_pages_walk_forward_and_back() -> AppResult<()> {
    let service = service();
    let context = admin_context()?;
    let mut ids = create_many(&service, &context, EntryKind::Product, 7).await?;
    ids.reverse();

    let first = service
        .list(&context, EntryKind::Product, &ListRequest::first(3)?)
        .await?;
    assert_eq!(page_ids(&first), ids[0..3].to_vec());
    assert!(first.meta.before.is_none());

    let second = service
        .list(
            &context,
            EntryKind::Product,
            &ListRequest::new(Some(3), None, first.meta.after.clone(), None)?,
        )
        .await?;
    assert_eq!(page_ids(&second), ids[3..6].to_vec());
    assert_eq!(second.meta.before.as_deref(), Some(ids[3].as_str()));

    let back = service
        .list(
            &context,
            EntryKind::Product,
            &ListRequest::new(Some(3), None, None, second.meta.before.clone())?,
        )
        .await?;
    assert_eq!(page_ids(&back), page_ids(&first));
    assert!(back.meta.before.is_none());
    assert_eq!(back.meta.after, first.meta.after);

    let last = service
        .list(
            &context,
            EntryKind::Product,
            &ListRequest::new(Some(3), None, second.meta.after.clone(), None)?,
        )
        .await?;
    assert_eq!(page_ids(&last), ids[6..].to_vec());
    assert!(last.meta.after.is_none());
    Ok(())
}

#[tokio::test]
async fn ascending_sort_lists_oldest_first() -> AppResult<()> {
    let service = service();
    let context = admin_context()?;
    let ids = create_many(&service, &context, EntryKind::Brand, 3).await?;

    let page = service
        .list(
            &context,
            EntryKind::Brand,
            &ListRequest::new(Some(2), Some(ListSort::CreatedAsc), None, None)?,
        )
        .await?;

    assert_eq!(page_ids(&page), ids[0..2].to_vec());
    assert_eq!(page.meta.after.as_deref(), Some(ids[1].as_str()));
    Ok(())
}

#[tokio::test]
async fn unknown_tenant_scope_lists_empty_page() -> AppResult<()> {
    let service = service();
    let page = service
        .list_in_tenant(
            &TenantId::new("never-created")?,
            EntryKind::Agency,
            &ListRequest::first(10)?,
        )
        .await?;
    assert!(page.data.is_empty());
    Ok(())
}

#[tokio::test]
async fn operations_require_entry_permission() -> AppResult<()> {
    let service = service();
    let context = RequestContext::new(root_tenant()?, None, Vec::new());

    let result = service.create(&context, EntryKind::Agency, titled("Agency")).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
    Ok(())
}
