//! Cursor pagination over a sort-key range.
//!
//! A list request is turned into a [`RangePlan`]: a single directional range
//! query that fetches one row more than the page size, so the presence of a
//! further page can be detected without a second query. Backward paging runs
//! the query in the opposite direction and re-reverses the rows afterwards.

use marquee_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Page size used when the caller does not pass one.
pub const DEFAULT_PAGE_LIMIT: usize = 10;

/// Largest accepted page size.
pub const MAX_PAGE_LIMIT: usize = 1000;

/// Order of a list by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListSort {
    /// Oldest first.
    CreatedAsc,
    /// Newest first.
    #[default]
    CreatedDesc,
}

/// Validated list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    limit: usize,
    sort: ListSort,
    after: Option<String>,
    before: Option<String>,
}

impl ListRequest {
    /// Validates the limit and normalizes empty cursors to `None`.
    pub fn new(
        limit: Option<usize>,
        sort: Option<ListSort>,
        after: Option<String>,
        before: Option<String>,
    ) -> AppResult<Self> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"
            )));
        }

        Ok(Self {
            limit,
            sort: sort.unwrap_or_default(),
            after: after.filter(|value| !value.is_empty()),
            before: before.filter(|value| !value.is_empty()),
        })
    }

    /// Returns a first-page request with the given limit in newest-first order.
    pub fn first(limit: usize) -> AppResult<Self> {
        Self::new(Some(limit), None, None, None)
    }

    /// Returns the page size.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the requested order.
    #[must_use]
    pub fn sort(&self) -> ListSort {
        self.sort
    }

    /// Translates the request into a single range query.
    ///
    /// When both cursors are present `before` wins and `after` is ignored.
    #[must_use]
    pub fn plan(&self) -> RangePlan {
        let mut reverse = self.sort != ListSort::CreatedAsc;

        if let Some(before) = &self.before {
            reverse = !reverse;
            let (gt, lt) = bound(reverse, before);
            return RangePlan {
                limit: self.limit,
                reverse,
                gt,
                lt,
                direction: PageDirection::Backward,
            };
        }

        let (gt, lt) = match &self.after {
            Some(after) => bound(reverse, after),
            None => (None, None),
        };

        RangePlan {
            limit: self.limit,
            reverse,
            gt,
            lt,
            direction: PageDirection::Forward {
                from_cursor: self.after.is_some(),
            },
        }
    }
}

fn bound(reverse: bool, cursor: &str) -> (Option<String>, Option<String>) {
    if reverse {
        (None, Some(cursor.to_owned()))
    } else {
        (Some(cursor.to_owned()), None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageDirection {
    Forward { from_cursor: bool },
    Backward,
}

/// Directional range query derived from a [`ListRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePlan {
    limit: usize,
    reverse: bool,
    gt: Option<String>,
    lt: Option<String>,
    direction: PageDirection,
}

impl RangePlan {
    /// Number of rows to fetch: the page size plus one look-ahead row.
    #[must_use]
    pub fn fetch_limit(&self) -> usize {
        self.limit + 1
    }

    /// Whether the store should scan sort keys in descending order.
    #[must_use]
    pub fn reverse(&self) -> bool {
        self.reverse
    }

    /// Exclusive lower sort-key bound.
    #[must_use]
    pub fn gt(&self) -> Option<&str> {
        self.gt.as_deref()
    }

    /// Exclusive upper sort-key bound.
    #[must_use]
    pub fn lt(&self) -> Option<&str> {
        self.lt.as_deref()
    }

    /// Builds the caller-facing page from the rows the range query returned.
    pub fn into_page<T>(self, mut rows: Vec<T>, id_of: impl Fn(&T) -> &str) -> Page<T> {
        let has_more = rows.len() > self.limit;
        rows.truncate(self.limit);

        let mut meta = PageMeta {
            limit: self.limit,
            after: None,
            before: None,
        };

        match self.direction {
            PageDirection::Backward => {
                rows.reverse();
                if has_more {
                    meta.before = rows.first().map(|row| id_of(row).to_owned());
                }
                meta.after = rows.last().map(|row| id_of(row).to_owned());
            }
            PageDirection::Forward { from_cursor } => {
                if has_more {
                    meta.after = rows.last().map(|row| id_of(row).to_owned());
                }
                if from_cursor {
                    meta.before = rows.first().map(|row| id_of(row).to_owned());
                }
            }
        }

        Page { data: rows, meta }
    }
}

/// Cursors for the pages adjacent to the returned one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// Page size the page was built with.
    pub limit: usize,
    /// Cursor for the next page, if one exists.
    pub after: Option<String>,
    /// Cursor for the previous page, if one exists.
    pub before: Option<String>,
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Rows in caller-facing order.
    pub data: Vec<T>,
    /// Adjacent page cursors.
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use marquee_core::AppResult;
    use proptest::prelude::*;

    use super::{ListRequest, ListSort, Page, RangePlan};

    /// Runs a plan against sorted keys the way a sort-key range scan would.
    fn scan(keys: &[String], plan: &RangePlan) -> Vec<String> {
        let mut rows: Vec<String> = keys
            .iter()
            .filter(|key| plan.gt().is_none_or(|gt| key.as_str() > gt))
            .filter(|key| plan.lt().is_none_or(|lt| key.as_str() < lt))
            .cloned()
            .collect();
        if plan.reverse() {
            rows.reverse();
        }
        rows.truncate(plan.fetch_limit());
        rows
    }

    fn list(keys: &[String], request: &ListRequest) -> Page<String> {
        let plan = request.plan();
        let rows = scan(keys, &plan);
        plan.into_page(rows, |row| row.as_str())
    }

    fn keys(count: usize) -> Vec<String> {
        (0..count).map(|index| format!("id-{index:04}")).collect()
    }

    #[test]
    fn first_page_desc_has_only_after_cursor() -> AppResult<()> {
        let keys = keys(3);
        let page = list(&keys, &ListRequest::new(Some(2), None, None, None)?);
        assert_eq!(page.data, vec!["id-0002", "id-0001"]);
        assert_eq!(page.meta.after.as_deref(), Some("id-0001"));
        assert_eq!(page.meta.before, None);
        Ok(())
    }

    #[test]
    fn after_cursor_desc_returns_remaining_rows() -> AppResult<()> {
        let keys = keys(3);
        let request = ListRequest::new(Some(2), None, Some("id-0001".to_owned()), None)?;
        let page = list(&keys, &request);
        assert_eq!(page.data, vec!["id-0000"]);
        assert_eq!(page.meta.after, None);
        assert_eq!(page.meta.before.as_deref(), Some("id-0000"));
        Ok(())
    }

    #[test]
    fn before_cursor_desc_restores_first_page() -> AppResult<()> {
        let keys = keys(3);
        let request = ListRequest::new(Some(2), None, None, Some("id-0000".to_owned()))?;
        let page = list(&keys, &request);
        assert_eq!(page.data, vec!["id-0002", "id-0001"]);
        assert_eq!(page.meta.after.as_deref(), Some("id-0001"));
        assert_eq!(page.meta.before, None);
        Ok(())
    }

    #[test]
    fn ascending_pages_mirror_descending_ones() -> AppResult<()> {
        let keys = keys(3);
        let asc = Some(ListSort::CreatedAsc);

        let first = list(&keys, &ListRequest::new(Some(2), asc, None, None)?);
        assert_eq!(first.data, vec!["id-0000", "id-0001"]);
        assert_eq!(first.meta.after.as_deref(), Some("id-0001"));

        let second = list(
            &keys,
            &ListRequest::new(Some(2), asc, Some("id-0001".to_owned()), None)?,
        );
        assert_eq!(second.data, vec!["id-0002"]);
        assert_eq!(second.meta.before.as_deref(), Some("id-0002"));

        let back = list(
            &keys,
            &ListRequest::new(Some(2), asc, None, Some("id-0002".to_owned()))?,
        );
        assert_eq!(back.data, vec!["id-0000", "id-0001"]);
        assert_eq!(back.meta.after.as_deref(), Some("id-0001"));
        assert_eq!(back.meta.before, None);
        Ok(())
    }

    #[test]
    fn before_wins_over_after() -> AppResult<()> {
        let keys = keys(5);
        let both = ListRequest::new(
            Some(2),
            None,
            Some("id-0004".to_owned()),
            Some("id-0001".to_owned()),
        )?;
        let before_only = ListRequest::new(Some(2), None, None, Some("id-0001".to_owned()))?;
        assert_eq!(list(&keys, &both), list(&keys, &before_only));
        Ok(())
    }

    #[test]
    fn empty_backward_page_has_no_cursors() -> AppResult<()> {
        let keys = keys(2);
        let request = ListRequest::new(Some(2), None, None, Some("id-0001".to_owned()))?;
        let page = list(&keys, &request);
        assert!(page.data.is_empty());
        assert_eq!(page.meta.after, None);
        assert_eq!(page.meta.before, None);
        Ok(())
    }

    #[test]
    fn limit_bounds_are_enforced() -> AppResult<()> {
        assert!(ListRequest::new(Some(0), None, None, None).is_err());
        assert!(ListRequest::new(Some(1001), None, None, None).is_err());

        let request = ListRequest::new(None, None, Some(String::new()), None)?;
        assert_eq!(request.limit(), 10);
        assert_eq!(request.plan(), ListRequest::first(10)?.plan());
        Ok(())
    }

    proptest! {
        #[test]
        fn forward_paging_visits_every_row_once(count in 0usize..40, limit in 1usize..8, ascending in any::<bool>()) {
            let keys = keys(count);
            let sort = if ascending { ListSort::CreatedAsc } else { ListSort::CreatedDesc };
            let mut expected = keys.clone();
            if !ascending {
                expected.reverse();
            }

            let mut visited = Vec::new();
            let mut after = None;
            loop {
                let request = ListRequest::new(Some(limit), Some(sort), after.clone(), None);
                prop_assert!(request.is_ok());
                let Ok(request) = request else { break };
                let page = list(&keys, &request);
                visited.extend(page.data.iter().cloned());
                match page.meta.after {
                    Some(cursor) => after = Some(cursor),
                    None => break,
                }
            }

            prop_assert_eq!(visited, expected);
        }

        #[test]
        fn backward_paging_reconstructs_previous_page(count in 1usize..40, limit in 1usize..8, ascending in any::<bool>()) {
            let keys = keys(count);
            let sort = if ascending { ListSort::CreatedAsc } else { ListSort::CreatedDesc };

            let mut pages = Vec::new();
            let mut after = None;
            loop {
                let Ok(request) = ListRequest::new(Some(limit), Some(sort), after.clone(), None) else {
                    prop_assert!(false, "valid request was rejected");
                    break;
                };
                let page = list(&keys, &request);
                let next = page.meta.after.clone();
                pages.push(page);
                match next {
                    Some(cursor) => after = Some(cursor),
                    None => break,
                }
            }

            for window in pages.windows(2) {
                let before = window[1].meta.before.clone();
                prop_assert!(before.is_some());
                let Ok(request) = ListRequest::new(Some(limit), Some(sort), None, before) else {
                    prop_assert!(false, "valid request was rejected");
                    break;
                };
                let previous = list(&keys, &request);
                prop_assert_eq!(&previous.data, &window[0].data);
            }
        }
    }
}
