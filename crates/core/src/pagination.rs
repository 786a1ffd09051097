//! Pagination engine: page/pattern normalization and the paged envelope.
//!
//! Every list endpoint goes through this module so the pagination contract
//! is identical across entity types. Page sizes are fixed per resource --
//! a deliberate constant, not configuration.

use serde::Serialize;

use crate::error::CoreError;

/// Fixed page size for project search.
pub const PROJECT_PAGE_SIZE: i64 = 10;
/// Fixed page size for user search.
pub const USER_PAGE_SIZE: i64 = 10;
/// Fixed page size for run search.
pub const RUN_PAGE_SIZE: i64 = 10;
/// Fixed page size for feature search.
pub const FEATURE_PAGE_SIZE: i64 = 10;
/// Fixed page size for to-do search.
pub const TODO_PAGE_SIZE: i64 = 6;
/// Fixed page size for comment search.
pub const COMMENT_PAGE_SIZE: i64 = 5;

/// A (0-based page index, page size) pair handed to the repository layer.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    pub page: i64,
    pub size: i64,
}

impl PageRequest {
    pub fn new(page: i64, size: i64) -> Self {
        Self { page, size }
    }

    /// Row offset for `LIMIT size OFFSET ...` queries.
    pub fn offset(self) -> i64 {
        self.page * self.size
    }
}

/// One page of repository results plus the total match count.
#[derive(Debug)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_elements: i64,
}

/// Pagination metadata reported alongside every search response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageableInfo {
    pub current_page: i64,
    /// 0-based index of the last page, floored at 0 for empty result sets.
    pub last_page_index: i64,
    pub total_pages: i64,
    pub elements_in_page: i64,
}

/// Search response envelope: `{ items, pageable }`.
#[derive(Debug, Serialize)]
pub struct PagedResponse<T> {
    pub items: Vec<T>,
    pub pageable: PageableInfo,
}

/// Normalize a requested page index. Missing defaults to 0; negative values
/// are rejected rather than passed through to the store.
pub fn normalize_page(requested: Option<i64>) -> Result<i64, CoreError> {
    match requested {
        None => Ok(0),
        Some(page) if page < 0 => Err(CoreError::Validation(format!(
            "page must not be negative, got {page}"
        ))),
        Some(page) => Ok(page),
    }
}

/// Normalize a requested search pattern. Missing becomes the empty string,
/// which the repositories treat as a match-all substring filter.
pub fn normalize_pattern(requested: Option<String>) -> String {
    requested.unwrap_or_default()
}

/// Build the response envelope for one result page, bounds-checking the
/// requested page index against the total.
///
/// Page 0 is always accepted, even on an empty result set; any other page
/// index past the last page fails with "page requested does not exist".
pub fn paged_response<T>(
    page: i64,
    size: i64,
    result: Page<T>,
) -> Result<PagedResponse<T>, CoreError> {
    let total_pages = if result.total_elements == 0 {
        0
    } else {
        (result.total_elements + size - 1) / size
    };
    let last_page_index = (total_pages - 1).max(0);

    if page != 0 && page > last_page_index {
        return Err(CoreError::Validation(
            "page requested does not exist".to_string(),
        ));
    }

    Ok(PagedResponse {
        pageable: PageableInfo {
            current_page: page,
            last_page_index,
            total_pages,
            elements_in_page: result.items.len() as i64,
        },
        items: result.items,
    })
}
