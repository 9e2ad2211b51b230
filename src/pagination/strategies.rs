//! Pagination strategy implementations

use super::types::{NextPage, PageFieldNames, PageProgress};
use crate::types::{JsonObject, JsonValue};

// ============================================================================
// Page Number Pagination
// ============================================================================

/// Page number pagination driven by reported totals
///
/// The page index travels inside the request's parameter mapping:
/// - `{"fromDate": "2024-01-15", "page": 2}`
///
/// Continuation is decided from the response's own view of where it is:
/// - `{"page": 2, "totalPages": 5}`
/// - `{"currentPage": 2, "totalPage": 5}`
#[derive(Debug, Clone)]
pub struct PageNumberPaginator {
    /// Parameter name carrying the page index
    pub page_key: String,
    /// Candidate metadata field names
    pub fields: PageFieldNames,
}

impl Default for PageNumberPaginator {
    fn default() -> Self {
        Self::new("page")
    }
}

impl PageNumberPaginator {
    /// Create a new page number paginator
    pub fn new(page_key: impl Into<String>) -> Self {
        Self {
            page_key: page_key.into(),
            fields: PageFieldNames::default(),
        }
    }

    /// Set the candidate metadata field names
    #[must_use]
    pub fn with_fields(mut self, fields: PageFieldNames) -> Self {
        self.fields = fields;
        self
    }

    /// Build the parameter mapping for one page
    ///
    /// The page key replaces an existing parameter of the same name in place,
    /// otherwise it is appended last.
    pub fn page_params(&self, base: &JsonObject, page: u32) -> JsonObject {
        let mut params = base.clone();
        params.insert(self.page_key.clone(), JsonValue::from(page));
        params
    }

    /// Read the progress reported by a page
    pub fn progress(&self, data: &JsonObject, requested: u32) -> PageProgress {
        self.fields.progress(data, requested)
    }

    /// Decide whether to request another page
    pub fn next_page(&self, data: &JsonObject, requested: u32) -> NextPage {
        if self.progress(data, requested).is_last() {
            NextPage::Done
        } else {
            requested.checked_add(1).map_or(NextPage::Done, NextPage::Continue)
        }
    }
}
