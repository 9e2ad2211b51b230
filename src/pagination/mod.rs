//! Pagination module
//!
//! Page-number pagination with tolerant metadata lookup.
//!
//! # Overview
//!
//! Requests carry a page index under a configurable page key. Each response
//! reports the current page and the total page count, but upstream endpoints
//! disagree on the field names, so each value is looked up through an
//! ordered list of candidate names where the first present one wins.

mod strategies;
mod types;

pub use strategies::PageNumberPaginator;
pub use types::{read_page_number, NextPage, PageFieldNames, PageProgress};
