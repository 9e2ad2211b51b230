//! Pagination types
//!
//! Defines the continuation result and the candidate field names used to
//! read pagination metadata.

use crate::types::{JsonObject, JsonValue};

/// Result of the next page computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available, request this page next
    Continue(u32),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }
}

/// Pagination metadata read from one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageProgress {
    /// Page the API says it returned
    pub current: i64,
    /// Total pages the API reports
    pub total: i64,
}

impl PageProgress {
    /// Check whether this was the last page
    pub fn is_last(&self) -> bool {
        self.current >= self.total
    }
}

/// Ordered candidate names for the pagination metadata fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFieldNames {
    /// Candidates for the current page number
    pub current: Vec<String>,
    /// Candidates for the total page count
    pub total: Vec<String>,
}

impl Default for PageFieldNames {
    fn default() -> Self {
        Self {
            current: vec!["page".to_string(), "currentPage".to_string()],
            total: vec!["totalPages".to_string(), "totalPage".to_string()],
        }
    }
}

impl PageFieldNames {
    /// Create field names from explicit candidate lists
    pub fn new<C, T>(current: C, total: T) -> Self
    where
        C: IntoIterator,
        C::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            current: current.into_iter().map(Into::into).collect(),
            total: total.into_iter().map(Into::into).collect(),
        }
    }

    /// Read the progress of a page, defaulting missing values to `requested`
    pub fn progress(&self, data: &JsonObject, requested: u32) -> PageProgress {
        let fallback = i64::from(requested);
        PageProgress {
            current: read_page_number(data, &self.current).unwrap_or(fallback),
            total: read_page_number(data, &self.total).unwrap_or(fallback),
        }
    }
}

/// Read the first candidate field holding a page number
///
/// Integers, integral floats and numeric strings count as present; any
/// other value is skipped in favour of the next candidate.
pub fn read_page_number(data: &JsonObject, candidates: &[String]) -> Option<i64> {
    candidates
        .iter()
        .find_map(|name| data.get(name).and_then(as_page_number))
}

fn as_page_number(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
