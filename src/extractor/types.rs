//! Extractor types
//!
//! The request description consumed by one extraction and the outcome it
//! produces.

use crate::error::{Error, Result};
use crate::pagination::PageFieldNames;
use crate::types::{json_type_name, ExtractedRecord, JsonObject, JsonValue};
use serde::Serialize;
use std::fmt;

/// Default parameter name carrying the page index
pub const DEFAULT_PAGE_KEY: &str = "page";

/// Default page ceiling
pub const DEFAULT_MAX_PAGES: u32 = 100;

// ============================================================================
// RequestSpec
// ============================================================================

/// Description of one extraction call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    endpoint: String,
    params: JsonObject,
    page_key: String,
    data_key: String,
    max_pages: u32,
    page_fields: PageFieldNames,
}

impl RequestSpec {
    /// Create a spec for `endpoint` whose records live under `data_key`
    pub fn new(endpoint: impl Into<String>, data_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: JsonObject::new(),
            page_key: DEFAULT_PAGE_KEY.to_string(),
            data_key: data_key.into(),
            max_pages: DEFAULT_MAX_PAGES,
            page_fields: PageFieldNames::default(),
        }
    }

    /// Add a request parameter
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add several request parameters, keeping their order
    #[must_use]
    pub fn with_params(mut self, params: JsonObject) -> Self {
        self.params.extend(params);
        self
    }

    /// Set the parameter name carrying the page index
    #[must_use]
    pub fn with_page_key(mut self, page_key: impl Into<String>) -> Self {
        self.page_key = page_key.into();
        self
    }

    /// Set the page ceiling
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the candidate names for pagination metadata
    #[must_use]
    pub fn with_page_fields(mut self, fields: PageFieldNames) -> Self {
        self.page_fields = fields;
        self
    }

    /// Endpoint path, relative to the API base URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Base request parameters (without the page key)
    pub fn params(&self) -> &JsonObject {
        &self.params
    }

    /// Parameter name carrying the page index
    pub fn page_key(&self) -> &str {
        &self.page_key
    }

    /// Response field holding the records
    pub fn data_key(&self) -> &str {
        &self.data_key
    }

    /// Page ceiling
    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    /// Candidate names for pagination metadata
    pub fn page_fields(&self) -> &PageFieldNames {
        &self.page_fields
    }

    /// Check the spec is usable
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().trim_matches('/').is_empty() {
            return Err(Error::missing_field("endpoint"));
        }
        if self.page_key.trim().is_empty() {
            return Err(Error::missing_field("page_key"));
        }
        if self.data_key.trim().is_empty() {
            return Err(Error::missing_field("data_key"));
        }
        if self.max_pages == 0 {
            return Err(Error::invalid_value(
                "max_pages",
                "must be greater than zero",
            ));
        }
        if self.page_fields.current.is_empty() || self.page_fields.total.is_empty() {
            return Err(Error::invalid_value(
                "page_fields",
                "needs at least one candidate for current and total",
            ));
        }
        for (key, value) in &self.params {
            if value.is_array() || value.is_object() {
                return Err(Error::invalid_value(
                    format!("params.{key}"),
                    format!("must be a scalar, got {}", json_type_name(value)),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// Why an extraction stopped before the API reported the last page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    /// The request failed (connection, timeout, HTTP status)
    Transport {
        /// Error description
        message: String,
    },
    /// The response body could not be decoded
    Decode {
        /// Error description
        message: String,
    },
    /// Non-success code with no data, the API's usual "nothing more" signal
    EmptyWithCode {
        /// The code reported
        code: Option<i64>,
    },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { message } => write!(f, "transport error: {message}"),
            Self::Decode { message } => write!(f, "decode error: {message}"),
            Self::EmptyWithCode { code: Some(code) } => {
                write!(f, "API code {code} with empty data")
            }
            Self::EmptyWithCode { code: None } => write!(f, "missing API code with empty data"),
        }
    }
}

/// Terminal status of an extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// The API reported the last page, or returned no data
    Completed,
    /// Stopped early; records from earlier pages are kept
    StoppedOnError {
        /// Page that could not be processed
        page: u32,
        /// What went wrong
        reason: StopReason,
    },
    /// The page ceiling was reached before the API reported the last page
    PageCeiling,
}

impl ExtractionStatus {
    pub(crate) fn stopped(page: u32, reason: StopReason) -> Self {
        Self::StoppedOnError { page, reason }
    }

    /// Check for a clean completion
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Check for an early stop
    pub fn is_stopped_on_error(&self) -> bool {
        matches!(self, Self::StoppedOnError { .. })
    }

    /// Check whether the page ceiling was hit
    pub fn is_page_ceiling(&self) -> bool {
        matches!(self, Self::PageCeiling)
    }

    /// Check for a stop caused by a transport or decode failure
    ///
    /// An `EmptyWithCode` stop is the API's usual end-of-data signal and is
    /// not a failure, although it also covers an expired token.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::StoppedOnError {
                reason: StopReason::Transport { .. } | StopReason::Decode { .. },
                ..
            }
        )
    }

    /// Check for the ambiguous end-of-data stop
    pub fn is_empty_with_code(&self) -> bool {
        matches!(
            self,
            Self::StoppedOnError {
                reason: StopReason::EmptyWithCode { .. },
                ..
            }
        )
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::StoppedOnError { page, reason } => {
                write!(f, "stopped on page {page}: {reason}")
            }
            Self::PageCeiling => f.write_str("page ceiling reached"),
        }
    }
}

/// Result of one extraction: records in page order plus terminal status
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOutcome {
    records: Vec<ExtractedRecord>,
    status: ExtractionStatus,
    pages_fetched: u32,
}

impl ExtractionOutcome {
    pub(crate) fn new(
        records: Vec<ExtractedRecord>,
        status: ExtractionStatus,
        pages_fetched: u32,
    ) -> Self {
        Self {
            records,
            status,
            pages_fetched,
        }
    }

    /// Extracted records in page order
    pub fn records(&self) -> &[ExtractedRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether no records were extracted
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Terminal status
    pub fn status(&self) -> &ExtractionStatus {
        &self.status
    }

    /// Number of page requests issued
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Take the records
    pub fn into_records(self) -> Vec<ExtractedRecord> {
        self.records
    }
}
