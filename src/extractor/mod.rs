//! Paginated extraction module
//!
//! Main page loop.
//!
//! # Overview
//!
//! The extractor module provides:
//! - `PaginatedExtractor` - Drives sequential page requests for one endpoint
//! - `RequestSpec` - What to extract: endpoint, parameters, keys, ceiling
//! - `ExtractionOutcome` - Records in page order plus a terminal status
//!
//! Page-level failures never surface as errors. A transport or decode
//! failure ends the run and the records gathered so far are returned with a
//! stopped-on-error status. Only an invalid `RequestSpec` is an `Err`.

mod types;

pub use types::{
    ExtractionOutcome, ExtractionStatus, RequestSpec, StopReason, DEFAULT_MAX_PAGES,
    DEFAULT_PAGE_KEY,
};

use crate::config::ApiConfig;
use crate::decode::{extract_records, parse_page, PageRecords};
use crate::envelope::build_envelope;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::{NextPage, PageNumberPaginator};
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Extractor for paginated endpoints
///
/// Holds only read-only configuration and a shared HTTP client, so one
/// instance (or its clones) can run any number of extractions concurrently.
#[derive(Debug, Clone)]
pub struct PaginatedExtractor {
    /// API settings and credentials
    api: ApiConfig,
    /// HTTP client
    client: HttpClient,
}

impl PaginatedExtractor {
    /// Create an extractor with a client built from the API settings
    pub fn new(api: ApiConfig) -> Result<Self> {
        let client = HttpClient::with_config(HttpClientConfig::from_api(&api))?;
        Ok(Self { api, client })
    }

    /// Extract every page of `spec`
    ///
    /// Returns `Err` only when the spec itself is invalid.
    pub async fn extract(&self, spec: &RequestSpec) -> Result<ExtractionOutcome> {
        spec.validate()?;

        let span = info_span!("extract", endpoint = %spec.endpoint(), data_key = %spec.data_key());
        self.run(spec).instrument(span).await
    }

    async fn run(&self, spec: &RequestSpec) -> Result<ExtractionOutcome> {
        let paginator =
            PageNumberPaginator::new(spec.page_key()).with_fields(spec.page_fields().clone());

        let mut records = Vec::new();
        let mut pages_fetched = 0u32;
        let mut page = 1u32;

        let status = loop {
            if page > spec.max_pages() {
                warn!(
                    max_pages = spec.max_pages(),
                    "Page ceiling reached before the last page"
                );
                break ExtractionStatus::PageCeiling;
            }

            let params = paginator.page_params(spec.params(), page);
            let form = build_envelope(&self.api, &params)?;

            pages_fetched += 1;
            let body = match self.client.post_form_text(spec.endpoint(), &form).await {
                Ok(body) => body,
                Err(e) => {
                    error!(page, error = %e, "HTTP request failed");
                    break ExtractionStatus::stopped(
                        page,
                        StopReason::Transport {
                            message: e.to_string(),
                        },
                    );
                }
            };

            let response = match parse_page(&body) {
                Ok(response) => response,
                Err(e) => {
                    error!(page, error = %e, "Invalid response body");
                    break ExtractionStatus::stopped(
                        page,
                        StopReason::Decode {
                            message: e.to_string(),
                        },
                    );
                }
            };

            if !response.is_success() {
                if response.has_empty_data() {
                    // Usually just "no more data", but also what an expired token looks like
                    warn!(
                        page,
                        code = ?response.code,
                        "API returned non-success code with empty data, stopping"
                    );
                    break ExtractionStatus::stopped(
                        page,
                        StopReason::EmptyWithCode {
                            code: response.code,
                        },
                    );
                }
                warn!(
                    page,
                    code = ?response.code,
                    "API returned non-success code, processing page data anyway"
                );
            }

            let data = match response.data_object() {
                Some(data) if !data.is_empty() => data,
                _ => {
                    debug!(page, "Empty data payload, pagination complete");
                    break ExtractionStatus::Completed;
                }
            };

            match extract_records(data, spec.data_key()) {
                PageRecords::Unexpected(kind) => {
                    warn!(
                        page,
                        data_key = spec.data_key(),
                        kind,
                        "Unexpected data structure, page contributes no records"
                    );
                }
                PageRecords::Missing => {
                    debug!(page, data_key = spec.data_key(), "Data key not present");
                }
                page_records => {
                    debug!(page, records = page_records.len(), "Fetched page");
                    records.extend(page_records.into_records());
                }
            }

            match paginator.next_page(data, page) {
                NextPage::Continue(next) => page = next,
                NextPage::Done => break ExtractionStatus::Completed,
            }
        };

        info!(
            records = records.len(),
            pages = pages_fetched,
            status = %status,
            "Extraction finished"
        );

        Ok(ExtractionOutcome::new(records, status, pages_fetched))
    }
}
