// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # nhanh-extract
//!
//! Paginated extraction of sales bills and inventory movements from the
//! Nhanh.vn POS API.
//!
//! ## Features
//!
//! - **Paginated Extraction**: Drives page requests until the API reports the last page
//! - **Fail-Soft**: Transport and decode failures keep the records already fetched
//! - **Shape Tolerance**: Records as lists or id-keyed maps, two pagination spellings
//! - **JSONL Hand-off**: One file per stream and day for the warehouse loader
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nhanh_extract::{ApiConfig, PaginatedExtractor, RequestSpec, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let api = ApiConfig::new("https://pos.open.nhanh.vn/api", "74951", "8901", "token");
//!     let extractor = PaginatedExtractor::new(api)?;
//!
//!     let spec = RequestSpec::new("bill/search", "bill")
//!         .with_param("depotId", 155_286)
//!         .with_param("fromDate", "2024-01-15")
//!         .with_param("toDate", "2024-01-15");
//!
//!     let outcome = extractor.extract(&spec).await?;
//!     println!("{} records, {}", outcome.len(), outcome.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     PaginatedExtractor                          │
//! │  extract(RequestSpec) → ExtractionOutcome { records, status }   │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │ Envelope │   HTTP    │   Paginate    │  Decode   │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Form     │ POST form │ Page number   │ code/data │ JSONL       │
//! │ JSON blob│ Timeout   │ Field aliases │ List/Map  │             │
//! │          │ Rate Limit│ Ceiling       │ Emptiness │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Configuration loading
pub mod config;

/// HTTP client with timeout and rate limiting
pub mod http;

/// Request envelope and data blob encoding
pub mod envelope;

/// Response decoding and record normalization
pub mod decode;

/// Page number pagination
pub mod pagination;

/// Paginated extraction loop
pub mod extractor;

/// Built-in extraction streams
pub mod streams;

/// JSONL output
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::{ApiConfig, AppConfig};
pub use extractor::{
    ExtractionOutcome, ExtractionStatus, PaginatedExtractor, RequestSpec, StopReason,
};
pub use streams::Stream;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
