//! Built-in extraction streams
//!
//! The two extraction types the daily job runs. Each one maps a validated
//! date and its op-level parameters onto a `RequestSpec`.
//!
//! | Stream  | Endpoint      | Data key |
//! |---------|---------------|----------|
//! | `bills` | `bill/search` | `bill`   |
//! | `imexs` | `bill/imexs`  | `imexs`  |

use crate::config::{BillsConfig, ExtractConfig, ImexsConfig};
use crate::error::{Error, Result};
use crate::extractor::RequestSpec;
use chrono::{Days, Local, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Date format accepted on input and sent to the API
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A built-in extraction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    /// Sales bills
    Bills,
    /// Inventory imports and exports
    Imexs,
}

impl Stream {
    /// Every built-in stream, in run order
    pub const ALL: [Stream; 2] = [Stream::Bills, Stream::Imexs];

    /// Stream name
    pub fn name(self) -> &'static str {
        match self {
            Self::Bills => "bills",
            Self::Imexs => "imexs",
        }
    }

    /// API endpoint
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Bills => "bill/search",
            Self::Imexs => "bill/imexs",
        }
    }

    /// Response field holding the records
    pub fn data_key(self) -> &'static str {
        match self {
            Self::Bills => "bill",
            Self::Imexs => "imexs",
        }
    }

    /// Short description for listings
    pub fn description(self) -> &'static str {
        match self {
            Self::Bills => "Sales bills for one depot",
            Self::Imexs => "Inventory import/export movements",
        }
    }

    /// Build the request for one day of this stream
    pub fn request(self, date: NaiveDate, config: &ExtractConfig) -> RequestSpec {
        match self {
            Self::Bills => bills_request(date, &config.bills, config.max_pages),
            Self::Imexs => imexs_request(date, &config.imexs, config.max_pages),
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stream {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|stream| stream.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid_value("stream", format!("unknown stream '{s}'")))
    }
}

// ============================================================================
// Dates
// ============================================================================

/// Parse a `YYYY-MM-DD` date
pub fn validate_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate {
        value: value.to_string(),
    })
}

/// Render a date the way the API expects it
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The day before today, local time
pub fn yesterday() -> NaiveDate {
    let today = Local::now().date_naive();
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}

// ============================================================================
// Requests
// ============================================================================

/// Request for one day of sales bills
pub fn bills_request(date: NaiveDate, config: &BillsConfig, max_pages: u32) -> RequestSpec {
    let day = format_date(date);
    RequestSpec::new(Stream::Bills.endpoint(), Stream::Bills.data_key())
        .with_param("depotId", config.depot_id)
        .with_param("mode", config.mode)
        .with_param("fromDate", day.clone())
        .with_param("toDate", day)
        .with_max_pages(max_pages)
}

/// Request for one day of inventory movements
pub fn imexs_request(date: NaiveDate, config: &ImexsConfig, max_pages: u32) -> RequestSpec {
    let day = format_date(date);
    RequestSpec::new(Stream::Imexs.endpoint(), Stream::Imexs.data_key())
        .with_param("icpp", config.icpp)
        .with_param("mode", config.mode)
        .with_param("fromDate", day.clone())
        .with_param("toDate", day)
        .with_max_pages(max_pages)
}
