//! Response decoder module
//!
//! Parses page responses and normalizes the records they carry.
//!
//! # Overview
//!
//! Every page response is a JSON object with an integer `code` and an
//! endpoint-specific `data` object. Records live under a caller-chosen key
//! inside `data`, either as a list or as a mapping keyed by record id.
//! This module turns both shapes into a flat list.

mod decoders;
mod types;

pub use decoders::{extract_records, is_empty_payload, parse_page};
pub use types::{PageRecords, PageResponse, SUCCESS_CODE};

#[cfg(test)]
mod tests;
