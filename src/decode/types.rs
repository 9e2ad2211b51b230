//! Decoder types
//!
//! Defines the decoded page and the record shapes found under a data key.

use crate::types::{ExtractedRecord, JsonObject, JsonValue};

/// API status code meaning success
pub const SUCCESS_CODE: i64 = 1;

/// Decoded body of one page response
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    /// API status code (`None` when absent or not an integer)
    pub code: Option<i64>,
    /// The `data` payload, `Null` when absent
    pub data: JsonValue,
}

impl PageResponse {
    /// Check whether the API reported success
    pub fn is_success(&self) -> bool {
        self.code == Some(SUCCESS_CODE)
    }

    /// Check whether the data payload is empty or absent
    pub fn has_empty_data(&self) -> bool {
        super::is_empty_payload(&self.data)
    }

    /// The data payload as an object, if it is one
    pub fn data_object(&self) -> Option<&JsonObject> {
        self.data.as_object()
    }
}

/// Records found under the data key of one page
#[derive(Debug, Clone, PartialEq)]
pub enum PageRecords {
    /// The key held a list; elements in list order
    List(Vec<ExtractedRecord>),
    /// The key held a mapping; values in document order
    Map(Vec<ExtractedRecord>),
    /// The key was not present
    Missing,
    /// The key held something else (JSON type name)
    Unexpected(&'static str),
}

impl PageRecords {
    /// Number of records this page contributes
    pub fn len(&self) -> usize {
        match self {
            Self::List(records) | Self::Map(records) => records.len(),
            Self::Missing | Self::Unexpected(_) => 0,
        }
    }

    /// Check whether this page contributes no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take the records this page contributes
    pub fn into_records(self) -> Vec<ExtractedRecord> {
        match self {
            Self::List(records) | Self::Map(records) => records,
            Self::Missing | Self::Unexpected(_) => Vec::new(),
        }
    }
}
