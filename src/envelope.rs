//! Request envelope for the Nhanh.vn open API
//!
//! Every page request is a form-encoded POST carrying the protocol version,
//! the caller identity, and a `data` field. The `data` field is the page's
//! parameter mapping serialized as a JSON *string*, not as separate form
//! fields.
//!
//! The JSON blob is rendered the way the upstream integration always sent it:
//! `", "` and `": "` separators, keys in insertion order, non-ASCII escaped
//! as `\uXXXX`.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::JsonObject;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// Form field carrying the protocol version
pub const FIELD_VERSION: &str = "version";
/// Form field carrying the application id
pub const FIELD_APP_ID: &str = "appId";
/// Form field carrying the business id
pub const FIELD_BUSINESS_ID: &str = "businessId";
/// Form field carrying the access token
pub const FIELD_ACCESS_TOKEN: &str = "accessToken";
/// Form field carrying the JSON-encoded parameters
pub const FIELD_DATA: &str = "data";

/// Ordered form fields of one request
pub type FormFields = Vec<(&'static str, String)>;

/// Build the form fields for one request
pub fn build_envelope(api: &ApiConfig, data: &JsonObject) -> Result<FormFields> {
    Ok(vec![
        (FIELD_VERSION, api.version.clone()),
        (FIELD_APP_ID, api.app_id.clone()),
        (FIELD_BUSINESS_ID, api.business_id.clone()),
        (FIELD_ACCESS_TOKEN, api.access_token.clone()),
        (FIELD_DATA, encode_data(data)?),
    ])
}

/// Serialize a parameter mapping into the `data` blob
pub fn encode_data(data: &JsonObject) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
    data.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| Error::decode(format!("Non UTF-8 data blob: {e}")))
}

/// Spaced separators, ASCII-only output
#[derive(Debug, Clone, Copy, Default)]
struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{unit:04x}")?;
                }
            }
        }
        Ok(())
    }
}
