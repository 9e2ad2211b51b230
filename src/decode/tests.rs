//! Tests for decoder module

use super::*;
use crate::error::Error;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

// ============================================================================
// parse_page Tests
// ============================================================================

#[test]
fn test_parse_page_success() {
    let page = parse_page(r#"{"code": 1, "data": {"bill": [], "totalPages": 1}}"#).unwrap();
    assert_eq!(page.code, Some(1));
    assert!(page.is_success());
    assert!(!page.has_empty_data());
    assert!(page.data_object().unwrap().contains_key("bill"));
}

#[test]
fn test_parse_page_missing_fields() {
    let page = parse_page("{}").unwrap();
    assert_eq!(page.code, None);
    assert!(!page.is_success());
    assert_eq!(page.data, Value::Null);
    assert!(page.has_empty_data());
}

#[test]
fn test_parse_page_non_integer_code() {
    let page = parse_page(r#"{"code": "1", "data": {"x": 1}}"#).unwrap();
    assert_eq!(page.code, None);
    assert!(!page.is_success());
}

#[test]
fn test_parse_page_error_code_with_messages() {
    let page = parse_page(r#"{"code": 0, "messages": ["Invalid token"], "data": {}}"#).unwrap();
    assert_eq!(page.code, Some(0));
    assert!(!page.is_success());
    assert!(page.has_empty_data());
}

#[test_case("not json" ; "garbage")]
#[test_case("" ; "empty body")]
#[test_case(r#"{"code": 1, "data": "#; "truncated")]
#[test_case("[1, 2, 3]" ; "array root")]
#[test_case(r#"{"code": 1, "data": [{"id": 1}]}"# ; "array data")]
#[test_case(r#"{"code": 1, "data": "oops"}"# ; "string data")]
fn test_parse_page_decode_errors(body: &str) {
    let err = parse_page(body).unwrap_err();
    assert!(matches!(err, Error::Decode { .. }), "got {err:?}");
}

#[test_case(json!([]) ; "empty array data")]
#[test_case(json!("") ; "empty string data")]
#[test_case(json!(null) ; "null data")]
#[test_case(json!(false) ; "false data")]
fn test_parse_page_accepts_empty_non_object_data(data: Value) {
    let body = json!({"code": 1, "data": data}).to_string();
    let page = parse_page(&body).unwrap();
    assert!(page.has_empty_data());
    assert!(page.data_object().is_none());
}

// ============================================================================
// is_empty_payload Tests
// ============================================================================

#[test_case(json!(null), true ; "null")]
#[test_case(json!({}), true ; "empty object")]
#[test_case(json!([]), true ; "empty array")]
#[test_case(json!(""), true ; "empty string")]
#[test_case(json!(false), true ; "false")]
#[test_case(json!(0), true ; "zero")]
#[test_case(json!(0.0), true ; "zero float")]
#[test_case(json!({"a": 1}), false ; "object")]
#[test_case(json!([0]), false ; "array")]
#[test_case(json!("x"), false ; "string")]
#[test_case(json!(true), false ; "true")]
#[test_case(json!(3), false ; "number")]
fn test_is_empty_payload(value: Value, expected: bool) {
    assert_eq!(is_empty_payload(&value), expected);
}

// ============================================================================
// extract_records Tests
// ============================================================================

fn data(value: Value) -> crate::types::JsonObject {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_extract_records_list() {
    let data = data(json!({"bill": [{"id": 1}, {"id": 2}]}));
    let records = extract_records(&data, "bill");

    assert_eq!(records.len(), 2);
    assert_eq!(
        records,
        PageRecords::List(vec![json!({"id": 1}), json!({"id": 2})])
    );
}

#[test]
fn test_extract_records_map_values_in_document_order() {
    let body = r#"{"bill": {"903": {"id": 903}, "12": {"id": 12}, "455": {"id": 455}}}"#;
    let data: Value = serde_json::from_str(body).unwrap();
    let records = extract_records(data.as_object().unwrap(), "bill");

    assert_eq!(
        records.into_records(),
        vec![json!({"id": 903}), json!({"id": 12}), json!({"id": 455})]
    );
}

#[test]
fn test_extract_records_empty_containers() {
    let list = extract_records(&data(json!({"bill": []})), "bill");
    assert_eq!(list, PageRecords::List(vec![]));
    assert!(list.is_empty());

    let map = extract_records(&data(json!({"bill": {}})), "bill");
    assert_eq!(map, PageRecords::Map(vec![]));
    assert!(map.is_empty());
}

#[test]
fn test_extract_records_missing_key() {
    let records = extract_records(&data(json!({"imexs": []})), "bill");
    assert_eq!(records, PageRecords::Missing);
    assert!(records.into_records().is_empty());
}

#[test_case(json!("oops"), "string")]
#[test_case(json!(42), "number")]
#[test_case(json!(null), "null")]
#[test_case(json!(true), "boolean")]
fn test_extract_records_unexpected(value: Value, type_name: &'static str) {
    let records = extract_records(&data(json!({"bill": value})), "bill");
    assert_eq!(records, PageRecords::Unexpected(type_name));
    assert_eq!(records.len(), 0);
}
