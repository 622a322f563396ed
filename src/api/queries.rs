// src/api/queries.rs
//
// Document query builders. The REST API takes each query as a JSON-encoded
// string in a repeated `queries[]` parameter.

use serde_json::{json, Value};

pub fn equal(attribute: &str, value: impl Into<Value>) -> String {
    json!({ "method": "equal", "attribute": attribute, "values": [value.into()] }).to_string()
}

pub fn search(attribute: &str, term: &str) -> String {
    json!({ "method": "search", "attribute": attribute, "values": [term] }).to_string()
}

pub fn greater_than(attribute: &str, value: impl Into<Value>) -> String {
    json!({ "method": "greaterThan", "attribute": attribute, "values": [value.into()] })
        .to_string()
}

pub fn order_desc(attribute: &str) -> String {
    json!({ "method": "orderDesc", "attribute": attribute }).to_string()
}

pub fn limit(count: u64) -> String {
    json!({ "method": "limit", "values": [count] }).to_string()
}
