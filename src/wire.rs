//! Key translation between the in-memory record representation (camelCase)
//! and the persistence API's wire representation (snake_case). Table-driven
//! from the field registry so the two can never disagree on coverage.

use serde_json::{Map, Value};

use crate::model::FIELDS;

fn wire_name(memory: &str) -> Option<&'static str> {
    if memory == "id" {
        return Some("id");
    }
    FIELDS.iter().find(|f| f.name == memory).map(|f| f.wire)
}

fn memory_name(wire: &str) -> Option<&'static str> {
    if wire == "id" {
        return Some("id");
    }
    FIELDS.iter().find(|f| f.wire == wire).map(|f| f.name)
}

fn rename_keys(value: &Value, rename: fn(&str) -> Option<&'static str>) -> Value {
    match value.as_object() {
        Some(obj) => {
            let mut out = Map::with_capacity(obj.len());
            for (key, v) in obj {
                // Unknown keys pass through untouched so a newer server
                // cannot break an older client.
                match rename(key) {
                    Some(mapped) => out.insert(mapped.to_string(), v.clone()),
                    None => out.insert(key.clone(), v.clone()),
                };
            }
            Value::Object(out)
        }
        None => value.clone(),
    }
}

/// Memory-keyed record object -> wire-keyed object.
pub fn to_wire(record: &Value) -> Value {
    rename_keys(record, wire_name)
}

/// Wire-keyed record object -> memory-keyed object.
pub fn from_wire(record: &Value) -> Value {
    rename_keys(record, memory_name)
}
