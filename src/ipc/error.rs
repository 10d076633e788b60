use serde_json::json;

use crate::api::ApiError;

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

/// Remote-call failures carry their own code; the server's detail is the
/// user-visible message.
pub fn api_err(id: &str, e: &ApiError, details: Option<serde_json::Value>) -> serde_json::Value {
    err(id, e.code(), e.message(), details)
}
