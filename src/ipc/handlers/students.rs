use serde_json::json;

use crate::api::ApiError;
use crate::ipc::error::{api_err, err, ok};
use crate::ipc::helpers::get_i64;
use crate::ipc::types::{AppState, Request};
use crate::view;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.loadAll" => Some(handle_load_all(state, req)),
        "students.rows" => Some(handle_rows(state, req)),
        "students.get" => Some(handle_get(state, req)),
        "students.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}

fn handle_load_all(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(api) = state.api.as_mut() else {
        return err(&req.id, "no_backend", "select a backend first", None);
    };
    match state.store.load_all(api.as_mut(), &state.session) {
        Ok(count) => ok(&req.id, json!({ "count": count })),
        // a dead credential on load sends the UI back to the login screen
        Err(e @ ApiError::Auth(_)) => api_err(&req.id, &e, Some(json!({ "redirect": "login" }))),
        Err(e) => {
            log::warn!("loadAll failed: {}", e);
            api_err(&req.id, &e, None)
        }
    }
}

fn handle_rows(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({ "rows": view::rows(state.store.records()) }),
    )
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match get_i64(&req.params, "id") {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.message, None),
    };
    match state.store.get(id) {
        Some(record) => match serde_json::to_value(record) {
            Ok(student) => ok(&req.id, json!({ "student": student })),
            Err(e) => err(&req.id, "bad_params", e.to_string(), None),
        },
        None => err(&req.id, "not_found", "student not found", None),
    }
}

/// Delete is gated on explicit confirmation. Declining (or omitting) the
/// confirm flag is a successful no-op: no remote call, collection unchanged.
fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let id = match get_i64(&req.params, "id") {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.message, None),
    };
    let confirmed = req
        .params
        .get("confirm")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    if !confirmed {
        return ok(&req.id, json!({ "deleted": false, "cancelled": true }));
    }

    let Some(api) = state.api.as_mut() else {
        return err(&req.id, "no_backend", "select a backend first", None);
    };
    match state.store.delete(api.as_mut(), &state.session, id) {
        Ok(()) => ok(&req.id, json!({ "deleted": true })),
        Err(e) => {
            log::warn!("delete {} failed: {}", id, e);
            api_err(&req.id, &e, None)
        }
    }
}
