use serde_json::{json, Value};
use std::path::Path;

use crate::draft::Draft;
use crate::ipc::error::{api_err, err, ok};
use crate::ipc::helpers::{get_bool, get_opt_i64, get_opt_str, get_str};
use crate::ipc::types::{AppState, Request};
use crate::validate;
use crate::view;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "form.init" => Some(handle_init(state, req)),
        "form.get" => Some(handle_get(state, req)),
        "form.setField" => Some(handle_set_field(state, req)),
        "form.toggleSection" => Some(handle_toggle_section(state, req)),
        "form.setImage" => Some(handle_set_image(state, req)),
        "form.cancel" => Some(handle_cancel(state, req)),
        "form.submit" => Some(handle_submit(state, req)),
        _ => None,
    }
}

/// Start a create (blank draft) or an edit (draft seeded from a loaded
/// record, identified by `studentId`).
fn handle_init(state: &mut AppState, req: &Request) -> serde_json::Value {
    match get_opt_i64(&req.params, "studentId") {
        Some(id) => {
            let Some(record) = state.store.get(id) else {
                return err(&req.id, "not_found", "student not found", None);
            };
            let draft = match Draft::seeded(record) {
                Ok(d) => d,
                Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
            };
            state.draft = Some(draft);
            state.editing_id = Some(id);
        }
        None => {
            state.draft = Some(Draft::new());
            state.editing_id = None;
        }
    }
    ok(
        &req.id,
        json!({ "editing": state.editing_id.is_some() }),
    )
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(draft) = state.draft.as_ref() else {
        return err(&req.id, "no_form", "call form.init first", None);
    };
    ok(
        &req.id,
        json!({
            "fields": Value::Object(draft.as_map().clone()),
            "editing": state.editing_id.is_some(),
        }),
    )
}

fn handle_set_field(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(draft) = state.draft.as_mut() else {
        return err(&req.id, "no_form", "call form.init first", None);
    };
    let field = match get_str(&req.params, "field") {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.message, None),
    };
    let value = match get_str(&req.params, "value") {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.message, None),
    };
    match draft.set_field(&field, &value) {
        Ok(()) => ok(&req.id, json!({ "field": field })),
        Err(e) => err(&req.id, "bad_params", e.to_string(), None),
    }
}

fn handle_toggle_section(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(draft) = state.draft.as_mut() else {
        return err(&req.id, "no_form", "call form.init first", None);
    };
    let flag = match get_str(&req.params, "flag") {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.message, None),
    };
    let value = match get_bool(&req.params, "value") {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.message, None),
    };
    match draft.toggle_section(&flag, value) {
        Ok(()) => ok(&req.id, json!({ "flag": flag, "value": value })),
        Err(e) => err(&req.id, "bad_params", e.to_string(), None),
    }
}

/// Read a picked image file into the named field. No path means the picker
/// was dismissed; the field keeps its current value.
fn handle_set_image(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(draft) = state.draft.as_mut() else {
        return err(&req.id, "no_form", "call form.init first", None);
    };
    let field = match get_str(&req.params, "field") {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.message, None),
    };
    let path = get_opt_str(&req.params, "path");

    match draft.set_image(&field, path.as_deref().map(Path::new)) {
        Ok(Some(digest)) => ok(&req.id, json!({ "changed": true, "sha256": digest })),
        Ok(None) => ok(&req.id, json!({ "changed": false })),
        Err(e) => err(&req.id, "io_error", e.to_string(), None),
    }
}

fn handle_cancel(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.draft = None;
    state.editing_id = None;
    ok(&req.id, json!({ "cancelled": true }))
}

/// The submission path: validation gate first, then create-or-update against
/// the store. On any failure the draft is preserved so the user can fix and
/// resubmit.
fn handle_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(draft) = state.draft.as_ref() else {
        return err(&req.id, "no_form", "call form.init first", None);
    };

    if let Err(e) = validate::check(draft) {
        let details = match &e {
            validate::ValidationError::MissingFields(labels) => {
                Some(json!({ "missing": labels }))
            }
            validate::ValidationError::IncompleteSection(section) => {
                Some(json!({ "section": section.flag() }))
            }
            validate::ValidationError::BadFormat(_) => None,
        };
        return err(&req.id, "validation_failed", e.message(), details);
    }

    let record = match draft.to_record() {
        Ok(r) => r,
        Err(e) => return err(&req.id, "validation_failed", e.to_string(), None),
    };

    let Some(api) = state.api.as_mut() else {
        return err(&req.id, "no_backend", "select a backend first", None);
    };

    let result = match state.editing_id {
        Some(id) => state
            .store
            .update(api.as_mut(), &state.session, id, &record),
        None => state.store.create(api.as_mut(), &state.session, &record),
    };

    match result {
        Ok(saved) => {
            let created = state.editing_id.is_none();
            state.draft = None;
            state.editing_id = None;
            ok(
                &req.id,
                json!({
                    "created": created,
                    "studentId": saved.id,
                    "row": view::row(&saved),
                }),
            )
        }
        Err(e) => {
            log::warn!("submit failed: {}", e);
            api_err(&req.id, &e, None)
        }
    }
}
