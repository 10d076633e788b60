use serde_json::json;
use std::path::PathBuf;

use crate::export::export_students_bundle;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::get_str;
use crate::ipc::types::{AppState, Request};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.exportBundle" => Some(handle_export(state, req)),
        _ => None,
    }
}

fn handle_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let out_path = match get_str(&req.params, "outPath") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return err(&req.id, "bad_params", e.message, None),
    };
    match export_students_bundle(state.store.records(), &out_path) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "bundleFormat": summary.bundle_format,
                "recordCount": summary.record_count,
                "outPath": out_path.to_string_lossy(),
            }),
        ),
        Err(e) => err(&req.id, "io_error", e.to_string(), None),
    }
}
