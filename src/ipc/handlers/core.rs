use serde_json::json;

use crate::api::{HttpApi, MemoryApi};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::get_str;
use crate::ipc::types::{AppState, Request};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "app.ping" => Some(ok(&req.id, json!({ "pong": true }))),
        "app.version" => Some(ok(
            &req.id,
            json!({ "version": env!("CARGO_PKG_VERSION") }),
        )),
        "backend.select" => Some(handle_backend_select(state, req)),
        _ => None,
    }
}

/// Choose the persistence backend. Switching drops the session, the loaded
/// collection and any in-progress draft: credentials and records from one
/// backend mean nothing to another.
fn handle_backend_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mode = match get_str(&req.params, "mode") {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.message, None),
    };

    match mode.as_str() {
        "http" => {
            let base_url = match get_str(&req.params, "baseUrl") {
                Ok(v) => v,
                Err(e) => return err(&req.id, "bad_params", e.message, None),
            };
            log::info!("selecting http backend at {}", base_url);
            state.api = Some(Box::new(HttpApi::new(&base_url)));
        }
        "memory" => {
            log::info!("selecting in-process memory backend");
            state.api = Some(Box::new(MemoryApi::new()));
        }
        other => {
            return err(
                &req.id,
                "bad_params",
                format!("unknown backend mode: {}", other),
                None,
            )
        }
    }

    state.session.clear();
    state.store = Default::default();
    state.draft = None;
    state.editing_id = None;

    ok(&req.id, json!({ "mode": mode }))
}
