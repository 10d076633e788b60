use serde_json::json;

use crate::ipc::error::{api_err, err, ok};
use crate::ipc::helpers::get_str;
use crate::ipc::types::{AppState, Request};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "session.login" => Some(handle_login(state, req)),
        "session.logout" => Some(handle_logout(state, req)),
        "session.status" => Some(ok(
            &req.id,
            json!({ "authenticated": state.session.is_authenticated() }),
        )),
        _ => None,
    }
}

fn handle_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(api) = state.api.as_mut() else {
        return err(&req.id, "no_backend", "select a backend first", None);
    };
    let username = match get_str(&req.params, "username") {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.message, None),
    };
    let password = match get_str(&req.params, "password") {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.message, None),
    };

    match api.login(&username, &password) {
        Ok(tokens) => {
            state.session.accept(tokens);
            ok(&req.id, json!({ "authenticated": true }))
        }
        Err(e) => {
            log::warn!("login failed: {}", e);
            api_err(&req.id, &e, None)
        }
    }
}

fn handle_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    state.session.clear();
    ok(&req.id, json!({ "authenticated": false }))
}
