use serde_json::json;

use crate::domain::identity;
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, require_store, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::Store;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.resolve" => Some(handle_resolve(state, req)),
        "teachers.list" => Some(handle_teachers_list(state, req)),
        _ => None,
    }
}

/// Called on every login event. Deliberately never cached: the assignment
/// table may have changed since the last session.
fn handle_resolve(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let email = get_required_str(&req.params, "email")?;
        if email.trim().is_empty() {
            return Err(HandlerErr::bad_params("email must not be empty"));
        }
        let store = require_store(state)?;
        let ctx = identity::resolve_role(store, &email)?;
        Ok(serde_json::to_value(ctx).unwrap_or_default())
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

fn handle_teachers_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let store = require_store(state)?;
        let teachers = store.teachers().map_err(|e| HandlerErr {
            code: "storage_failed",
            message: e.to_string(),
            details: None,
        })?;
        Ok(json!({ "teachers": teachers }))
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}
