use std::path::PathBuf;

use serde_json::json;

use crate::db;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::get_required_str;
use crate::ipc::types::{AppState, Request};
use crate::store::sqlite::SqliteStore;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "ping" => Some(ok(&req.id, json!({ "pong": true }))),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = match get_required_str(&req.params, "path") {
        Ok(v) => PathBuf::from(v),
        Err(e) => return e.response(&req.id),
    };

    let conn = match db::open_db(&path) {
        Ok(c) => c,
        Err(e) => return err(&req.id, "workspace_open_failed", e.to_string(), None),
    };

    tracing::info!(workspace = %path.display(), "workspace selected");
    state.store = Some(SqliteStore::new(conn));
    state.workspace = Some(path.clone());
    ok(&req.id, json!({ "workspace": path.to_string_lossy() }))
}
