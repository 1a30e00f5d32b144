use serde_json::json;

use crate::domain::students::{self, ListFilter};
use crate::export;
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_optional_str, require_store, HandlerErr};
use crate::ipc::types::{AppState, Request};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "export.studentsCsv" => Some(handle_students_csv(state, req)),
        _ => None,
    }
}

fn handle_students_csv(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let filter = ListFilter {
            class: get_optional_str(&req.params, "class"),
            search: None,
        };
        let include_contact = req
            .params
            .get("includeContact")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let store = require_store(state)?;
        let records = students::list(store, &filter)?;
        let csv = export::students_csv(&records, include_contact);
        Ok(json!({ "csv": csv, "rows": records.len() }))
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}
