use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{NoticeRecord, Role};
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, parse_actor, require_store, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::store::Store;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let resp = match req.method.as_str() {
        "notices.list" => handle_list(state, req),
        "notices.create" => handle_create(state, req),
        "notices.delete" => handle_delete(state, req),
        _ => return None,
    };
    Some(resp)
}

fn require_admin(params: &serde_json::Value) -> Result<(), HandlerErr> {
    let actor = parse_actor(params)?;
    if actor.role != Role::Admin {
        return Err(HandlerErr {
            code: "forbidden",
            message: format!("{} may not manage notices", actor.role),
            details: None,
        });
    }
    Ok(())
}

fn storage_err(e: anyhow::Error) -> HandlerErr {
    HandlerErr {
        code: "storage_failed",
        message: e.to_string(),
        details: None,
    }
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let store = require_store(state)?;
        let notices = store.notices().map_err(storage_err)?;
        Ok(json!({ "notices": notices }))
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        require_admin(&req.params)?;
        let title = get_required_str(&req.params, "title")?;
        let content = get_required_str(&req.params, "content")?;
        if title.trim().is_empty() || content.trim().is_empty() {
            return Err(HandlerErr::bad_params("title and content must not be empty"));
        }

        let record = NoticeRecord {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            created_at: Utc::now().to_rfc3339(),
        };
        let store = require_store(state)?;
        store.put_notice(&record).map_err(storage_err)?;
        Ok(serde_json::to_value(record).unwrap_or_default())
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        require_admin(&req.params)?;
        let id = get_required_str(&req.params, "id")?;
        let store = require_store(state)?;
        if !store.delete_notice(&id).map_err(storage_err)? {
            return Err(HandlerErr {
                code: "not_found",
                message: "notice not found".to_string(),
                details: None,
            });
        }
        Ok(json!({ "deleted": true }))
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}
