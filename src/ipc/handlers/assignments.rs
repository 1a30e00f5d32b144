use std::collections::BTreeMap;

use serde_json::json;

use crate::domain::{assignments, is_known_class, UNASSIGNED};
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, parse_actor, require_store, HandlerErr};
use crate::ipc::types::{AppState, Request};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let resp = match req.method.as_str() {
        "assignments.get" => handle_get(state, req),
        "assignments.set" => handle_set(state, req),
        "assignments.saveAll" => handle_save_all(state, req),
        _ => return None,
    };
    Some(resp)
}

fn validate_class(class: &str) -> Result<(), HandlerErr> {
    if class == UNASSIGNED || is_known_class(class) {
        Ok(())
    } else {
        Err(HandlerErr::bad_params(format!("unknown class: {}", class)))
    }
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let teacher_id = get_required_str(&req.params, "teacherId")?;
        let store = require_store(state)?;
        let class = assignments::assigned_class(store, &teacher_id)?;
        Ok(json!({ "class": class }))
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

fn handle_set(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let actor = parse_actor(&req.params)?;
        let teacher_id = get_required_str(&req.params, "teacherId")?;
        let class = get_required_str(&req.params, "class")?;
        validate_class(&class)?;
        let store = require_store(state)?;
        assignments::set_assignment(store, &teacher_id, &class, &actor)?;
        Ok(json!({ "class": assignments::assigned_class(store, &teacher_id)? }))
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

fn handle_save_all(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let actor = parse_actor(&req.params)?;
        let obj = req
            .params
            .get("assignments")
            .and_then(|v| v.as_object())
            .ok_or_else(|| HandlerErr::bad_params("assignments must be an object"))?;

        let mut map = BTreeMap::new();
        for (teacher_id, v) in obj {
            let class = v.as_str().ok_or_else(|| {
                HandlerErr::bad_params(format!("assignment for {} must be a string", teacher_id))
            })?;
            validate_class(class)?;
            map.insert(teacher_id.clone(), class.to_string());
        }

        let store = require_store(state)?;
        let saved = assignments::save_all(store, &map, &actor)?;
        Ok(json!({ "saved": saved }))
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}
