use serde_json::json;

use crate::domain::students::{self, ListFilter};
use crate::domain::{is_known_class, Category, StudentDraft};
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{
    get_optional_str, get_required_str, parse_actor, require_store, HandlerErr,
};
use crate::ipc::types::{AppState, Request};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let resp = match req.method.as_str() {
        "students.create" => handle_create(state, req),
        "students.update" => handle_update(state, req),
        "students.delete" => handle_delete(state, req),
        "students.list" => handle_list(state, req),
        "students.findByRoll" => handle_find_by_roll(state, req),
        _ => return None,
    };
    Some(resp)
}

/// Form-level field rules, enforced before the domain sees the draft.
fn parse_draft(params: &serde_json::Value) -> Result<StudentDraft, HandlerErr> {
    let name = get_required_str(params, "name")?;
    if name.trim().is_empty() {
        return Err(HandlerErr::bad_params("name must not be empty"));
    }

    let roll_number = get_required_str(params, "rollNumber")?;
    if roll_number.is_empty() || !roll_number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HandlerErr::bad_params("rollNumber must be digits"));
    }

    let class = get_required_str(params, "class")?;
    if !is_known_class(&class) {
        return Err(HandlerErr::bad_params(format!("unknown class: {}", class)));
    }

    let category = get_required_str(params, "category")?;
    let Some(category) = Category::parse(&category) else {
        return Err(HandlerErr::bad_params("category must be CK or MTQ"));
    };

    let pen_number = get_optional_str(params, "penNumber").filter(|s| !s.is_empty());
    if let Some(pen) = &pen_number {
        if pen.len() != 11 || !pen.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HandlerErr::bad_params("penNumber must be exactly 11 digits"));
        }
    }

    let phone = get_optional_str(params, "phone").filter(|s| !s.is_empty());
    if let Some(phone) = &phone {
        if phone.len() != 10 || !phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HandlerErr::bad_params("phone must be exactly 10 digits"));
        }
    }

    let sr_number = get_optional_str(params, "srNumber").filter(|s| !s.is_empty());
    if let Some(sr) = &sr_number {
        if !sr.bytes().all(|b| b.is_ascii_digit()) {
            return Err(HandlerErr::bad_params("srNumber must be digits"));
        }
    }

    Ok(StudentDraft {
        name,
        roll_number,
        class,
        father_name: get_required_str(params, "fatherName")?,
        mother_name: get_required_str(params, "motherName")?,
        category,
        address: get_required_str(params, "address")?,
        sr_number,
        pen_number,
        phone,
    })
}

fn handle_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let actor = parse_actor(&req.params)?;
        let draft = parse_draft(&req.params)?;
        let store = require_store(state)?;
        let record = students::add(store, draft, &actor)?;
        Ok(serde_json::to_value(record).unwrap_or_default())
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let actor = parse_actor(&req.params)?;
        let id = get_required_str(&req.params, "id")?;
        let draft = parse_draft(&req.params)?;
        let store = require_store(state)?;
        let record = students::update(store, &id, draft, &actor)?;
        Ok(serde_json::to_value(record).unwrap_or_default())
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let actor = parse_actor(&req.params)?;
        let id = get_required_str(&req.params, "id")?;
        let store = require_store(state)?;
        students::delete(store, &id, &actor)?;
        Ok(json!({ "deleted": true }))
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let filter = ListFilter {
            class: get_optional_str(&req.params, "class"),
            search: get_optional_str(&req.params, "search"),
        };
        let store = require_store(state)?;
        let records = students::list(store, &filter)?;
        Ok(json!({ "students": records }))
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

fn handle_find_by_roll(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<Option<serde_json::Value>, HandlerErr> {
        let class = get_required_str(&req.params, "class")?;
        let roll_number = get_required_str(&req.params, "rollNumber")?;
        let store = require_store(state)?;
        Ok(students::find_by_class_and_roll(store, &class, &roll_number)?
            .map(|s| serde_json::to_value(s).unwrap_or_default()))
    };
    match run() {
        Ok(Some(v)) => ok(&req.id, v),
        Ok(None) => err(
            &req.id,
            "not_found",
            "no student with this roll number in the selected class",
            None,
        ),
        Err(e) => e.response(&req.id),
    }
}
