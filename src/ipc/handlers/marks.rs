use std::collections::BTreeMap;

use serde_json::json;

use crate::domain::{marks, Term};
use crate::ipc::error::ok;
use crate::ipc::helpers::{get_required_str, parse_actor, require_store, HandlerErr};
use crate::ipc::types::{AppState, Request};

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let resp = match req.method.as_str() {
        "marks.get" => handle_get(state, req),
        "marks.isTermFilled" => handle_is_term_filled(state, req),
        "marks.submit" => handle_submit(state, req),
        _ => return None,
    };
    Some(resp)
}

fn parse_term(params: &serde_json::Value) -> Result<Term, HandlerErr> {
    let raw = get_required_str(params, "term")?;
    Term::parse(&raw).ok_or_else(|| HandlerErr::bad_params(format!("unknown term: {}", raw)))
}

fn parse_subjects(params: &serde_json::Value) -> Result<BTreeMap<String, f64>, HandlerErr> {
    let obj = params
        .get("subjects")
        .and_then(|v| v.as_object())
        .ok_or_else(|| HandlerErr::bad_params("subjects must be an object of scores"))?;
    if obj.is_empty() {
        return Err(HandlerErr::bad_params("subjects must not be empty"));
    }
    obj.iter()
        .map(|(subject, v)| {
            v.as_f64()
                .map(|score| (subject.clone(), score))
                .ok_or_else(|| {
                    HandlerErr::bad_params(format!("score for {} must be a number", subject))
                })
        })
        .collect()
}

fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let student_id = get_required_str(&req.params, "studentId")?;
        let store = require_store(state)?;
        let records = marks::get_marks(store, &student_id)?;
        Ok(json!({ "marks": records }))
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

fn handle_is_term_filled(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let student_id = get_required_str(&req.params, "studentId")?;
        let term = parse_term(&req.params)?;
        let store = require_store(state)?;
        let filled = marks::is_term_filled(store, &student_id, term)?;
        Ok(json!({ "filled": filled }))
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}

fn handle_submit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let mut run = || -> Result<serde_json::Value, HandlerErr> {
        let actor = parse_actor(&req.params)?;
        let student_id = get_required_str(&req.params, "studentId")?;
        let term = parse_term(&req.params)?;
        let subjects = parse_subjects(&req.params)?;
        let store = require_store(state)?;
        let record = marks::submit_marks(store, &student_id, term, subjects, &actor)?;
        Ok(serde_json::to_value(record).unwrap_or_default())
    };
    match run() {
        Ok(v) => ok(&req.id, v),
        Err(e) => e.response(&req.id),
    }
}
