use std::collections::BTreeMap;

use crate::domain::{Actor, DomainError, DomainResult, MarkRecord, Role, Term};
use crate::store::Store;

pub fn is_term_filled(store: &dyn Store, student_id: &str, term: Term) -> DomainResult<bool> {
    Ok(store.mark(student_id, term)?.is_some())
}

/// All terms recorded for a student, unordered.
pub fn get_marks(store: &dyn Store, student_id: &str) -> DomainResult<Vec<MarkRecord>> {
    Ok(store.marks_for_student(student_id)?)
}

/// Per-(student, term) state machine: Empty -> Filled for any permitted role,
/// Filled -> Filled (overwrite) for admin only. There is no way back to Empty.
///
/// Error precedence: score range, then student lookup, then the term lock,
/// then the role gate. A teacher re-submitting a filled term sees
/// `AlreadyFilled` even if they also lost visibility in the meantime.
pub fn submit_marks(
    store: &mut dyn Store,
    student_id: &str,
    term: Term,
    subjects: BTreeMap<String, f64>,
    actor: &Actor,
) -> DomainResult<MarkRecord> {
    for (subject, &score) in &subjects {
        if !(0.0..=100.0).contains(&score) {
            return Err(DomainError::InvalidScore {
                subject: subject.clone(),
                score,
            });
        }
    }

    let Some(student) = store.student(student_id)? else {
        return Err(DomainError::NotFound("student"));
    };

    if store.mark(student_id, term)?.is_some() && actor.role != Role::Admin {
        return Err(DomainError::AlreadyFilled(term));
    }
    if !actor.may_act_on_class(&student.class) {
        return Err(DomainError::Forbidden(actor.role));
    }

    let record = MarkRecord {
        student_id: student_id.to_string(),
        term,
        subjects,
    };
    store.put_mark(&record)?;
    Ok(record)
}
