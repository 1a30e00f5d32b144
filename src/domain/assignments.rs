use std::collections::BTreeMap;

use crate::domain::{Actor, DomainError, DomainResult, Role, UNASSIGNED};
use crate::store::Store;

/// Lookup with default: unknown teachers simply read as unassigned.
pub fn assigned_class(store: &dyn Store, teacher_id: &str) -> DomainResult<String> {
    Ok(store
        .assignment(teacher_id)?
        .unwrap_or_else(|| UNASSIGNED.to_string()))
}

/// Every class currently mapped to the teacher. At most one entry today, but
/// callers treat it as a set.
pub fn classes_for_teacher(store: &dyn Store, teacher_id: &str) -> DomainResult<Vec<String>> {
    let classes = store
        .assignments()?
        .into_iter()
        .filter(|(tid, _)| tid == teacher_id)
        .map(|(_, class)| class)
        .collect();
    Ok(classes)
}

/// Admin only. The `Unassigned` sentinel removes the entry; any other value
/// sets or overwrites it.
pub fn set_assignment(
    store: &mut dyn Store,
    teacher_id: &str,
    class: &str,
    actor: &Actor,
) -> DomainResult<()> {
    if actor.role != Role::Admin {
        return Err(DomainError::Forbidden(actor.role));
    }
    if class == UNASSIGNED {
        store.remove_assignment(teacher_id)?;
    } else {
        store.put_assignment(teacher_id, class)?;
    }
    Ok(())
}

/// Wholesale replace of the assignment table, admin only. Sentinel entries in
/// the incoming map count as removals. Atomic: a forbidden call leaves the
/// table untouched, and the store applies the replace transactionally.
pub fn save_all(
    store: &mut dyn Store,
    assignments: &BTreeMap<String, String>,
    actor: &Actor,
) -> DomainResult<usize> {
    if actor.role != Role::Admin {
        return Err(DomainError::Forbidden(actor.role));
    }
    let effective: BTreeMap<String, String> = assignments
        .iter()
        .filter(|(_, class)| class.as_str() != UNASSIGNED)
        .map(|(t, c)| (t.clone(), c.clone()))
        .collect();
    store.replace_assignments(&effective)?;
    Ok(effective.len())
}
