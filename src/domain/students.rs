use uuid::Uuid;

use crate::domain::{Actor, DomainError, DomainResult, Role, StudentDraft, StudentRecord};
use crate::store::Store;

/// Optional filters for [`list`]; both compose with AND.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub class: Option<String>,
    pub search: Option<String>,
}

/// Admins may add anywhere; teachers only into a class assigned to them.
/// `(class, roll_number)` must be unique across the directory.
pub fn add(store: &mut dyn Store, draft: StudentDraft, actor: &Actor) -> DomainResult<StudentRecord> {
    match actor.role {
        Role::Admin => {}
        Role::Teacher if actor.may_act_on_class(&draft.class) => {}
        role @ (Role::Teacher | Role::Student) => return Err(DomainError::Forbidden(role)),
    }
    ensure_roll_free(store, &draft.class, &draft.roll_number, None)?;

    let record = draft.into_record(Uuid::new_v4().to_string());
    store.put_student(&record)?;
    Ok(record)
}

/// Full-record replace, keeping only the id. Admin only.
pub fn update(
    store: &mut dyn Store,
    id: &str,
    draft: StudentDraft,
    actor: &Actor,
) -> DomainResult<StudentRecord> {
    if actor.role != Role::Admin {
        return Err(DomainError::Forbidden(actor.role));
    }
    if store.student(id)?.is_none() {
        return Err(DomainError::NotFound("student"));
    }
    ensure_roll_free(store, &draft.class, &draft.roll_number, Some(id))?;

    let record = draft.into_record(id.to_string());
    store.put_student(&record)?;
    Ok(record)
}

/// Admin only. The student's marks are intentionally left in place.
pub fn delete(store: &mut dyn Store, id: &str, actor: &Actor) -> DomainResult<()> {
    if actor.role != Role::Admin {
        return Err(DomainError::Forbidden(actor.role));
    }
    if !store.delete_student(id)? {
        return Err(DomainError::NotFound("student"));
    }
    Ok(())
}

/// Exact-match lookup used to resolve a roll number during marks entry.
pub fn find_by_class_and_roll(
    store: &dyn Store,
    class: &str,
    roll_number: &str,
) -> DomainResult<Option<StudentRecord>> {
    let hit = store
        .students()?
        .into_iter()
        .find(|s| s.class == class && s.roll_number == roll_number);
    Ok(hit)
}

pub fn list(store: &dyn Store, filter: &ListFilter) -> DomainResult<Vec<StudentRecord>> {
    let needle = filter.search.as_deref().map(str::to_lowercase);
    let out = store
        .students()?
        .into_iter()
        .filter(|s| filter.class.as_deref().is_none_or(|c| s.class == c))
        .filter(|s| {
            needle.as_deref().is_none_or(|n| {
                s.name.to_lowercase().contains(n) || s.roll_number.to_lowercase().contains(n)
            })
        })
        .collect();
    Ok(out)
}

fn ensure_roll_free(
    store: &dyn Store,
    class: &str,
    roll_number: &str,
    except_id: Option<&str>,
) -> DomainResult<()> {
    let taken = store.students()?.into_iter().any(|s| {
        s.class == class && s.roll_number == roll_number && Some(s.id.as_str()) != except_id
    });
    if taken {
        return Err(DomainError::DuplicateRollNumber {
            class: class.to_string(),
            roll_number: roll_number.to_string(),
        });
    }
    Ok(())
}
