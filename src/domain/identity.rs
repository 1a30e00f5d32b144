use serde::Serialize;

use crate::domain::{assignments, DomainResult, Role};
use crate::store::Store;

/// The single recognized admin identity.
pub const ADMIN_EMAIL: &str = "admin@example.com";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleContext {
    pub uid: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub assigned_classes: Vec<String>,
}

/// Resolves the acting identity for a login event. Admin is a fixed email
/// match; teachers are matched against the roster by email, with their
/// classes read from the live assignment table; everyone else is a student.
///
/// Callers must invoke this on every login rather than caching the result,
/// since assignments change between sessions.
pub fn resolve_role(store: &dyn Store, email: &str) -> DomainResult<RoleContext> {
    let normalized = email.trim().to_lowercase();

    if normalized == ADMIN_EMAIL {
        return Ok(RoleContext {
            uid: "admin".to_string(),
            email: normalized,
            display_name: "Administrator".to_string(),
            role: Role::Admin,
            assigned_classes: Vec::new(),
        });
    }

    if let Some(teacher) = store
        .teachers()?
        .into_iter()
        .find(|t| t.email.to_lowercase() == normalized)
    {
        let assigned_classes = assignments::classes_for_teacher(store, &teacher.id)?;
        return Ok(RoleContext {
            uid: teacher.id,
            email: normalized,
            display_name: teacher.name,
            role: Role::Teacher,
            assigned_classes,
        });
    }

    let display_name = normalized
        .split('@')
        .next()
        .unwrap_or(normalized.as_str())
        .to_string();
    Ok(RoleContext {
        uid: normalized.clone(),
        email: normalized,
        display_name,
        role: Role::Student,
        assigned_classes: Vec::new(),
    })
}
