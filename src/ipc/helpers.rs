use crate::domain::{Actor, DomainError, Role};
use crate::ipc::error::err;
use crate::ipc::types::AppState;
use crate::store::sqlite::SqliteStore;

/// Handler-internal failure carrier, turned into a response at the edge.
pub struct HandlerErr {
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        HandlerErr {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        err(id, self.code, self.message, self.details)
    }
}

impl From<DomainError> for HandlerErr {
    fn from(e: DomainError) -> Self {
        HandlerErr {
            code: e.code(),
            message: e.to_string(),
            details: None,
        }
    }
}

pub fn require_store(state: &mut AppState) -> Result<&mut SqliteStore, HandlerErr> {
    state.store.as_mut().ok_or(HandlerErr {
        code: "no_workspace",
        message: "select a workspace first".to_string(),
        details: None,
    })
}

pub fn get_required_str(params: &serde_json::Value, key: &str) -> Result<String, HandlerErr> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {}", key)))
}

pub fn get_optional_str(params: &serde_json::Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

/// Presentation layer passes the acting identity on every mutating call:
/// `{"role": "...", "assignedClasses": [...]}`.
pub fn parse_actor(params: &serde_json::Value) -> Result<Actor, HandlerErr> {
    let actor = params
        .get("actor")
        .ok_or_else(|| HandlerErr::bad_params("missing actor"))?;
    let role = actor
        .get("role")
        .and_then(|v| v.as_str())
        .and_then(Role::parse)
        .ok_or_else(|| HandlerErr::bad_params("actor.role must be admin, teacher or student"))?;
    let assigned_classes = match actor.get("assignedClasses") {
        None => Vec::new(),
        Some(v) => v
            .as_array()
            .ok_or_else(|| HandlerErr::bad_params("actor.assignedClasses must be an array"))?
            .iter()
            .map(|c| {
                c.as_str()
                    .map(|s| s.to_string())
                    .ok_or_else(|| HandlerErr::bad_params("actor.assignedClasses entries must be strings"))
            })
            .collect::<Result<Vec<_>, _>>()?,
    };
    Ok(Actor {
        role,
        assigned_classes,
    })
}
