pub mod assignments;
pub mod identity;
pub mod marks;
pub mod students;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed class ladder used across the school. Assignment saves and student
/// records only ever reference these names.
pub const ALL_CLASSES: [&str; 13] = [
    "NUR", "LKG", "UKG", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10",
];

/// Sentinel class value meaning "no assignment".
pub const UNASSIGNED: &str = "Unassigned";

pub fn is_known_class(name: &str) -> bool {
    ALL_CLASSES.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "teacher" => Some(Self::Teacher),
            "student" => Some(Self::Student),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller context supplied by the presentation layer on every mutating call.
/// For teachers `assigned_classes` is whatever `identity::resolve_role`
/// computed at login; the domain never re-derives it mid-call.
#[derive(Debug, Clone)]
pub struct Actor {
    pub role: Role,
    pub assigned_classes: Vec<String>,
}

impl Actor {
    #[cfg(test)]
    pub fn admin() -> Self {
        Actor {
            role: Role::Admin,
            assigned_classes: Vec::new(),
        }
    }

    pub fn may_act_on_class(&self, class: &str) -> bool {
        match self.role {
            Role::Admin => true,
            Role::Teacher => self.assigned_classes.iter().any(|c| c == class),
            Role::Student => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    #[serde(rename = "Term 1")]
    Term1,
    #[serde(rename = "Term 2")]
    Term2,
    #[serde(rename = "Term 3")]
    Term3,
    #[serde(rename = "Term 4")]
    Term4,
}

impl Term {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Term 1" => Some(Self::Term1),
            "Term 2" => Some(Self::Term2),
            "Term 3" => Some(Self::Term3),
            "Term 4" => Some(Self::Term4),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Term1 => "Term 1",
            Self::Term2 => "Term 2",
            Self::Term3 => "Term 3",
            Self::Term4 => "Term 4",
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    CK,
    MTQ,
}

impl Category {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CK" => Some(Self::CK),
            "MTQ" => Some(Self::MTQ),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CK => "CK",
            Self::MTQ => "MTQ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub roll_number: String,
    pub class: String,
    pub father_name: String,
    pub mother_name: String,
    pub category: Category,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sr_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pen_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A student as submitted by the caller, before an id exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDraft {
    pub name: String,
    pub roll_number: String,
    pub class: String,
    pub father_name: String,
    pub mother_name: String,
    pub category: Category,
    pub address: String,
    #[serde(default)]
    pub sr_number: Option<String>,
    #[serde(default)]
    pub pen_number: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl StudentDraft {
    pub fn into_record(self, id: String) -> StudentRecord {
        StudentRecord {
            id,
            name: self.name,
            roll_number: self.roll_number,
            class: self.class,
            father_name: self.father_name,
            mother_name: self.mother_name,
            category: self.category,
            address: self.address,
            sr_number: self.sr_number,
            pen_number: self.pen_number,
            phone: self.phone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRecord {
    pub student_id: String,
    pub term: Term,
    pub subjects: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherRecord {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{0} may not perform this operation")]
    Forbidden(Role),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("roll number {roll_number} already exists in class {class}")]
    DuplicateRollNumber { class: String, roll_number: String },

    #[error("marks for {0} are already filled")]
    AlreadyFilled(Term),

    #[error("score {score} for {subject} is outside 0..=100")]
    InvalidScore { subject: String, score: f64 },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    /// Stable code surfaced in IPC error responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "forbidden",
            Self::NotFound(_) => "not_found",
            Self::DuplicateRollNumber { .. } => "duplicate_roll_number",
            Self::AlreadyFilled(_) => "already_filled",
            Self::InvalidScore { .. } => "invalid_score",
            Self::Storage(_) => "storage_failed",
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
