#[cfg(test)]
pub mod memory;
pub mod sqlite;

use std::collections::BTreeMap;

use crate::domain::{MarkRecord, NoticeRecord, StudentRecord, TeacherRecord, Term};

pub type StoreResult<T> = anyhow::Result<T>;

/// Per-collection persistence capabilities the domain rules are written
/// against. Implementations must keep the same observable behavior so the
/// rules can be exercised against [`memory::MemStore`] in tests and
/// [`sqlite::SqliteStore`] in production interchangeably.
pub trait Store {
    fn student(&self, id: &str) -> StoreResult<Option<StudentRecord>>;
    fn students(&self) -> StoreResult<Vec<StudentRecord>>;
    /// Upsert by id. Uniqueness of `(class, roll_number)` is enforced by the
    /// domain layer before this is called.
    fn put_student(&mut self, record: &StudentRecord) -> StoreResult<()>;
    /// Returns false when no such student exists. Marks for the student are
    /// left untouched either way.
    fn delete_student(&mut self, id: &str) -> StoreResult<bool>;

    fn mark(&self, student_id: &str, term: Term) -> StoreResult<Option<MarkRecord>>;
    fn marks_for_student(&self, student_id: &str) -> StoreResult<Vec<MarkRecord>>;
    /// Upsert by `(student_id, term)`.
    fn put_mark(&mut self, record: &MarkRecord) -> StoreResult<()>;

    fn assignment(&self, teacher_id: &str) -> StoreResult<Option<String>>;
    fn assignments(&self) -> StoreResult<BTreeMap<String, String>>;
    fn put_assignment(&mut self, teacher_id: &str, class: &str) -> StoreResult<()>;
    fn remove_assignment(&mut self, teacher_id: &str) -> StoreResult<()>;
    /// Clears the table and inserts every entry of `map` as one atomic step;
    /// concurrent readers must never observe the transiently empty table.
    fn replace_assignments(&mut self, map: &BTreeMap<String, String>) -> StoreResult<()>;

    fn teachers(&self) -> StoreResult<Vec<TeacherRecord>>;

    fn notices(&self) -> StoreResult<Vec<NoticeRecord>>;
    fn put_notice(&mut self, record: &NoticeRecord) -> StoreResult<()>;
    fn delete_notice(&mut self, id: &str) -> StoreResult<bool>;
}
