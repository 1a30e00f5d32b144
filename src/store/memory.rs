use std::collections::BTreeMap;

use crate::domain::{MarkRecord, NoticeRecord, StudentRecord, TeacherRecord, Term};
use crate::store::{Store, StoreResult};

/// In-memory store used by the domain unit tests. Mirrors the SQLite store's
/// observable behavior, minus durability.
#[derive(Debug, Default)]
pub struct MemStore {
    students: Vec<StudentRecord>,
    marks: BTreeMap<(String, Term), MarkRecord>,
    assignments: BTreeMap<String, String>,
    teachers: Vec<TeacherRecord>,
    notices: Vec<NoticeRecord>,
}

impl MemStore {
    pub fn seed_teachers(&mut self, teachers: Vec<TeacherRecord>) {
        self.teachers = teachers;
    }
}

impl Store for MemStore {
    fn student(&self, id: &str) -> StoreResult<Option<StudentRecord>> {
        Ok(self.students.iter().find(|s| s.id == id).cloned())
    }

    fn students(&self) -> StoreResult<Vec<StudentRecord>> {
        Ok(self.students.clone())
    }

    fn put_student(&mut self, record: &StudentRecord) -> StoreResult<()> {
        match self.students.iter_mut().find(|s| s.id == record.id) {
            Some(slot) => *slot = record.clone(),
            None => self.students.push(record.clone()),
        }
        Ok(())
    }

    fn delete_student(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.students.len();
        self.students.retain(|s| s.id != id);
        Ok(self.students.len() != before)
    }

    fn mark(&self, student_id: &str, term: Term) -> StoreResult<Option<MarkRecord>> {
        Ok(self.marks.get(&(student_id.to_string(), term)).cloned())
    }

    fn marks_for_student(&self, student_id: &str) -> StoreResult<Vec<MarkRecord>> {
        Ok(self
            .marks
            .values()
            .filter(|m| m.student_id == student_id)
            .cloned()
            .collect())
    }

    fn put_mark(&mut self, record: &MarkRecord) -> StoreResult<()> {
        self.marks
            .insert((record.student_id.clone(), record.term), record.clone());
        Ok(())
    }

    fn assignment(&self, teacher_id: &str) -> StoreResult<Option<String>> {
        Ok(self.assignments.get(teacher_id).cloned())
    }

    fn assignments(&self) -> StoreResult<BTreeMap<String, String>> {
        Ok(self.assignments.clone())
    }

    fn put_assignment(&mut self, teacher_id: &str, class: &str) -> StoreResult<()> {
        self.assignments
            .insert(teacher_id.to_string(), class.to_string());
        Ok(())
    }

    fn remove_assignment(&mut self, teacher_id: &str) -> StoreResult<()> {
        self.assignments.remove(teacher_id);
        Ok(())
    }

    fn replace_assignments(&mut self, map: &BTreeMap<String, String>) -> StoreResult<()> {
        self.assignments = map.clone();
        Ok(())
    }

    fn teachers(&self) -> StoreResult<Vec<TeacherRecord>> {
        Ok(self.teachers.clone())
    }

    fn notices(&self) -> StoreResult<Vec<NoticeRecord>> {
        Ok(self.notices.clone())
    }

    fn put_notice(&mut self, record: &NoticeRecord) -> StoreResult<()> {
        match self.notices.iter_mut().find(|n| n.id == record.id) {
            Some(slot) => *slot = record.clone(),
            None => self.notices.push(record.clone()),
        }
        Ok(())
    }

    fn delete_notice(&mut self, id: &str) -> StoreResult<bool> {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        Ok(self.notices.len() != before)
    }
}
