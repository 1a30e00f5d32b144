use std::collections::BTreeMap;

use anyhow::{anyhow, Context};
use rusqlite::{Connection, OptionalExtension};

use crate::domain::{Category, MarkRecord, NoticeRecord, StudentRecord, TeacherRecord, Term};
use crate::store::{Store, StoreResult};

/// Production store over the per-workspace SQLite database opened by
/// [`crate::db::open_db`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(conn: Connection) -> Self {
        SqliteStore { conn }
    }
}

const STUDENT_COLS: &str = "id, name, roll_number, class, father_name, mother_name, category, \
                            address, sr_number, pen_number, phone";

struct StudentRow {
    id: String,
    name: String,
    roll_number: String,
    class: String,
    father_name: String,
    mother_name: String,
    category: String,
    address: String,
    sr_number: Option<String>,
    pen_number: Option<String>,
    phone: Option<String>,
}

impl StudentRow {
    fn from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(StudentRow {
            id: r.get(0)?,
            name: r.get(1)?,
            roll_number: r.get(2)?,
            class: r.get(3)?,
            father_name: r.get(4)?,
            mother_name: r.get(5)?,
            category: r.get(6)?,
            address: r.get(7)?,
            sr_number: r.get(8)?,
            pen_number: r.get(9)?,
            phone: r.get(10)?,
        })
    }

    fn into_record(self) -> StoreResult<StudentRecord> {
        let category = Category::parse(&self.category)
            .ok_or_else(|| anyhow!("unknown category in db: {}", self.category))?;
        Ok(StudentRecord {
            id: self.id,
            name: self.name,
            roll_number: self.roll_number,
            class: self.class,
            father_name: self.father_name,
            mother_name: self.mother_name,
            category,
            address: self.address,
            sr_number: self.sr_number,
            pen_number: self.pen_number,
            phone: self.phone,
        })
    }
}

fn mark_from_parts(student_id: String, term: String, subjects_json: String) -> StoreResult<MarkRecord> {
    let term = Term::parse(&term).ok_or_else(|| anyhow!("unknown term in db: {term}"))?;
    let subjects: BTreeMap<String, f64> =
        serde_json::from_str(&subjects_json).context("decode subjects json")?;
    Ok(MarkRecord {
        student_id,
        term,
        subjects,
    })
}

impl Store for SqliteStore {
    fn student(&self, id: &str) -> StoreResult<Option<StudentRecord>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {STUDENT_COLS} FROM students WHERE id = ?"),
                [id],
                StudentRow::from_row,
            )
            .optional()?;
        row.map(StudentRow::into_record).transpose()
    }

    fn students(&self) -> StoreResult<Vec<StudentRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {STUDENT_COLS} FROM students ORDER BY class, roll_number"
        ))?;
        let rows = stmt
            .query_map([], StudentRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(StudentRow::into_record).collect()
    }

    fn put_student(&mut self, record: &StudentRecord) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO students(id, name, roll_number, class, father_name, mother_name,
                                  category, address, sr_number, pen_number, phone)
             VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(id) DO UPDATE SET
               name = excluded.name,
               roll_number = excluded.roll_number,
               class = excluded.class,
               father_name = excluded.father_name,
               mother_name = excluded.mother_name,
               category = excluded.category,
               address = excluded.address,
               sr_number = excluded.sr_number,
               pen_number = excluded.pen_number,
               phone = excluded.phone",
            rusqlite::params![
                record.id,
                record.name,
                record.roll_number,
                record.class,
                record.father_name,
                record.mother_name,
                record.category.as_str(),
                record.address,
                record.sr_number,
                record.pen_number,
                record.phone,
            ],
        )?;
        Ok(())
    }

    fn delete_student(&mut self, id: &str) -> StoreResult<bool> {
        let n = self.conn.execute("DELETE FROM students WHERE id = ?", [id])?;
        Ok(n > 0)
    }

    fn mark(&self, student_id: &str, term: Term) -> StoreResult<Option<MarkRecord>> {
        let row: Option<String> = self
            .conn
            .query_row(
                "SELECT subjects FROM marks WHERE student_id = ? AND term = ?",
                [student_id, term.as_str()],
                |r| r.get(0),
            )
            .optional()?;
        row.map(|subjects| mark_from_parts(student_id.to_string(), term.as_str().to_string(), subjects))
            .transpose()
    }

    fn marks_for_student(&self, student_id: &str) -> StoreResult<Vec<MarkRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT student_id, term, subjects FROM marks WHERE student_id = ?")?;
        let rows = stmt
            .query_map([student_id], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?, r.get::<_, String>(2)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter()
            .map(|(sid, term, subjects)| mark_from_parts(sid, term, subjects))
            .collect()
    }

    fn put_mark(&mut self, record: &MarkRecord) -> StoreResult<()> {
        let subjects = serde_json::to_string(&record.subjects).context("encode subjects json")?;
        self.conn.execute(
            "INSERT INTO marks(student_id, term, subjects) VALUES(?1, ?2, ?3)
             ON CONFLICT(student_id, term) DO UPDATE SET subjects = excluded.subjects",
            rusqlite::params![record.student_id, record.term.as_str(), subjects],
        )?;
        Ok(())
    }

    fn assignment(&self, teacher_id: &str) -> StoreResult<Option<String>> {
        let row = self
            .conn
            .query_row(
                "SELECT class FROM teacher_assignments WHERE teacher_id = ?",
                [teacher_id],
                |r| r.get(0),
            )
            .optional()?;
        Ok(row)
    }

    fn assignments(&self) -> StoreResult<BTreeMap<String, String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT teacher_id, class FROM teacher_assignments")?;
        let rows = stmt
            .query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?
            .collect::<Result<BTreeMap<_, _>, _>>()?;
        Ok(rows)
    }

    fn put_assignment(&mut self, teacher_id: &str, class: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO teacher_assignments(teacher_id, class) VALUES(?1, ?2)
             ON CONFLICT(teacher_id) DO UPDATE SET class = excluded.class",
            [teacher_id, class],
        )?;
        Ok(())
    }

    fn remove_assignment(&mut self, teacher_id: &str) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM teacher_assignments WHERE teacher_id = ?", [teacher_id])?;
        Ok(())
    }

    fn replace_assignments(&mut self, map: &BTreeMap<String, String>) -> StoreResult<()> {
        // Clear-then-reinsert must not be observable half-done.
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM teacher_assignments", [])?;
        for (teacher_id, class) in map {
            tx.execute(
                "INSERT INTO teacher_assignments(teacher_id, class) VALUES(?1, ?2)",
                [teacher_id, class],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn teachers(&self) -> StoreResult<Vec<TeacherRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email FROM teachers ORDER BY id")?;
        let rows = stmt
            .query_map([], |r| {
                Ok(TeacherRecord {
                    id: r.get(0)?,
                    name: r.get(1)?,
                    email: r.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn notices(&self) -> StoreResult<Vec<NoticeRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, created_at FROM notices ORDER BY created_at DESC",
        )?;
        let rows = stmt
            .query_map([], |r| {
                Ok(NoticeRecord {
                    id: r.get(0)?,
                    title: r.get(1)?,
                    content: r.get(2)?,
                    created_at: r.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn put_notice(&mut self, record: &NoticeRecord) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO notices(id, title, content, created_at) VALUES(?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
               title = excluded.title,
               content = excluded.content",
            rusqlite::params![record.id, record.title, record.content, record.created_at],
        )?;
        Ok(())
    }

    fn delete_notice(&mut self, id: &str) -> StoreResult<bool> {
        let n = self.conn.execute("DELETE FROM notices WHERE id = ?", [id])?;
        Ok(n > 0)
    }
}
