use rusqlite::Connection;
use std::path::Path;

/// Seed roster for a fresh workspace. Assignment state lives in
/// `teacher_assignments` and starts empty.
const TEACHER_ROSTER: [(&str, &str, &str); 12] = [
    ("t1", "Mr. Smith", "teacher.smith@example.com"),
    ("t2", "Mrs. Davis", "teacher.davis@example.com"),
    ("t3", "Ms. Jones", "teacher.jones@example.com"),
    ("t4", "Mr. Wilson", "teacher.wilson@example.com"),
    ("t5", "Mr. Brown", "teacher.brown@example.com"),
    ("t6", "Ms. Garcia", "teacher.garcia@example.com"),
    ("t7", "Mr. Rodriguez", "teacher.rodriguez@example.com"),
    ("t8", "Ms. Martinez", "teacher.martinez@example.com"),
    ("t9", "Ms. Lee", "teacher.lee@example.com"),
    ("t10", "Mr. Harris", "teacher.harris@example.com"),
    ("t11", "Mrs. Clark", "teacher.clark@example.com"),
    ("t12", "Mr. Lewis", "teacher.lewis@example.com"),
];

pub fn open_db(workspace: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(workspace)?;
    let db_path = workspace.join("schooldesk.sqlite3");
    let conn = Connection::open(db_path)?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            roll_number TEXT NOT NULL,
            class TEXT NOT NULL,
            father_name TEXT NOT NULL,
            mother_name TEXT NOT NULL,
            category TEXT NOT NULL,
            address TEXT NOT NULL,
            sr_number TEXT,
            pen_number TEXT,
            phone TEXT,
            UNIQUE(class, roll_number)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_students_class ON students(class)",
        [],
    )?;

    // No FK to students: deleting a student keeps its marks (there is no
    // cascade and no mark-delete operation).
    conn.execute(
        "CREATE TABLE IF NOT EXISTS marks(
            student_id TEXT NOT NULL,
            term TEXT NOT NULL,
            subjects TEXT NOT NULL,
            PRIMARY KEY(student_id, term)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_marks_student ON marks(student_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS teachers(
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS teacher_assignments(
            teacher_id TEXT PRIMARY KEY,
            class TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS notices(
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    seed_teacher_roster(&conn)?;

    Ok(conn)
}

fn seed_teacher_roster(conn: &Connection) -> anyhow::Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM teachers", [], |r| r.get(0))?;
    if count > 0 {
        return Ok(());
    }
    for (id, name, email) in TEACHER_ROSTER {
        conn.execute(
            "INSERT INTO teachers(id, name, email) VALUES(?1, ?2, ?3)",
            [id, name, email],
        )?;
    }
    Ok(())
}
