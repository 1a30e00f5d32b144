use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_schooldeskd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn schooldeskd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

fn request_err_code(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> String {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "{} unexpectedly succeeded: {}",
        method,
        value
    );
    value
        .get("error")
        .and_then(|e| e.get("code"))
        .and_then(|c| c.as_str())
        .expect("error code")
        .to_string()
}

fn student_params(class: &str, roll: &str, name: &str, actor: serde_json::Value) -> serde_json::Value {
    json!({
        "name": name,
        "rollNumber": roll,
        "class": class,
        "fatherName": "R. Rao",
        "motherName": "S. Rao",
        "category": "CK",
        "address": "12 Lane, City",
        "actor": actor,
    })
}

#[test]
fn roll_number_unique_within_class() {
    let workspace = temp_dir("schooldesk-students-unique");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let admin = json!({ "role": "admin" });

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.create",
        student_params("10", "101", "Asha Rao", admin.clone()),
    );

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "3",
        "students.create",
        student_params("10", "101", "Someone Else", admin.clone()),
    );
    assert_eq!(code, "duplicate_roll_number");

    // Same roll number in another class is a different pair.
    request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "students.create",
        student_params("9", "101", "Someone Else", admin),
    );
}

#[test]
fn teacher_limited_to_assigned_classes() {
    let workspace = temp_dir("schooldesk-students-teacher");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let teacher = json!({ "role": "teacher", "assignedClasses": ["5"] });

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "2",
        "students.create",
        student_params("10", "1", "Out Of Scope", teacher.clone()),
    );
    assert_eq!(code, "forbidden");

    request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.create",
        student_params("5", "1", "In Scope", teacher),
    );
}

#[test]
fn update_and_delete_are_admin_only() {
    let workspace = temp_dir("schooldesk-students-admin-only");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let admin = json!({ "role": "admin" });
    let teacher = json!({ "role": "teacher", "assignedClasses": ["10"] });

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.create",
        student_params("10", "101", "Asha Rao", admin.clone()),
    );
    let id = created.get("id").and_then(|v| v.as_str()).expect("id").to_string();

    let mut patch = student_params("10", "102", "Asha Rao", teacher.clone());
    patch["id"] = json!(id);
    let code = request_err_code(&mut stdin, &mut reader, "3", "students.update", patch.clone());
    assert_eq!(code, "forbidden");

    patch["actor"] = admin.clone();
    let updated = request_ok(&mut stdin, &mut reader, "4", "students.update", patch);
    assert_eq!(updated.get("rollNumber").and_then(|v| v.as_str()), Some("102"));
    assert_eq!(updated.get("id").and_then(|v| v.as_str()), Some(id.as_str()));

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "5",
        "students.delete",
        json!({ "id": id, "actor": teacher }),
    );
    assert_eq!(code, "forbidden");

    request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "students.delete",
        json!({ "id": id, "actor": admin.clone() }),
    );
    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "7",
        "students.delete",
        json!({ "id": id, "actor": admin }),
    );
    assert_eq!(code, "not_found");
}

#[test]
fn list_filters_and_roll_lookup() {
    let workspace = temp_dir("schooldesk-students-list");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let admin = json!({ "role": "admin" });

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    for (i, (class, roll, name)) in [
        ("10", "101", "Asha Rao"),
        ("10", "102", "Vikram Singh"),
        ("9", "101", "Asha Verma"),
    ]
    .iter()
    .enumerate()
    {
        request_ok(
            &mut stdin,
            &mut reader,
            &format!("c{}", i),
            "students.create",
            student_params(class, roll, name, admin.clone()),
        );
    }

    let listed = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "students.list",
        json!({ "class": "10", "search": "asha" }),
    );
    let students = listed.get("students").and_then(|v| v.as_array()).expect("students");
    assert_eq!(students.len(), 1);
    assert_eq!(
        students[0].get("name").and_then(|v| v.as_str()),
        Some("Asha Rao")
    );

    let found = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "students.findByRoll",
        json!({ "class": "9", "rollNumber": "101" }),
    );
    assert_eq!(found.get("name").and_then(|v| v.as_str()), Some("Asha Verma"));

    let code = request_err_code(
        &mut stdin,
        &mut reader,
        "4",
        "students.findByRoll",
        json!({ "class": "9", "rollNumber": "999" }),
    );
    assert_eq!(code, "not_found");
}

#[test]
fn field_rules_enforced_at_the_boundary() {
    let workspace = temp_dir("schooldesk-students-fields");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let admin = json!({ "role": "admin" });

    request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let mut bad_pen = student_params("10", "101", "Asha Rao", admin.clone());
    bad_pen["penNumber"] = json!("12345");
    let code = request_err_code(&mut stdin, &mut reader, "2", "students.create", bad_pen);
    assert_eq!(code, "bad_params");

    let mut bad_phone = student_params("10", "101", "Asha Rao", admin.clone());
    bad_phone["phone"] = json!("12345");
    let code = request_err_code(&mut stdin, &mut reader, "3", "students.create", bad_phone);
    assert_eq!(code, "bad_params");

    let bad_class = student_params("13", "101", "Asha Rao", admin.clone());
    let code = request_err_code(&mut stdin, &mut reader, "4", "students.create", bad_class);
    assert_eq!(code, "bad_params");

    let mut good = student_params("10", "101", "Asha Rao", admin);
    good["penNumber"] = json!("12345678901");
    good["phone"] = json!("9876543210");
    let created = request_ok(&mut stdin, &mut reader, "5", "students.create", good);
    assert_eq!(
        created.get("penNumber").and_then(|v| v.as_str()),
        Some("12345678901")
    );
}
