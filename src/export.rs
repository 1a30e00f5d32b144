use crate::domain::StudentRecord;

/// Flat CSV rendering of a directory listing. Column order is fixed; the
/// contact columns are only present when requested by the call site.
pub fn students_csv(students: &[StudentRecord], include_contact: bool) -> String {
    let mut headers = vec!["ID", "Name", "Roll No.", "Class"];
    if include_contact {
        headers.push("Father's Name");
        headers.push("Phone");
    }

    let mut out = String::new();
    out.push_str(&headers.join(","));
    out.push('\n');

    for s in students {
        let mut fields = vec![
            field(&s.id),
            field(&s.name),
            field(&s.roll_number),
            field(&s.class),
        ];
        if include_contact {
            fields.push(field(&s.father_name));
            fields.push(field(s.phone.as_deref().unwrap_or("")));
        }
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

/// Free-text fields (names, addresses) routinely contain commas; quote
/// anything that would break the row structure.
fn field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
