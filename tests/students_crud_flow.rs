use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_trustdeskd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn trustdeskd");
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

fn login(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>) {
    let _ = request_ok(
        stdin,
        reader,
        "setup-1",
        "backend.select",
        json!({ "mode": "memory" }),
    );
    let _ = request_ok(
        stdin,
        reader,
        "setup-2",
        "session.login",
        json!({ "username": "master", "password": "admin123" }),
    );
}

fn fill_required(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    name: &str,
    email: &str,
) {
    let fields = [
        ("fullName", name),
        ("dateOfBirth", "2001-01-01"),
        ("gender", "female"),
        ("parentGuardianName", "Rao"),
        ("parentContact", "9000000000"),
        ("address", "X"),
        ("aadharNumber", "1111"),
        ("studentContact", "9000000001"),
        ("email", email),
        ("targetExams", "NEET"),
        ("preparationLevel", "beginner"),
        ("mediumOfInstruction", "english"),
        ("startDate", "2024-01-01"),
        ("endDate", "2024-12-01"),
    ];
    for (i, (field, value)) in fields.iter().enumerate() {
        let _ = request_ok(
            stdin,
            reader,
            &format!("fill-{}", i),
            "form.setField",
            json!({ "field": field, "value": value }),
        );
    }
}

fn rows(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>, id: &str) -> Vec<serde_json::Value> {
    let result = request_ok(stdin, reader, id, "students.rows", json!({}));
    result
        .get("rows")
        .and_then(|v| v.as_array())
        .cloned()
        .expect("rows array")
}

#[test]
fn create_edit_and_delete_round_trip() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    login(&mut stdin, &mut reader);

    let loaded = request_ok(&mut stdin, &mut reader, "1", "students.loadAll", json!({}));
    assert_eq!(loaded.get("count").and_then(|v| v.as_i64()), Some(0));

    // create
    let _ = request_ok(&mut stdin, &mut reader, "2", "form.init", json!({}));
    fill_required(&mut stdin, &mut reader, "Asha Rao", "a@x.com");
    let submitted = request_ok(&mut stdin, &mut reader, "3", "form.submit", json!({}));
    assert_eq!(submitted.get("created").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(submitted.get("studentId").and_then(|v| v.as_i64()), Some(1));

    let listed = rows(&mut stdin, &mut reader, "4");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], "Asha Rao");
    assert_eq!(listed[0]["education"], "Not specified");
    assert_eq!(listed[0]["targetExams"], "NEET");

    // edit in place: same id, same collection length, other records untouched
    let _ = request_ok(&mut stdin, &mut reader, "5", "form.init", json!({}));
    fill_required(&mut stdin, &mut reader, "Rahul Kumar", "r@x.com");
    let second = request_ok(&mut stdin, &mut reader, "6", "form.submit", json!({}));
    assert_eq!(second.get("studentId").and_then(|v| v.as_i64()), Some(2));

    let begin = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "form.init",
        json!({ "studentId": 1 }),
    );
    assert_eq!(begin.get("editing").and_then(|v| v.as_bool()), Some(true));
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "8",
        "form.setField",
        json!({ "field": "fullName", "value": "Asha R. Edited" }),
    );
    let updated = request_ok(&mut stdin, &mut reader, "9", "form.submit", json!({}));
    assert_eq!(updated.get("created").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(updated.get("studentId").and_then(|v| v.as_i64()), Some(1));

    let listed = rows(&mut stdin, &mut reader, "10");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["name"], "Asha R. Edited");
    assert_eq!(listed[1]["name"], "Rahul Kumar");

    // the server has the edit too
    let reloaded = request_ok(&mut stdin, &mut reader, "11", "students.loadAll", json!({}));
    assert_eq!(reloaded.get("count").and_then(|v| v.as_i64()), Some(2));
    let student = request_ok(
        &mut stdin,
        &mut reader,
        "12",
        "students.get",
        json!({ "id": 1 }),
    );
    assert_eq!(student["student"]["fullName"], "Asha R. Edited");

    // declining the confirmation leaves the collection unchanged
    let declined = request_ok(
        &mut stdin,
        &mut reader,
        "13",
        "students.delete",
        json!({ "id": 1 }),
    );
    assert_eq!(declined.get("deleted").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(rows(&mut stdin, &mut reader, "14").len(), 2);

    // confirming removes exactly the matching record
    let deleted = request_ok(
        &mut stdin,
        &mut reader,
        "15",
        "students.delete",
        json!({ "id": 1, "confirm": true }),
    );
    assert_eq!(deleted.get("deleted").and_then(|v| v.as_bool()), Some(true));
    let listed = rows(&mut stdin, &mut reader, "16");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], 2);
}

#[test]
fn garbage_input_gets_a_well_formed_error_line() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    // unparseable request with quoting in play: the reply must still be JSON
    writeln!(stdin, "{{\"id\": \"x\", \"method\": }}").expect("write garbage");
    stdin.flush().expect("flush");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value =
        serde_json::from_str(line.trim()).expect("error reply parses as json");
    assert_eq!(value["ok"], false);
    assert_eq!(value["error"]["code"], "bad_json");

    // the daemon keeps serving after the bad line
    let pong = request_ok(&mut stdin, &mut reader, "1", "app.ping", json!({}));
    assert_eq!(pong["pong"], true);
}

#[test]
fn education_summary_follows_the_precedence_ladder() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    login(&mut stdin, &mut reader);

    let _ = request_ok(&mut stdin, &mut reader, "1", "form.init", json!({}));
    fill_required(&mut stdin, &mut reader, "Priya Sharma", "p@x.com");
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "form.toggleSection",
        json!({ "flag": "hasUg", "value": true }),
    );
    for (i, (field, value)) in [
        ("ugCourse", "B.Tech"),
        ("ugCollege", "Mumbai Engineering College"),
        ("ugYear", "2024"),
        ("ugPercentage", "8.5 CGPA"),
    ]
    .iter()
    .enumerate()
    {
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            &format!("ug-{}", i),
            "form.setField",
            json!({ "field": field, "value": value }),
        );
    }
    let _ = request_ok(&mut stdin, &mut reader, "3", "form.submit", json!({}));

    let listed = rows(&mut stdin, &mut reader, "4");
    assert_eq!(listed[0]["education"], "B.Tech - Mumbai Engineering College");
    assert_eq!(listed[0]["medium"], "english");
}
