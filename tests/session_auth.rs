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

fn request_err(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "{} unexpectedly succeeded: {}",
        method,
        value
    );
    value.get("error").cloned().expect("error object")
}

fn fill_required(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>, prefix: &str) {
    let fields = [
        ("fullName", "Asha Rao"),
        ("dateOfBirth", "2001-01-01"),
        ("gender", "female"),
        ("parentGuardianName", "Rao"),
        ("parentContact", "9000000000"),
        ("address", "X"),
        ("aadharNumber", "1111"),
        ("studentContact", "9000000001"),
        ("email", "a@x.com"),
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
            &format!("{}-{}", prefix, i),
            "form.setField",
            json!({ "field": field, "value": value }),
        );
    }
}

#[test]
fn operations_need_a_backend_first() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let error = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "session.login",
        json!({ "username": "master", "password": "admin123" }),
    );
    assert_eq!(error["code"], "no_backend");

    let error = request_err(&mut stdin, &mut reader, "2", "students.loadAll", json!({}));
    assert_eq!(error["code"], "no_backend");
}

#[test]
fn load_without_credentials_redirects_to_login() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "backend.select",
        json!({ "mode": "memory" }),
    );

    let error = request_err(&mut stdin, &mut reader, "2", "students.loadAll", json!({}));
    assert_eq!(error["code"], "unauthorized");
    assert_eq!(error["details"]["redirect"], "login");
}

#[test]
fn bad_credentials_are_rejected() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "backend.select",
        json!({ "mode": "memory" }),
    );
    let error = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "session.login",
        json!({ "username": "master", "password": "wrong" }),
    );
    assert_eq!(error["code"], "unauthorized");

    let status = request_ok(&mut stdin, &mut reader, "3", "session.status", json!({}));
    assert_eq!(status["authenticated"], false);
}

#[test]
fn logout_clears_the_credentials_and_blocks_mutations() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "backend.select",
        json!({ "mode": "memory" }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "session.login",
        json!({ "username": "master", "password": "admin123" }),
    );

    // one persisted record while logged in
    let _ = request_ok(&mut stdin, &mut reader, "3", "form.init", json!({}));
    fill_required(&mut stdin, &mut reader, "a");
    let _ = request_ok(&mut stdin, &mut reader, "4", "form.submit", json!({}));

    let _ = request_ok(&mut stdin, &mut reader, "5", "session.logout", json!({}));
    let status = request_ok(&mut stdin, &mut reader, "6", "session.status", json!({}));
    assert_eq!(status["authenticated"], false);

    // a mutating operation aborts with a message and changes nothing
    let _ = request_ok(&mut stdin, &mut reader, "7", "form.init", json!({}));
    fill_required(&mut stdin, &mut reader, "b");
    let error = request_err(&mut stdin, &mut reader, "8", "form.submit", json!({}));
    assert_eq!(error["code"], "unauthorized");

    let rows = request_ok(&mut stdin, &mut reader, "9", "students.rows", json!({}));
    assert_eq!(rows["rows"].as_array().expect("rows").len(), 1);

    // logging back in restores access to the same backend collection
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "10",
        "session.login",
        json!({ "username": "master", "password": "admin123" }),
    );
    let loaded = request_ok(&mut stdin, &mut reader, "11", "students.loadAll", json!({}));
    assert_eq!(loaded["count"], 1);
}

#[test]
fn delete_without_credentials_leaves_the_record_in_place() {
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "backend.select",
        json!({ "mode": "memory" }),
    );
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "session.login",
        json!({ "username": "master", "password": "admin123" }),
    );
    let _ = request_ok(&mut stdin, &mut reader, "3", "form.init", json!({}));
    fill_required(&mut stdin, &mut reader, "a");
    let _ = request_ok(&mut stdin, &mut reader, "4", "form.submit", json!({}));
    let _ = request_ok(&mut stdin, &mut reader, "5", "session.logout", json!({}));

    let error = request_err(
        &mut stdin,
        &mut reader,
        "6",
        "students.delete",
        json!({ "id": 1, "confirm": true }),
    );
    assert_eq!(error["code"], "unauthorized");

    let rows = request_ok(&mut stdin, &mut reader, "7", "students.rows", json!({}));
    assert_eq!(rows["rows"].as_array().expect("rows").len(), 1);
}
