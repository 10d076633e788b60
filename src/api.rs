//! The remote persistence collaborator. `StudentsApi` is the seam the record
//! store talks through: an HTTP implementation for the real backend and an
//! in-process one for tests and offline demos.

use std::fmt;

use serde_json::{json, Value};
use uuid::Uuid;

use crate::model::StudentRecord;
use crate::session::TokenPair;
use crate::wire;

/// Failure classes for remote calls. Auth failures are distinct from server
/// rejections, which are distinct from never reaching the server at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Auth(String),
    /// Server-provided detail, surfaced verbatim.
    Remote(String),
    Transport(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Auth(_) => "unauthorized",
            Self::Remote(_) => "remote_error",
            Self::Transport(_) => "transport_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Auth(m) | Self::Remote(m) | Self::Transport(m) => m,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

pub trait StudentsApi {
    fn login(&mut self, username: &str, password: &str) -> Result<TokenPair, ApiError>;
    fn list(&mut self, bearer: &str) -> Result<Vec<StudentRecord>, ApiError>;
    fn create(&mut self, bearer: &str, record: &StudentRecord) -> Result<StudentRecord, ApiError>;
    fn update(
        &mut self,
        bearer: &str,
        id: i64,
        record: &StudentRecord,
    ) -> Result<StudentRecord, ApiError>;
    fn delete(&mut self, bearer: &str, id: i64) -> Result<(), ApiError>;
}

fn record_to_wire(record: &StudentRecord) -> Result<Value, ApiError> {
    let mut memory = serde_json::to_value(record)
        .map_err(|e| ApiError::Transport(format!("failed to encode record: {}", e)))?;
    if let Some(obj) = memory.as_object_mut() {
        // the server owns id assignment; never send one
        obj.remove("id");
    }
    Ok(wire::to_wire(&memory))
}

fn record_from_wire(value: &Value) -> Result<StudentRecord, ApiError> {
    serde_json::from_value(wire::from_wire(value))
        .map_err(|e| ApiError::Remote(format!("unexpected response body: {}", e)))
}

// ---------------------------------------------------------------------------
// HTTP backend

pub struct HttpApi {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Self {
        HttpApi {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Classify a settled response: 401/403 are auth failures, any other
    /// non-success surfaces the server's `detail` verbatim.
    fn check(resp: reqwest::blocking::Response) -> Result<Value, ApiError> {
        let status = resp.status();
        if status.is_success() {
            if status == reqwest::StatusCode::NO_CONTENT {
                return Ok(Value::Null);
            }
            return resp
                .json::<Value>()
                .map_err(|e| ApiError::Remote(format!("unexpected response body: {}", e)));
        }

        let detail = resp
            .json::<Value>()
            .ok()
            .and_then(|body| body.get("detail").and_then(|d| d.as_str()).map(String::from))
            .unwrap_or_else(|| format!("request failed with status {}", status.as_u16()));

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            Err(ApiError::Auth(detail))
        } else {
            Err(ApiError::Remote(detail))
        }
    }

    fn transport(e: reqwest::Error) -> ApiError {
        ApiError::Transport(e.to_string())
    }
}

impl StudentsApi for HttpApi {
    fn login(&mut self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let resp = self
            .client
            .post(self.url("api/token/"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .map_err(Self::transport)?;
        let body = Self::check(resp)?;
        let access = body.get("access").and_then(|v| v.as_str());
        let refresh = body.get("refresh").and_then(|v| v.as_str());
        match (access, refresh) {
            (Some(a), Some(r)) => Ok(TokenPair {
                access: a.to_string(),
                refresh: r.to_string(),
            }),
            _ => Err(ApiError::Remote("login response missing tokens".to_string())),
        }
    }

    fn list(&mut self, bearer: &str) -> Result<Vec<StudentRecord>, ApiError> {
        let resp = self
            .client
            .get(self.url("api/students/"))
            .bearer_auth(bearer)
            .send()
            .map_err(Self::transport)?;
        let body = Self::check(resp)?;
        let rows = body
            .as_array()
            .ok_or_else(|| ApiError::Remote("expected a list of students".to_string()))?;
        rows.iter().map(record_from_wire).collect()
    }

    fn create(&mut self, bearer: &str, record: &StudentRecord) -> Result<StudentRecord, ApiError> {
        let payload = record_to_wire(record)?;
        let resp = self
            .client
            .post(self.url("api/students/"))
            .bearer_auth(bearer)
            .json(&payload)
            .send()
            .map_err(Self::transport)?;
        record_from_wire(&Self::check(resp)?)
    }

    fn update(
        &mut self,
        bearer: &str,
        id: i64,
        record: &StudentRecord,
    ) -> Result<StudentRecord, ApiError> {
        let payload = record_to_wire(record)?;
        let resp = self
            .client
            .put(self.url(&format!("api/students/{}/", id)))
            .bearer_auth(bearer)
            .json(&payload)
            .send()
            .map_err(Self::transport)?;
        record_from_wire(&Self::check(resp)?)
    }

    fn delete(&mut self, bearer: &str, id: i64) -> Result<(), ApiError> {
        let resp = self
            .client
            .delete(self.url(&format!("api/students/{}/", id)))
            .bearer_auth(bearer)
            .send()
            .map_err(Self::transport)?;
        Self::check(resp).map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// In-process backend

/// Backend living inside the daemon: sequential integer ids, uuid tokens,
/// one fixed master account. Rows are held wire-shaped so every call still
/// exercises the same translation path as the HTTP backend.
pub struct MemoryApi {
    username: String,
    password: String,
    issued: Option<String>,
    next_id: i64,
    rows: Vec<Value>,
}

impl MemoryApi {
    pub fn new() -> Self {
        MemoryApi {
            username: "master".to_string(),
            password: "admin123".to_string(),
            issued: None,
            next_id: 1,
            rows: Vec::new(),
        }
    }

    fn authorize(&self, bearer: &str) -> Result<(), ApiError> {
        match &self.issued {
            Some(token) if token == bearer => Ok(()),
            _ => Err(ApiError::Auth("invalid or expired token".to_string())),
        }
    }

    fn position(&self, id: i64) -> Result<usize, ApiError> {
        self.rows
            .iter()
            .position(|row| row.get("id").and_then(|v| v.as_i64()) == Some(id))
            .ok_or_else(|| ApiError::Remote("Not found.".to_string()))
    }
}

impl Default for MemoryApi {
    fn default() -> Self {
        Self::new()
    }
}

impl StudentsApi for MemoryApi {
    fn login(&mut self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        if username != self.username || password != self.password {
            return Err(ApiError::Auth(
                "No active account found with the given credentials".to_string(),
            ));
        }
        let access = Uuid::new_v4().to_string();
        let refresh = Uuid::new_v4().to_string();
        self.issued = Some(access.clone());
        Ok(TokenPair { access, refresh })
    }

    fn list(&mut self, bearer: &str) -> Result<Vec<StudentRecord>, ApiError> {
        self.authorize(bearer)?;
        self.rows.iter().map(record_from_wire).collect()
    }

    fn create(&mut self, bearer: &str, record: &StudentRecord) -> Result<StudentRecord, ApiError> {
        self.authorize(bearer)?;
        let mut row = record_to_wire(record)?;
        let id = self.next_id;
        self.next_id += 1;
        if let Some(obj) = row.as_object_mut() {
            obj.insert("id".to_string(), json!(id));
        }
        let saved = record_from_wire(&row)?;
        self.rows.push(row);
        Ok(saved)
    }

    fn update(
        &mut self,
        bearer: &str,
        id: i64,
        record: &StudentRecord,
    ) -> Result<StudentRecord, ApiError> {
        self.authorize(bearer)?;
        let pos = self.position(id)?;
        let mut row = record_to_wire(record)?;
        if let Some(obj) = row.as_object_mut() {
            obj.insert("id".to_string(), json!(id));
        }
        let saved = record_from_wire(&row)?;
        self.rows[pos] = row;
        Ok(saved)
    }

    fn delete(&mut self, bearer: &str, id: i64) -> Result<(), ApiError> {
        self.authorize(bearer)?;
        let pos = self.position(id)?;
        self.rows.remove(pos);
        Ok(())
    }
}
