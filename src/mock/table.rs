//! Mock table: parsed mock entries and request matching.
//!
//! # Responsibilities
//! - Turn document entries (`"GET /api/users" = …`) into typed mock entries
//! - Validate methods, paths, statuses, and header values at parse time
//! - Match an incoming method + path against the loaded entries
//!
//! # Design Decisions
//! - Route keys are `"METHOD /path"` or `"/path"`; the method defaults to GET
//! - A bare value is served as `200 application/json`; a table containing
//!   only `status` / `headers` / `body` keys is a full response spec
//! - Validation happens while building the table so serving a mock can
//!   never fail at request time

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::{Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::config::loader::{Document, LoadError};
use crate::mock::matcher::PathPattern;

/// Error collected while building the mock table.
#[derive(Debug, thiserror::Error)]
pub enum MockError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("invalid mock entry `{key}` in {}: {message}", path.display())]
    Entry {
        path: PathBuf,
        key: String,
        message: String,
    },

    #[error("invalid mock exclude pattern `{pattern}`: {message}")]
    ExcludePattern { pattern: String, message: String },
}

/// Canned response served for a matched mock route.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: StatusCode,
    pub headers: Vec<(HeaderName, HeaderValue)>,
    pub body: Value,
}

impl MockResponse {
    /// Build the HTTP response. Status and headers were validated at parse
    /// time, so this cannot fail.
    pub fn to_http(&self) -> Response<Body> {
        let bytes = serde_json::to_vec(&self.body).unwrap_or_default();
        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &self.headers {
            response.headers_mut().insert(name.clone(), value.clone());
        }
        response
    }
}

/// Raw response shape as it appears in a mock document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawResponse {
    Spec(ResponseSpec),
    Value(Value),
}

/// A table holding only these keys is treated as a full response spec;
/// any other shape is served verbatim as the body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResponseSpec {
    #[serde(default = "default_status")]
    status: u16,
    #[serde(default)]
    headers: Vec<(String, String)>,
    #[serde(default)]
    body: Value,
}

fn default_status() -> u16 {
    200
}

/// One mock route: method + path pattern + canned response.
#[derive(Debug, Clone)]
pub struct MockEntry {
    pub method: Method,
    pub pattern: PathPattern,
    pub response: MockResponse,
}

impl MockEntry {
    /// Parse a `(route key, value)` document entry.
    pub fn from_key_value(key: &str, value: Value) -> Result<Self, String> {
        let mut parts = key.split_whitespace();
        let (method, path) = match (parts.next(), parts.next(), parts.next()) {
            (Some(path), None, _) => (Method::GET, path),
            (Some(method), Some(path), None) => {
                let method = method
                    .parse::<Method>()
                    .map_err(|_| format!("`{method}` is not a valid HTTP method"))?;
                (method, path)
            }
            _ => return Err("route key must be `/path` or `METHOD /path`".to_string()),
        };
        if !path.starts_with('/') {
            return Err(format!("path `{path}` must start with `/`"));
        }

        let response = match serde_json::from_value::<RawResponse>(value) {
            Ok(RawResponse::Spec(spec)) => {
                let status = StatusCode::from_u16(spec.status)
                    .map_err(|_| format!("`{}` is not a valid status code", spec.status))?;
                let mut headers = Vec::with_capacity(spec.headers.len());
                for (name, value) in spec.headers {
                    let name = name
                        .parse::<HeaderName>()
                        .map_err(|_| format!("`{name}` is not a valid header name"))?;
                    let value = HeaderValue::from_str(&value)
                        .map_err(|_| format!("invalid value for header `{name}`"))?;
                    headers.push((name, value));
                }
                MockResponse {
                    status,
                    headers,
                    body: spec.body,
                }
            }
            Ok(RawResponse::Value(body)) => MockResponse {
                status: StatusCode::OK,
                headers: Vec::new(),
                body,
            },
            Err(e) => return Err(e.to_string()),
        };

        Ok(Self {
            method,
            pattern: PathPattern::parse(path),
            response,
        })
    }
}

/// The full set of loaded mock routes, rebuilt wholesale on every reload.
#[derive(Debug, Clone, Default)]
pub struct MockTable {
    entries: Vec<MockEntry>,
}

impl MockTable {
    pub fn new(entries: Vec<MockEntry>) -> Self {
        Self { entries }
    }

    /// First entry matching the method and path, in file order.
    pub fn match_request(&self, method: &Method, path: &str) -> Option<&MockEntry> {
        self.entries
            .iter()
            .find(|entry| entry.method == *method && entry.pattern.matches(path).is_some())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[MockEntry] {
        &self.entries
    }
}

/// Convert every route in a mock document, reporting bad entries and
/// keeping the good ones.
pub fn parse_entries(
    path: &Path,
    doc: Document,
    on_error: &mut dyn FnMut(MockError),
) -> Vec<MockEntry> {
    let mut entries = Vec::with_capacity(doc.len());
    for (key, value) in doc {
        match MockEntry::from_key_value(&key, value) {
            Ok(entry) => entries.push(entry),
            Err(message) => on_error(MockError::Entry {
                path: path.to_path_buf(),
                key,
                message,
            }),
        }
    }
    entries
}
