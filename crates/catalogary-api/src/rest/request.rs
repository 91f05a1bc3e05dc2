// Request description
//
// A `Request` is a plain value the engine turns into one HTTP call. Resource
// clients build them; nothing here performs I/O.

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::config::ResponseMode;

/// One file in a multipart upload.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub content: Bytes,
    pub mime: Option<String>,
}

/// The body actually sent, after precedence is applied.
#[derive(Debug, Clone, Copy)]
pub enum Body<'a> {
    /// Multipart upload; suppresses `data` and `json`.
    Files(&'a [FilePart]),
    /// Raw body, serialized from JSON by the engine.
    Data(&'a Value),
    /// JSON body.
    Json(&'a Value),
}

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub flags: Vec<String>,
    /// Replaces the default JSON headers entirely when set.
    pub headers: Option<HeaderMap>,
    pub data: Option<Value>,
    pub json: Option<Value>,
    pub files: Vec<FilePart>,
    pub trailing: bool,
    /// Use `path` verbatim instead of prefixing the client's base URL.
    pub absolute: bool,
    /// Per-call override of the client's response mode.
    pub mode: Option<ResponseMode>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            flags: Vec::new(),
            headers: None,
            data: None,
            json: None,
            files: Vec::new(),
            trailing: false,
            absolute: false,
            mode: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Add a param only when a value is present; absent values are omitted
    /// rather than sent empty.
    pub fn param_opt(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }

    pub fn file(mut self, part: FilePart) -> Self {
        self.files.push(part);
        self
    }

    pub fn trailing(mut self) -> Self {
        self.trailing = true;
        self
    }

    pub fn absolute(mut self) -> Self {
        self.absolute = true;
        self
    }

    pub fn mode(mut self, mode: ResponseMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Return the raw response for this call even on error statuses.
    pub fn advanced(self) -> Self {
        self.mode(ResponseMode::Advanced)
    }

    /// Raise on error statuses for this call regardless of the client mode.
    pub fn strict(self) -> Self {
        self.mode(ResponseMode::Strict)
    }

    /// Resolve which body is sent: files, else data, else json.
    pub fn body(&self) -> Option<Body<'_>> {
        if !self.files.is_empty() {
            return Some(Body::Files(&self.files));
        }
        // Empty containers count as absent, like an unset body.
        let present = |v: &&Value| !is_blank(v);
        if let Some(data) = self.data.as_ref().filter(present) {
            return Some(Body::Data(data));
        }
        self.json.as_ref().filter(present).map(Body::Json)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(m) => m.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
