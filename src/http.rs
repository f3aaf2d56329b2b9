use crate::payload::TokenPayload;
use std::collections::HashMap;

/// Read-only view of an incoming request, as consumed by the filter.
///
/// The filter needs nothing beyond these six capabilities, so any web
/// framework's request type can be adapted with a thin impl instead of a
/// conversion into a concrete struct. Headers are read first-value-wins.
pub trait RequestView {
    /// HTTP method, uppercase (`"POST"`, `"GET"`, ...).
    fn method(&self) -> &str;

    /// Request path, before normalization.
    fn path(&self) -> &str;

    /// Value of the named cookie, if present.
    fn cookie(&self, name: &str) -> Option<&str>;

    /// First value of the named header, if present. HTTP header names are
    /// case-insensitive; adapters must match accordingly.
    fn header(&self, name: &str) -> Option<&str>;

    /// Named parameter from the parsed request body, if present.
    fn body_param(&self, name: &str) -> Option<&str>;

    /// Named attribute attached to the request by an upstream middleware,
    /// typically the decoded (or still-encoded) token payload.
    fn attribute(&self, name: &str) -> Option<&TokenPayload>;
}

/// Owned request view for tests and frameworks without their own request type.
#[derive(Debug, Clone, Default)]
pub struct RequestSnapshot {
    pub method: String,
    pub path: String,
    pub cookies: HashMap<String, String>,
    pub headers: HashMap<String, Vec<String>>,
    pub body_params: HashMap<String, String>,
    pub attributes: HashMap<String, TokenPayload>,
}

impl RequestSnapshot {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Header names are stored lowercased, so lookups are case-insensitive.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .entry(name.into().to_lowercase())
            .or_default()
            .push(value.into());
        self
    }

    pub fn with_body_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.body_params.insert(name.into(), value.into());
        self
    }

    /// Parse a urlencoded form body into the body parameter map.
    /// Pairs that fail to parse are dropped silently.
    pub fn with_form_body(mut self, body: &str) -> Self {
        if let Ok(pairs) = serde_urlencoded::from_str::<Vec<(String, String)>>(body) {
            self.body_params.extend(pairs);
        }
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, payload: TokenPayload) -> Self {
        self.attributes.insert(name.into(), payload);
        self
    }
}

impl RequestView for RequestSnapshot {
    fn method(&self) -> &str {
        &self.method
    }

    fn path(&self) -> &str {
        &self.path
    }

    fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    fn body_param(&self, name: &str) -> Option<&str> {
        self.body_params.get(name).map(String::as_str)
    }

    fn attribute(&self, name: &str) -> Option<&TokenPayload> {
        self.attributes.get(name)
    }
}

/// HTTP response wrapper
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn unauthorized() -> Self {
        Self::new(401)
    }

    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.headers.insert(key, value);
        self
    }
}
