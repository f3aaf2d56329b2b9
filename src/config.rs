use crate::http::HttpResponse;
use crate::payload::TokenPayload;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Argument bag handed to the error handler on denial. Serializable so a
/// handler can echo it into a JSON error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorArguments {
    /// Human-readable denial diagnostic.
    pub message: String,
}

/// Caller-supplied hook invoked on denial with the in-flight 401 response.
/// Returning `Some(response)` replaces the default response.
pub type ErrorHandler =
    Arc<dyn Fn(HttpResponse, &ErrorArguments) -> Option<HttpResponse> + Send + Sync>;

/// Double-submit verification configuration.
///
/// Every recognized option is a named field with a default, so unknown
/// options are a compile error rather than a silently ignored key. The
/// configuration is immutable once handed to the middleware and is shared
/// read-only across concurrent requests.
#[derive(Clone)]
pub struct XsrfConfig {
    /// Path prefixes where verification is enforced for mutating methods.
    pub paths: Vec<String>,

    /// Path prefixes exempted from verification.
    pub passthrough: Vec<String>,

    /// Carrier name for the anti-CSRF value (cookie, header, or body
    /// parameter, searched in that order).
    pub anticsrf: String,

    /// Request attribute holding the token payload.
    pub token_attr: String,

    /// Claim key expected to hold the anti-CSRF value inside the payload.
    pub claim: String,

    /// Pre-supplied payload; when set, attribute resolution is skipped.
    pub payload: Option<TokenPayload>,

    /// Hook invoked on denial, may substitute the 401 response.
    pub error_handler: Option<ErrorHandler>,
}

impl XsrfConfig {
    pub fn new() -> Self {
        Self {
            paths: vec!["/".to_string()],
            passthrough: Vec::new(),
            anticsrf: "xCsrf".to_string(),
            token_attr: "token".to_string(),
            claim: "csrf".to_string(),
            payload: None,
            error_handler: None,
        }
    }

    /// Protect a single path prefix (replaces the default `/`).
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.paths = vec![path.into()];
        self
    }

    /// Protect several path prefixes (replaces the default `/`).
    pub fn with_paths(mut self, paths: Vec<String>) -> Self {
        self.paths = paths;
        self
    }

    /// Exempt a single path prefix from verification.
    pub fn with_passthrough(mut self, path: impl Into<String>) -> Self {
        self.passthrough = vec![path.into()];
        self
    }

    /// Exempt several path prefixes from verification.
    pub fn with_passthroughs(mut self, paths: Vec<String>) -> Self {
        self.passthrough = paths;
        self
    }

    /// Set the anti-CSRF carrier name.
    pub fn with_anticsrf(mut self, name: impl Into<String>) -> Self {
        self.anticsrf = name.into();
        self
    }

    /// Set the request attribute holding the token payload.
    pub fn with_token_attr(mut self, name: impl Into<String>) -> Self {
        self.token_attr = name.into();
        self
    }

    /// Set the claim key name.
    pub fn with_claim(mut self, name: impl Into<String>) -> Self {
        self.claim = name.into();
        self
    }

    /// Supply the payload directly instead of reading a request attribute.
    pub fn with_payload(mut self, payload: impl Into<TokenPayload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Install an error handler invoked on denial.
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(HttpResponse, &ErrorArguments) -> Option<HttpResponse> + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }
}

impl Default for XsrfConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for XsrfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XsrfConfig")
            .field("paths", &self.paths)
            .field("passthrough", &self.passthrough)
            .field("anticsrf", &self.anticsrf)
            .field("token_attr", &self.token_attr)
            .field("claim", &self.claim)
            .field("payload", &self.payload)
            .field("error_handler", &self.error_handler.as_ref().map(|_| ".."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = XsrfConfig::default();
        assert_eq!(config.paths, vec!["/"]);
        assert!(config.passthrough.is_empty());
        assert_eq!(config.anticsrf, "xCsrf");
        assert_eq!(config.token_attr, "token");
        assert_eq!(config.claim, "csrf");
        assert!(config.payload.is_none());
        assert!(config.error_handler.is_none());
    }

    #[test]
    fn test_builder() {
        let config = XsrfConfig::new()
            .with_path("/api/signin")
            .with_passthroughs(vec!["/api/public".to_string(), "/ping".to_string()])
            .with_anticsrf("X-CSRF")
            .with_token_attr("jwt")
            .with_claim("xsrf");

        assert_eq!(config.paths, vec!["/api/signin"]);
        assert_eq!(config.passthrough, vec!["/api/public", "/ping"]);
        assert_eq!(config.anticsrf, "X-CSRF");
        assert_eq!(config.token_attr, "jwt");
        assert_eq!(config.claim, "xsrf");
    }

    #[test]
    fn test_payload_option() {
        let config = XsrfConfig::new().with_payload(TokenPayload::claims([("csrf", "abc")]));
        assert!(config.payload.is_some());
    }

    #[test]
    fn test_error_handler_option() {
        let config = XsrfConfig::new()
            .with_error_handler(|response, _args| Some(response.with_body(b"denied".to_vec())));
        assert!(config.error_handler.is_some());
    }
}
