use crate::config::{ErrorArguments, XsrfConfig};
use crate::error::DenialReason;
use crate::http::{HttpResponse, RequestView};
use crate::payload::{claim_is_empty, TokenPayload};
use serde_json::{Map, Value};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Methods that can change server state and therefore require verification.
const MUTATING_METHODS: [&str; 4] = ["POST", "PUT", "PATCH", "DELETE"];

/// Outcome of running the double-submit check against one request.
///
/// The denial reason travels with the verdict instead of living on the
/// middleware instance, so concurrent requests cannot observe each other's
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Hand the request to the next handler in the chain.
    Allowed,
    /// Short-circuit with a 401.
    Denied(DenialReason),
}

/// Double-submit cookie verification middleware
#[derive(Debug, Clone)]
pub struct XsrfMiddleware {
    config: Arc<XsrfConfig>,
}

impl XsrfMiddleware {
    /// Create new middleware from a configuration.
    pub fn new(config: XsrfConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Access the configuration.
    pub fn config(&self) -> &XsrfConfig {
        &self.config
    }

    /// Whether a request with this method and path requires verification.
    ///
    /// Safe methods and passthrough prefixes bypass the check; otherwise the
    /// path must fall under a protected prefix.
    pub fn should_verify(&self, method: &str, path: &str) -> bool {
        if !MUTATING_METHODS.contains(&method) {
            return false;
        }
        let path = normalize_path(path);
        if self.matches_any(&self.config.passthrough, &path) {
            return false;
        }
        self.matches_any(&self.config.paths, &path)
    }

    /// Run the double-submit check and return the verdict.
    ///
    /// Pure and synchronous: reads the request view, never mutates shared
    /// state, emits tracing events as its only side effect.
    pub fn verdict(&self, request: &impl RequestView) -> Verdict {
        let method = request.method();
        if !MUTATING_METHODS.contains(&method) {
            info!(method, "safe method, access granted");
            return Verdict::Allowed;
        }

        let path = normalize_path(request.path());
        for passthrough in &self.config.passthrough {
            if prefix_matches(passthrough, &path) {
                info!(path = %path, prefix = %passthrough, "route ignored, access granted");
                return Verdict::Allowed;
            }
        }

        if !self.matches_any(&self.config.paths, &path) {
            return Verdict::Allowed;
        }

        match self.verify(request) {
            Ok(()) => Verdict::Allowed,
            Err(reason) => Verdict::Denied(reason),
        }
    }

    /// Run the middleware in a handler chain.
    ///
    /// On `Allowed` the downstream response is passed through untouched. On
    /// `Denied` the chain is short-circuited with a 401, optionally replaced
    /// by the configured error handler.
    pub async fn process<R, F, Fut>(&self, request: R, next: F) -> HttpResponse
    where
        R: RequestView,
        F: FnOnce(R) -> Fut,
        Fut: Future<Output = HttpResponse>,
    {
        match self.verdict(&request) {
            Verdict::Allowed => next(request).await,
            Verdict::Denied(reason) => self.deny(reason),
        }
    }

    /// Locate the anti-CSRF value: cookie, then first header value, then
    /// body parameter. First hit wins.
    pub fn anti_csrf_value(&self, request: &impl RequestView) -> Option<String> {
        let name = &self.config.anticsrf;
        request
            .cookie(name)
            .or_else(|| request.header(name))
            .or_else(|| request.body_param(name))
            .map(str::to_string)
    }

    fn verify(&self, request: &impl RequestView) -> Result<(), DenialReason> {
        let anti_csrf = self.anti_csrf_value(request).ok_or_else(|| {
            debug!(carrier = %self.config.anticsrf, "anti-csrf value not found");
            DenialReason::AntiCsrfNotFound
        })?;

        let decoded = self.resolve_payload(request)?.decode();
        let claim = self.fetch_claim(&decoded)?;

        // Exact string identity, no coercion: a non-string claim can never
        // equal the carrier value and falls through to the mismatch path.
        if claim.as_str() == Some(anti_csrf.as_str()) {
            debug!("match, access granted");
            Ok(())
        } else {
            debug!("mismatch, access denied");
            Err(DenialReason::TokenMismatch)
        }
    }

    fn resolve_payload<'a>(
        &'a self,
        request: &'a impl RequestView,
    ) -> Result<&'a TokenPayload, DenialReason> {
        if let Some(payload) = &self.config.payload {
            warn!("payload not supplied via attribute path");
            return Ok(payload);
        }
        request.attribute(&self.config.token_attr).ok_or_else(|| {
            debug!(attribute = %self.config.token_attr, "payload not found in request attribute");
            DenialReason::PayloadAttributeNotFound
        })
    }

    /// Look up the claim; succeeds for any present, non-empty value.
    fn fetch_claim<'a>(&self, decoded: &'a Map<String, Value>) -> Result<&'a Value, DenialReason> {
        let value = decoded.get(&self.config.claim).ok_or_else(|| {
            debug!(claim = %self.config.claim, "claim not found in token");
            DenialReason::ClaimNotFound
        })?;
        if claim_is_empty(value) {
            debug!(claim = %self.config.claim, "no value found in claim");
            return Err(DenialReason::ClaimEmpty);
        }
        Ok(value)
    }

    fn deny(&self, reason: DenialReason) -> HttpResponse {
        match &self.config.error_handler {
            Some(handler) => {
                let args = ErrorArguments {
                    message: reason.to_string(),
                };
                handler(HttpResponse::unauthorized(), &args)
                    .unwrap_or_else(HttpResponse::unauthorized)
            }
            None => HttpResponse::unauthorized(),
        }
    }

    fn matches_any(&self, prefixes: &[String], path: &str) -> bool {
        prefixes.iter().any(|prefix| prefix_matches(prefix, path))
    }
}

/// Prepend `/` and collapse repeated slashes.
fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len() + 1);
    normalized.push('/');
    let mut prev_slash = true;
    for c in path.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        normalized.push(c);
    }
    normalized
}

/// A prefix (trailing slash stripped) matches the path itself or anything
/// nested under it.
fn prefix_matches(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}
