//! # Xsrf Protection
//!
//! Double-submit cookie CSRF protection middleware.
//!
//! For state-changing HTTP methods (POST, PUT, PATCH, DELETE), the middleware
//! verifies that the anti-CSRF value carried by the client (cookie, header, or
//! body parameter) matches the claim embedded in a previously-issued token
//! payload attached to the request. Token issuance and signature verification
//! are the caller's responsibility.
//!
//! ## Features
//!
//! - ✅ **Double-Submit Pattern** - carrier value vs. token claim, exact match
//! - ✅ **Configurable** - carrier, attribute, claim names, protected and
//!   passthrough path prefixes
//! - ✅ **Payload Encodings** - decoded map, JSON text, or MessagePack bytes
//! - ✅ **Framework Agnostic** - consumes a narrow [`RequestView`] trait, not
//!   a concrete request type
//! - ✅ **Error Hook** - customize the 401 response on denial
//!
//! ## Quick Start
//!
//! ```rust
//! use xsrf_protection::{RequestSnapshot, TokenPayload, Verdict, XsrfConfig, XsrfMiddleware};
//!
//! let middleware = XsrfMiddleware::new(
//!     XsrfConfig::new()
//!         .with_path("/api/signin")
//!         .with_passthrough("/api/public"),
//! );
//!
//! let request = RequestSnapshot::new("POST", "/api/signin")
//!     .with_cookie("xCsrf", "csrftoken")
//!     .with_attribute("token", TokenPayload::claims([("csrf", "csrftoken")]));
//!
//! assert_eq!(middleware.verdict(&request), Verdict::Allowed);
//! ```
//!
//! ## In a handler chain
//!
//! ```rust
//! use xsrf_protection::{HttpResponse, RequestSnapshot, XsrfConfig, XsrfMiddleware};
//!
//! # tokio_test::block_on(async {
//! let middleware = XsrfMiddleware::new(XsrfConfig::default());
//!
//! // GET requests bypass verification entirely.
//! let request = RequestSnapshot::new("GET", "/api/profile");
//! let response = middleware
//!     .process(request, |_req| async { HttpResponse::ok() })
//!     .await;
//! assert_eq!(response.status, 200);
//!
//! // A protected POST without any carrier is denied.
//! let request = RequestSnapshot::new("POST", "/api/profile");
//! let response = middleware
//!     .process(request, |_req| async { HttpResponse::ok() })
//!     .await;
//! assert_eq!(response.status, 401);
//! # });
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod payload;

pub use config::{ErrorArguments, ErrorHandler, XsrfConfig};
pub use error::DenialReason;
pub use http::{HttpResponse, RequestSnapshot, RequestView};
pub use middleware::{Verdict, XsrfMiddleware};
pub use payload::TokenPayload;
