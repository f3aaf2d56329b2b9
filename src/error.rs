use thiserror::Error;

/// Why a request failed double-submit verification.
///
/// The display text of each variant is the diagnostic message handed to the
/// error handler and emitted through tracing. Every variant resolves to an
/// HTTP 401 unless the configured error handler substitutes its own response.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The anti-CSRF value was not present in any carrier (cookie, header,
    /// or body parameter).
    #[error("anti-csrf value not found")]
    AntiCsrfNotFound,

    /// No payload was pre-supplied and the token request attribute is absent.
    #[error("payload not found in request attribute")]
    PayloadAttributeNotFound,

    /// The claim key is absent from the decoded payload.
    #[error("claim not found in token")]
    ClaimNotFound,

    /// The claim key is present but holds no usable value.
    #[error("no value found in claim")]
    ClaimEmpty,

    /// The claim value and the anti-CSRF value differ.
    #[error("token and anti-csrf value don't match")]
    TokenMismatch,
}
