//! Error types used throughout the client

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// How far a response body is kept when attached to an error.
const BODY_SNIPPET_LIMIT: usize = 2048;

/// Reasons the identity service rejects a sign-in, from the closed set
/// of codes its error body can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailureReason {
    /// The identity is not a well-formed email address.
    InvalidEmail,
    /// No account exists for the identity.
    EmailNotFound,
    /// The secret does not match.
    InvalidPassword,
    /// The account has been disabled by an administrator.
    UserDisabled,
}

impl AuthFailureReason {
    /// Parse a reason code from the error body's `message` field.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "INVALID_EMAIL" => Some(Self::InvalidEmail),
            "EMAIL_NOT_FOUND" => Some(Self::EmailNotFound),
            "INVALID_PASSWORD" => Some(Self::InvalidPassword),
            "USER_DISABLED" => Some(Self::UserDisabled),
            _ => None,
        }
    }

    /// The wire spelling of this reason.
    pub const fn as_code(self) -> &'static str {
        match self {
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::EmailNotFound => "EMAIL_NOT_FOUND",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::UserDisabled => "USER_DISABLED",
        }
    }
}

impl fmt::Display for AuthFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// One entry of the identity service's structured error list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub reason: String,
}

/// Error body shape shared by the identity endpoints:
/// `{"error": {"code": 400, "message": "EMAIL_NOT_FOUND", "errors": [...]}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
}

/// Main error type for embercloud operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Sign-in was rejected with a recognized domain reason. Never
    /// retried automatically; callers branch on `reason` to tell
    /// "wrong password" from "network down".
    #[error("authentication rejected: {reason}")]
    Authentication {
        reason: AuthFailureReason,
        /// The error body's own message text.
        message: String,
        /// The structured error list from the response body.
        details: Vec<ErrorDetail>,
    },

    /// The requested document does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The service answered with an unexpected status or an unreadable
    /// body; carries best-effort diagnostic context.
    #[error("unexpected response: status={status} reason={reason} body={body}")]
    UnexpectedResponse { status: u16, reason: String, body: String },

    /// The HTTP exchange itself failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl Error {
    /// Build an [`Error::UnexpectedResponse`] from response parts,
    /// keeping a bounded body snippet for diagnostics.
    pub(crate) fn unexpected(status: reqwest::StatusCode, body: &str) -> Self {
        Self::UnexpectedResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("unknown").to_owned(),
            body: truncated(body),
        }
    }
}

pub(crate) fn truncated(body: &str) -> String {
    if body.len() <= BODY_SNIPPET_LIMIT {
        return body.to_owned();
    }
    let mut end = BODY_SNIPPET_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes total)", &body[..end], body.len())
}

/// Result type alias for embercloud operations.
pub type Result<T> = std::result::Result<T, Error>;
