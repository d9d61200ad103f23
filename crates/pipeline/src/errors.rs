//! Classified error taxonomy for the request pipeline.
//!
//! Every failed pipeline run ends in exactly one [`ClassifiedError`]. The
//! variant records *where* the run failed:
//!
//! | Kind | Failure domain |
//! |------|----------------|
//! | [`ErrorKind::Request`] | No HTTP response obtained, or the body was not JSON |
//! | [`ErrorKind::Response`] | A response arrived with a non-success status |
//! | [`ErrorKind::Validation`] | The JSON body does not have the expected shape |
//!
//! Each kind has a closed set of string codes and a fixed message per code.
//! Codes and messages are stable and safe to match on; the values are
//! produced by the functions in [`crate::classifiers`].

use serde::Serialize;
use thiserror::Error;

use crate::TransportFailure;

// ---------------------------------------------------------------------------
// Kind discriminant
// ---------------------------------------------------------------------------

/// Discriminant of a [`ClassifiedError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// No usable response: transport failure or a body that is not JSON.
    Request,
    /// A response arrived with a status outside `200..=299`.
    Response,
    /// The JSON body does not match the expected schema.
    Validation,
}

impl ErrorKind {
    /// Human-readable title shared by every error of this kind.
    pub fn title(self) -> &'static str {
        match self {
            ErrorKind::Request => "Request Error",
            ErrorKind::Response => "Response Error",
            ErrorKind::Validation => "Validation Error",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Request => "Request",
            ErrorKind::Response => "Response",
            ErrorKind::Validation => "Validation",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Codes
// ---------------------------------------------------------------------------

/// Code of a [`RequestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestErrorCode {
    /// A transport failure with no recognised signal.
    Unexpected,
    /// The server refused the connection.
    Refused,
    /// The host name did not resolve.
    NotFound,
    /// The request timed out.
    TimedOut,
    /// The connection was aborted.
    Aborted,
    /// The body could not be parsed as JSON.
    NotJson,
}

impl RequestErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestErrorCode::Unexpected => "UNEXPECTED",
            RequestErrorCode::Refused => "REFUSED",
            RequestErrorCode::NotFound => "NOTFOUND",
            RequestErrorCode::TimedOut => "TIMEDOUT",
            RequestErrorCode::Aborted => "ABORTED",
            RequestErrorCode::NotJson => "NOTJSON",
        }
    }

    /// Fixed message for this code.
    ///
    /// An aborted request reports the same message as a timed-out one.
    pub fn message(self) -> &'static str {
        match self {
            RequestErrorCode::Unexpected => "Unexpected error occurred.",
            RequestErrorCode::Refused => "Connection refused.",
            RequestErrorCode::NotFound => "Server not found.",
            RequestErrorCode::TimedOut | RequestErrorCode::Aborted => "Request timed out.",
            RequestErrorCode::NotJson => "Failed to parse JSON response.",
        }
    }
}

/// Code of a [`ResponseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseErrorCode {
    /// Any failing status without a dedicated code.
    Unexpected,
    /// `401`: the API key was rejected.
    Unauthorized,
    /// `429`: too many requests.
    #[serde(rename = "RATE_LIMIT")]
    RateLimit,
    /// `500`: the service failed internally.
    Internal,
    /// `503`: the service is temporarily offline.
    Unavailable,
}

impl ResponseErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseErrorCode::Unexpected => "UNEXPECTED",
            ResponseErrorCode::Unauthorized => "UNAUTHORIZED",
            ResponseErrorCode::RateLimit => "RATE_LIMIT",
            ResponseErrorCode::Internal => "INTERNAL",
            ResponseErrorCode::Unavailable => "UNAVAILABLE",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ResponseErrorCode::Unexpected => "An unknown error occurred. Please try again.",
            ResponseErrorCode::Unauthorized => "Invalid API KEY.",
            ResponseErrorCode::RateLimit => "Too many requests.",
            ResponseErrorCode::Internal => "Internal service error.",
            ResponseErrorCode::Unavailable => "Temporarily offline, try again later.",
        }
    }
}

/// Code of a [`ValidationError`]. There is only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationErrorCode {
    /// The body does not match the schema.
    Schema,
}

impl ValidationErrorCode {
    pub fn as_str(self) -> &'static str {
        "SCHEMA"
    }

    pub fn message(self) -> &'static str {
        "Response does not match expected schema."
    }
}

// ---------------------------------------------------------------------------
// Per-kind records
// ---------------------------------------------------------------------------

/// No HTTP response was obtained, or its body could not be parsed as JSON.
///
/// Keeps an owned copy of the transport signal it was classified from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .code.message())]
pub struct RequestError {
    code: RequestErrorCode,
    #[source]
    cause: TransportFailure,
}

impl RequestError {
    pub(crate) fn new(code: RequestErrorCode, cause: TransportFailure) -> Self {
        Self { code, cause }
    }

    pub fn code(&self) -> RequestErrorCode {
        self.code
    }

    pub fn message(&self) -> &'static str {
        self.code.message()
    }

    /// The transport signal this error was classified from.
    pub fn cause(&self) -> &TransportFailure {
        &self.cause
    }
}

/// An HTTP response arrived, but its status denotes failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .code.message())]
pub struct ResponseError {
    code: ResponseErrorCode,
    status: u16,
}

impl ResponseError {
    pub(crate) fn new(code: ResponseErrorCode, status: u16) -> Self {
        Self { code, status }
    }

    pub fn code(&self) -> ResponseErrorCode {
        self.code
    }

    pub fn message(&self) -> &'static str {
        self.code.message()
    }

    /// The HTTP status the response carried.
    pub fn status(&self) -> u16 {
        self.status
    }
}

/// The body parsed as JSON but does not match the expected schema.
///
/// Carries no detail about which field failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .code.message())]
pub struct ValidationError {
    code: ValidationErrorCode,
}

impl ValidationError {
    pub(crate) fn new() -> Self {
        Self {
            code: ValidationErrorCode::Schema,
        }
    }

    pub fn code(&self) -> ValidationErrorCode {
        self.code
    }

    pub fn message(&self) -> &'static str {
        self.code.message()
    }
}

// ---------------------------------------------------------------------------
// Classified error
// ---------------------------------------------------------------------------

/// The terminal failure of one pipeline run.
///
/// Scoped to a single call: nothing about it affects the client that issued
/// the call, and callers decide for themselves whether to try again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifiedError {
    /// See [`RequestError`].
    #[error(transparent)]
    Request(#[from] RequestError),

    /// See [`ResponseError`].
    #[error(transparent)]
    Response(#[from] ResponseError),

    /// See [`ValidationError`].
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ClassifiedError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClassifiedError::Request(_) => ErrorKind::Request,
            ClassifiedError::Response(_) => ErrorKind::Response,
            ClassifiedError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// The stable string code, e.g. `"REFUSED"` or `"RATE_LIMIT"`.
    pub fn code(&self) -> &'static str {
        match self {
            ClassifiedError::Request(err) => err.code().as_str(),
            ClassifiedError::Response(err) => err.code().as_str(),
            ClassifiedError::Validation(err) => err.code().as_str(),
        }
    }

    pub fn title(&self) -> &'static str {
        self.kind().title()
    }

    pub fn message(&self) -> &'static str {
        match self {
            ClassifiedError::Request(err) => err.message(),
            ClassifiedError::Response(err) => err.message(),
            ClassifiedError::Validation(err) => err.message(),
        }
    }

    /// The HTTP status, for [`ErrorKind::Response`] only.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClassifiedError::Response(err) => Some(err.status()),
            _ => None,
        }
    }

    /// A serialisable snapshot of this error.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            code: self.code(),
            title: self.title(),
            message: self.message(),
            status: self.status(),
        }
    }
}

/// Flat, serialisable view of a [`ClassifiedError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Which stage of the pipeline failed.
    pub kind: ErrorKind,
    /// Stable string code, e.g. `"NOTJSON"`.
    pub code: &'static str,
    /// Title shared by every error of this kind.
    pub title: &'static str,
    /// Fixed message for the code.
    pub message: &'static str,
    /// HTTP status; present for response errors only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_are_fixed_per_kind() {
        assert_eq!(ErrorKind::Request.title(), "Request Error");
        assert_eq!(ErrorKind::Response.title(), "Response Error");
        assert_eq!(ErrorKind::Validation.title(), "Validation Error");
    }

    #[test]
    fn serialised_codes_match_string_codes() {
        let request = [
            RequestErrorCode::Unexpected,
            RequestErrorCode::Refused,
            RequestErrorCode::NotFound,
            RequestErrorCode::TimedOut,
            RequestErrorCode::Aborted,
            RequestErrorCode::NotJson,
        ];
        for code in request {
            assert_eq!(
                serde_json::to_value(code).unwrap(),
                serde_json::Value::from(code.as_str())
            );
        }

        let response = [
            ResponseErrorCode::Unexpected,
            ResponseErrorCode::Unauthorized,
            ResponseErrorCode::RateLimit,
            ResponseErrorCode::Internal,
            ResponseErrorCode::Unavailable,
        ];
        for code in response {
            assert_eq!(
                serde_json::to_value(code).unwrap(),
                serde_json::Value::from(code.as_str())
            );
        }

        assert_eq!(
            serde_json::to_value(ValidationErrorCode::Schema).unwrap(),
            serde_json::Value::from("SCHEMA")
        );
    }

    #[test]
    fn report_includes_status_only_for_response_errors() {
        let response: ClassifiedError =
            ResponseError::new(ResponseErrorCode::RateLimit, 429).into();
        let json = serde_json::to_value(response.report()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "Response",
                "code": "RATE_LIMIT",
                "title": "Response Error",
                "message": "Too many requests.",
                "status": 429,
            })
        );

        let validation: ClassifiedError = ValidationError::new().into();
        let json = serde_json::to_value(validation.report()).unwrap();
        assert!(json.get("status").is_none());
        assert_eq!(json["code"], "SCHEMA");
    }

    #[test]
    fn display_is_the_message_and_source_is_the_cause() {
        use std::error::Error as _;

        let err: ClassifiedError =
            RequestError::new(RequestErrorCode::Refused, TransportFailure::ConnectionRefused)
                .into();
        assert_eq!(err.to_string(), "Connection refused.");
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("connection refused"));
    }
}
