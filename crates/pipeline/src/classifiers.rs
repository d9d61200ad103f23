//! Pure functions mapping raw failure signals onto [`crate::errors`] records.
//!
//! All three are total: every input produces a record and none of them can
//! fail. Classifying the same input twice yields the same kind, code and
//! message.

use tracing::debug;

use crate::errors::{
    RequestError, RequestErrorCode, ResponseError, ResponseErrorCode, ValidationError,
};
use crate::schema::SchemaMismatch;
use crate::TransportFailure;

/// Classifies a failure to obtain (or parse) a response.
///
/// Unrecognised signals degrade to [`RequestErrorCode::Unexpected`].
pub fn classify_request_failure(failure: TransportFailure) -> RequestError {
    let code = match &failure {
        TransportFailure::InvalidJson => RequestErrorCode::NotJson,
        TransportFailure::ConnectionRefused => RequestErrorCode::Refused,
        TransportFailure::HostNotFound => RequestErrorCode::NotFound,
        TransportFailure::TimedOut => RequestErrorCode::TimedOut,
        TransportFailure::Aborted => RequestErrorCode::Aborted,
        TransportFailure::Other(_) => RequestErrorCode::Unexpected,
    };
    RequestError::new(code, failure)
}

/// Classifies a non-success HTTP status.
///
/// Only the listed statuses are recognised; there is no range matching.
pub fn classify_response_status(status: u16) -> ResponseError {
    let code = match status {
        401 => ResponseErrorCode::Unauthorized,
        429 => ResponseErrorCode::RateLimit,
        500 => ResponseErrorCode::Internal,
        503 => ResponseErrorCode::Unavailable,
        _ => ResponseErrorCode::Unexpected,
    };
    ResponseError::new(code, status)
}

/// Classifies a schema mismatch. The validator's diagnostic is logged and
/// then dropped.
pub fn classify_validation_failure(mismatch: &SchemaMismatch) -> ValidationError {
    debug!(schema = mismatch.schema(), detail = mismatch.detail(), "schema mismatch");
    ValidationError::new()
}
