//! The request pipeline: transport → status check → decode → validate.
//!
//! Each step runs only if the previous one succeeded; the first failure is
//! classified and returned, and nothing after it executes. There is exactly
//! one network attempt per call and no local recovery.

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::classifiers::{
    classify_request_failure, classify_response_status, classify_validation_failure,
};
use crate::identifiers::CallId;
use crate::schema::Schema;
use crate::transport::{HttpTransport, RequestDescriptor, RequestOptions, TransportFailure};
use crate::ClassifiedError;

/// Outcome of one pipeline run: the validated value or exactly one error.
pub type PipelineResult<T> = Result<T, ClassifiedError>;

/// Runs one request through the pipeline.
///
/// 1. Sends the request. Failing to get any response yields a
///    [`crate::RequestError`].
/// 2. A non-success status yields a [`crate::ResponseError`]; the body is
///    never read.
/// 3. A body that is not JSON yields a [`crate::RequestError`] with code
///    `NOTJSON`.
/// 4. JSON that `schema` rejects yields a [`crate::ValidationError`].
#[tracing::instrument(
    name = "pipeline.execute",
    skip_all,
    fields(call_id = %CallId::new_random(), method = %options.method(), url = %url)
)]
pub async fn execute<S>(
    transport: &dyn HttpTransport,
    url: Url,
    schema: &S,
    options: RequestOptions,
) -> PipelineResult<S::Output>
where
    S: Schema + ?Sized,
{
    let request = RequestDescriptor::new(url, options);

    let response = transport
        .send(request)
        .await
        .map_err(|failure| reject(classify_request_failure(failure)))?;

    let status = response.status();
    debug!(status, "response received");
    if !response.is_ok() {
        return Err(reject(classify_response_status(status)));
    }

    let body = response
        .body()
        .await
        .map_err(|failure| reject(classify_request_failure(failure)))?;

    let json: Value = serde_json::from_slice(&body).map_err(|err| {
        debug!(error = %err, bytes = body.len(), "response body is not JSON");
        reject(classify_request_failure(TransportFailure::InvalidJson))
    })?;

    let value = schema
        .decode(json)
        .map_err(|mismatch| reject(classify_validation_failure(&mismatch)))?;
    debug!(schema = schema.name(), "response validated");
    Ok(value)
}

fn reject(err: impl Into<ClassifiedError>) -> ClassifiedError {
    let err = err.into();
    warn!(kind = %err.kind(), code = err.code(), "{}", err.message());
    err
}
