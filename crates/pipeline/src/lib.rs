//! Request execution and error classification for the Grepper client.
//!
//! This crate turns a URL, a response schema and request options into either
//! a validated typed value or one of three classified errors. It defines the
//! transport port that infrastructure crates implement; it never performs I/O
//! itself.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** [`HttpTransport`] and
//! [`HttpResponse`] are implemented by `http-transport` (over `reqwest`) and
//! by in-memory fakes in tests. The `client` crate builds requests and calls
//! [`execute`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`transport`] | Request description, response handle, `TransportFailure`, port traits |
//! | [`schema`] | `Schema` validator trait and the serde-backed `Shape` |
//! | [`errors`] | `ClassifiedError` and its per-kind records and codes |
//! | [`classifiers`] | Pure functions mapping raw signals onto error records |
//! | [`execute`](mod@execute) | The four-step request pipeline |
//! | [`identifiers`] | `CallId` for log correlation |

pub mod classifiers;
pub mod errors;
pub mod execute;
pub mod identifiers;
pub mod schema;
pub mod transport;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use classifiers::{
    classify_request_failure, classify_response_status, classify_validation_failure,
};
pub use errors::{
    ClassifiedError, ErrorKind, ErrorReport, RequestError, RequestErrorCode, ResponseError,
    ResponseErrorCode, ValidationError, ValidationErrorCode,
};
pub use execute::{execute, PipelineResult};
pub use identifiers::CallId;
pub use schema::{Schema, SchemaMismatch, Shape};
pub use transport::{
    FormBody, Headers, HttpResponse, HttpTransport, Method, RequestDescriptor, RequestOptions,
    TransportFailure, FORM_CONTENT_TYPE,
};
