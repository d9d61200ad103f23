//! Grepper HTTP transport adapter.
//!
//! Implements the [`pipeline::HttpTransport`] trait over `reqwest`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Connection handling, TLS, and the mapping of
//! `reqwest` errors onto [`pipeline::TransportFailure`] live here. The
//! [`pipeline`] crate sees only [`pipeline::HttpTransport`].
//!
//! No timeout is configured and nothing is retried: each `send` is a single
//! attempt, and it ends when the underlying connection succeeds or fails.

use std::error::Error as StdError;
use std::io;

use async_trait::async_trait;
use pipeline::{HttpResponse, HttpTransport, Method, RequestDescriptor, TransportFailure};
use tracing::debug;

/// [`HttpTransport`] backed by a shared [`reqwest::Client`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing client, e.g. one configured with a proxy or custom
    /// root certificates.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: RequestDescriptor,
    ) -> Result<Box<dyn HttpResponse>, TransportFailure> {
        let method = match request.method() {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, request.url().clone());
        for (name, value) in request.headers().iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body() {
            builder = builder.body(body.encode());
        }

        let response = builder.send().await.map_err(|err| failure_from_reqwest(&err))?;
        Ok(Box::new(ReqwestResponse { inner: response }))
    }
}

struct ReqwestResponse {
    inner: reqwest::Response,
}

#[async_trait]
impl HttpResponse for ReqwestResponse {
    fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    async fn body(self: Box<Self>) -> Result<Vec<u8>, TransportFailure> {
        let bytes = self
            .inner
            .bytes()
            .await
            .map_err(|err| failure_from_reqwest(&err))?;
        Ok(bytes.to_vec())
    }
}

/// Reduces a `reqwest` error to a [`TransportFailure`].
///
/// `reqwest` does not expose OS error codes directly, so the error's source
/// chain is searched for an [`io::Error`]. Resolver failures surface from
/// `hyper-util` as a `"dns error"` in the chain.
pub fn failure_from_reqwest(err: &reqwest::Error) -> TransportFailure {
    debug!(
        error = %err,
        is_connect = err.is_connect(),
        is_timeout = err.is_timeout(),
        "transport error"
    );

    if err.is_timeout() {
        return TransportFailure::TimedOut;
    }
    if let Some(failure) = source_chain(err).find_map(failure_from_source) {
        return failure;
    }
    TransportFailure::Other(err.to_string())
}

fn source_chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&err| err.source())
}

fn failure_from_source(source: &(dyn StdError + 'static)) -> Option<TransportFailure> {
    if let Some(io_err) = source.downcast_ref::<io::Error>() {
        return failure_from_io_kind(io_err.kind());
    }
    if source.to_string().starts_with("dns error") {
        return Some(TransportFailure::HostNotFound);
    }
    None
}

/// Maps the `io::ErrorKind`s that carry a recognised meaning.
pub fn failure_from_io_kind(kind: io::ErrorKind) -> Option<TransportFailure> {
    match kind {
        io::ErrorKind::ConnectionRefused => Some(TransportFailure::ConnectionRefused),
        io::ErrorKind::TimedOut => Some(TransportFailure::TimedOut),
        io::ErrorKind::ConnectionAborted => Some(TransportFailure::Aborted),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_kinds_map_to_recognised_failures() {
        assert_eq!(
            failure_from_io_kind(io::ErrorKind::ConnectionRefused),
            Some(TransportFailure::ConnectionRefused)
        );
        assert_eq!(
            failure_from_io_kind(io::ErrorKind::TimedOut),
            Some(TransportFailure::TimedOut)
        );
        assert_eq!(
            failure_from_io_kind(io::ErrorKind::ConnectionAborted),
            Some(TransportFailure::Aborted)
        );
        assert_eq!(failure_from_io_kind(io::ErrorKind::PermissionDenied), None);
    }

    #[test]
    fn source_chain_finds_nested_io_errors() {
        #[derive(Debug)]
        struct Wrapper(io::Error);

        impl std::fmt::Display for Wrapper {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("client error (Connect)")
            }
        }

        impl StdError for Wrapper {
            fn source(&self) -> Option<&(dyn StdError + 'static)> {
                Some(&self.0)
            }
        }

        let err = Wrapper(io::Error::from(io::ErrorKind::ConnectionRefused));
        let failure = source_chain(&err).find_map(failure_from_source);
        assert_eq!(failure, Some(TransportFailure::ConnectionRefused));
    }

    #[test]
    fn resolver_errors_map_to_host_not_found() {
        #[derive(Debug)]
        struct Connect(Resolve);

        #[derive(Debug)]
        struct Resolve;

        impl std::fmt::Display for Connect {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("client error (Connect)")
            }
        }

        impl std::fmt::Display for Resolve {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("dns error: failed to lookup address information")
            }
        }

        impl StdError for Connect {
            fn source(&self) -> Option<&(dyn StdError + 'static)> {
                Some(&self.0)
            }
        }

        impl StdError for Resolve {}

        let err = Connect(Resolve);
        assert_eq!(failure_from_source(&err), None);
        assert_eq!(
            source_chain(&err).find_map(failure_from_source),
            Some(TransportFailure::HostNotFound)
        );
    }
}
