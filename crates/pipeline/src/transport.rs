//! Transport port: the request description handed to a transport, the
//! response handle it returns, and the closed set of failure signals it may
//! report.
//!
//! Infrastructure crates implement [`HttpTransport`]; this crate never opens a
//! socket. Every low-level failure a transport observes must be reduced to a
//! [`TransportFailure`] before it crosses this boundary, so classification in
//! [`crate::classifiers`] never depends on a particular HTTP library's error
//! shape.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Value of the `Content-Type` header for url-encoded request bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

// ---------------------------------------------------------------------------
// Request description
// ---------------------------------------------------------------------------

/// HTTP method of a pipeline request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`: query parameters only, no body.
    Get,
    /// `POST`: carries a url-encoded [`FormBody`].
    Post,
}

impl Method {
    /// Returns the method name as sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------

/// Ordered header map with case-insensitive names.
///
/// Inserting a name that already exists (ignoring ASCII case) replaces the
/// existing entry in place: the last write wins, and the entry keeps its
/// original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`, replacing any entry with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .0
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => *entry = (name, value),
            None => self.0.push((name, value)),
        }
    }

    /// Builder-style [`Headers::insert`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Returns the value for `name`, compared case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> Extend<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        headers.extend(iter);
        headers
    }
}

// ---------------------------------------------------------------------------

/// Ordered key/value payload sent as `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody(Vec<(String, String)>);

impl FormBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair. Duplicate keys are kept, in order.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Encodes the pairs as url-encoded form text.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}

// ---------------------------------------------------------------------------

/// Everything about a request except its URL.
///
/// Built by the caller of [`crate::execute`]; combined with a URL into a
/// [`RequestDescriptor`] at the start of each pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestOptions {
    method: Method,
    headers: Headers,
    body: Option<FormBody>,
}

impl RequestOptions {
    /// A `GET` request with the given headers.
    pub fn get(headers: Headers) -> Self {
        Self {
            method: Method::Get,
            headers,
            body: None,
        }
    }

    /// A `POST` request carrying `body`.
    pub fn post(headers: Headers, body: FormBody) -> Self {
        Self {
            method: Method::Post,
            headers,
            body: Some(body),
        }
    }

    /// `POST` when a body is present, `GET` otherwise.
    pub fn from_parts(headers: Headers, body: Option<FormBody>) -> Self {
        match body {
            Some(body) => Self::post(headers, body),
            None => Self::get(headers),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> Option<&FormBody> {
        self.body.as_ref()
    }
}

// ---------------------------------------------------------------------------

/// A single, fully resolved HTTP request.
///
/// Created once per pipeline run and consumed by [`HttpTransport::send`].
/// There are no mutators; a descriptor describes exactly one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    url: Url,
    method: Method,
    headers: Headers,
    body: Option<FormBody>,
}

impl RequestDescriptor {
    /// Combines an absolute URL with request options.
    pub fn new(url: Url, options: RequestOptions) -> Self {
        Self {
            url,
            method: options.method,
            headers: options.headers,
            body: options.body,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> Option<&FormBody> {
        self.body.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Failure signals
// ---------------------------------------------------------------------------

/// The recognised low-level failure signals a transport may report.
///
/// Transports map their own error types onto these variants. Anything they
/// cannot recognise goes to [`TransportFailure::Other`] with a description
/// kept for logging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum TransportFailure {
    /// The remote host actively refused the connection.
    #[error("connection refused")]
    ConnectionRefused,

    /// The host name could not be resolved.
    #[error("host not found")]
    HostNotFound,

    /// The connection or the request timed out.
    #[error("request timed out")]
    TimedOut,

    /// The request was aborted before a response arrived.
    #[error("request aborted")]
    Aborted,

    /// The response body was read but is not valid JSON.
    #[error("response body is not valid JSON")]
    InvalidJson,

    /// Any other transport failure.
    #[error("transport failure: {0}")]
    Other(String),
}

// ---------------------------------------------------------------------------
// Port traits
// ---------------------------------------------------------------------------

/// A received HTTP response whose body has not been read yet.
#[async_trait]
pub trait HttpResponse: Send {
    /// The HTTP status code.
    fn status(&self) -> u16;

    /// Whether the status denotes success (`200..=299`).
    fn is_ok(&self) -> bool {
        (200..=299).contains(&self.status())
    }

    /// Reads the whole body. Consumes the response.
    async fn body(self: Box<Self>) -> Result<Vec<u8>, TransportFailure>;
}

/// Issues one HTTP request per call.
///
/// Implementations must not retry: a failure to obtain a response is reported
/// once, as a [`TransportFailure`]. A response with any status, including
/// 4xx/5xx, is a successful send.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        request: RequestDescriptor,
    ) -> Result<Box<dyn HttpResponse>, TransportFailure>;
}
