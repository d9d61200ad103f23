//! Client configuration and the headers derived from it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pipeline::{Headers, FORM_CONTENT_TYPE};
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GREPPER_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "GREPPER_BASE_URL";

/// Errors raised while building a [`crate::Client`].
///
/// Per-call failures are never reported here; see [`pipeline::ClassifiedError`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no API key: set {var} or pass one explicitly")]
    MissingApiKey { var: &'static str },

    #[error("invalid base URL '{url}'")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL '{url}' must be an absolute http or https URL")]
    UnsupportedBaseUrl { url: String },

    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },
}

/// Options for [`crate::Client::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    /// API key; sent as HTTP Basic credentials with an empty password.
    pub api_key: String,

    /// Extra headers sent with every request. They may override
    /// `Content-Type` but never `Authorization`.
    #[serde(default)]
    pub headers: Vec<(String, String)>,

    /// Service root. Defaults to [`crate::DEFAULT_BASE_URL`].
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ClientOptions {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Reads [`API_KEY_ENV`] and [`BASE_URL_ENV`] from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`ClientOptions::from_env`] with a custom variable source.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &str| lookup(var).filter(|value| !value.is_empty());
        let api_key = read(API_KEY_ENV).ok_or(ConfigError::MissingApiKey { var: API_KEY_ENV })?;
        Ok(Self {
            api_key,
            headers: Vec::new(),
            base_url: read(BASE_URL_ENV),
        })
    }

    /// The fixed header set sent with every request.
    pub(crate) fn request_headers(&self) -> Result<Headers, ConfigError> {
        let mut headers = Headers::new().with("Content-Type", FORM_CONTENT_TYPE);
        for (name, value) in &self.headers {
            if !is_valid_header(name, value) {
                return Err(ConfigError::InvalidHeader { name: name.clone() });
            }
            headers.insert(name.as_str(), value.as_str());
        }
        headers.insert("Authorization", basic_auth(&self.api_key));
        Ok(headers)
    }
}

/// `Basic base64(api_key + ":")`.
pub fn basic_auth(api_key: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{api_key}:")))
}

// Same rules the transport applies when it builds the request.
fn is_valid_header(name: &str, value: &str) -> bool {
    HeaderName::from_bytes(name.as_bytes()).is_ok() && HeaderValue::from_str(value).is_ok()
}
