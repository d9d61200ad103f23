//! The endpoint table and URL construction.

use tracing::warn;
use url::Url;

use crate::answers::AnswerId;
use crate::config::ConfigError;

/// Service root used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.grepper.com/v1";

/// A named resource path below the service root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `{base}/answers/search`
    Search,
    /// `{base}/answers`, optionally followed by an answer id.
    Answer,
}

/// Absolute URLs for every [`Endpoint`], resolved once from the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    root: String,
    search: Url,
    answer: Url,
}

impl Endpoints {
    /// Resolves the table from `base_url`, dropping one trailing `/`.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let root = base_url.strip_suffix('/').unwrap_or(base_url);
        let parse = |raw: String| {
            Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl {
                url: base_url.to_string(),
                source,
            })
        };

        let base = parse(format!("{root}/"))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(ConfigError::UnsupportedBaseUrl {
                url: base_url.to_string(),
            });
        }

        Ok(Self {
            root: root.to_string(),
            search: parse(format!("{root}/answers/search"))?,
            answer: parse(format!("{root}/answers"))?,
        })
    }

    /// The configured root without its trailing slash.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Builds the URL for one call.
    ///
    /// An id of `0` is treated as absent and not appended to the path.
    pub fn url(&self, endpoint: Endpoint, id: Option<AnswerId>, query: &[(&str, String)]) -> Url {
        let mut url = match endpoint {
            Endpoint::Search => self.search.clone(),
            Endpoint::Answer => self.answer.clone(),
        };

        match id {
            Some(id) if id.as_u64() != 0 => {
                if let Ok(mut segments) = url.path_segments_mut() {
                    segments.push(&id.to_string());
                }
            }
            Some(_) => warn!(?endpoint, "answer id 0 is not appended to the request path"),
            None => {}
        }

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        }
        url
    }
}
