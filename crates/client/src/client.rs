//! The [`Client`] and its three operations.

use std::sync::Arc;

use http_transport::ReqwestTransport;
use pipeline::{execute, FormBody, Headers, HttpTransport, PipelineResult, RequestOptions, Schema};
use tracing::instrument;

use crate::answers::{Answer, AnswerId, UpdateOutcome, ANSWER, ANSWER_LIST, UPDATE_RECEIPT};
use crate::config::{ClientOptions, ConfigError};
use crate::endpoints::{Endpoint, Endpoints, DEFAULT_BASE_URL};

/// Minimum similarity score used by [`Client::search`] when none is given.
pub const DEFAULT_SIMILARITY: u32 = 60;

/// Typed client for the answers API.
///
/// Cheap to clone; clones share the transport. Headers are fixed at
/// construction and never change, so one client can serve any number of
/// concurrent calls.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn HttpTransport>,
    headers: Headers,
    endpoints: Endpoints,
}

impl Client {
    /// Builds a client that talks HTTP through [`ReqwestTransport`].
    pub fn new(options: ClientOptions) -> Result<Self, ConfigError> {
        Self::with_transport(options, Arc::new(ReqwestTransport::new()))
    }

    /// Builds a client on top of any [`HttpTransport`].
    pub fn with_transport(
        options: ClientOptions,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ConfigError> {
        let endpoints = Endpoints::new(options.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;
        let headers = options.request_headers()?;
        Ok(Self {
            transport,
            headers,
            endpoints,
        })
    }

    /// The service root, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.endpoints.root()
    }

    /// Searches answers matching `query`.
    ///
    /// `similarity` (default [`DEFAULT_SIMILARITY`]) is the minimum match
    /// score; higher is stricter.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        similarity: Option<u32>,
    ) -> PipelineResult<Vec<Answer>> {
        let similarity = similarity.unwrap_or(DEFAULT_SIMILARITY);
        let params = [("query", query.to_string()), ("similarity", similarity.to_string())];
        let list = self
            .query(Endpoint::Search, None, &params, None, &ANSWER_LIST)
            .await?;
        Ok(list.data)
    }

    /// Fetches one answer by id.
    #[instrument(skip(self))]
    pub async fn answer(&self, id: AnswerId) -> PipelineResult<Answer> {
        self.query(Endpoint::Answer, Some(id), &[], None, &ANSWER)
            .await
    }

    /// Replaces the content of an answer.
    #[instrument(skip(self, content), fields(content_len = content.len()))]
    pub async fn update(&self, id: AnswerId, content: &str) -> PipelineResult<UpdateOutcome> {
        let body = FormBody::new().with("answer[content]", content);
        let receipt = self
            .query(Endpoint::Answer, Some(id), &[], Some(body), &UPDATE_RECEIPT)
            .await?;
        Ok(receipt.into())
    }

    async fn query<S: Schema>(
        &self,
        endpoint: Endpoint,
        id: Option<AnswerId>,
        params: &[(&str, String)],
        body: Option<FormBody>,
        schema: &S,
    ) -> PipelineResult<S::Output> {
        let url = self.endpoints.url(endpoint, id, params);
        let options = RequestOptions::from_parts(self.headers.clone(), body);
        execute(&*self.transport, url, schema, options).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Headers hold the credentials.
        f.debug_struct("Client")
            .field("base_url", &self.base_url())
            .finish_non_exhaustive()
    }
}
