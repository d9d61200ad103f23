//! Client operations against a scripted in-memory transport.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use client::{
    AnswerId, Client, ClientOptions, ConfigError, ErrorKind, UpdateOutcome, DEFAULT_BASE_URL,
};
use pipeline::{HttpResponse, HttpTransport, Method, RequestDescriptor, TransportFailure};
use serde_json::{json, Value};

/// Replies to every request with the same status and JSON body and keeps a
/// copy of each request it sees.
struct ScriptedTransport {
    status: u16,
    body: Value,
    sent: Mutex<Vec<RequestDescriptor>>,
}

impl ScriptedTransport {
    fn new(status: u16, body: Value) -> Arc<Self> {
        Arc::new(Self {
            status,
            body,
            sent: Mutex::new(Vec::new()),
        })
    }

    fn only_request(&self) -> RequestDescriptor {
        let sent = self.sent.lock().unwrap();
        assert_eq!(sent.len(), 1, "expected exactly one request");
        sent[0].clone()
    }
}

struct ScriptedResponse {
    status: u16,
    body: Vec<u8>,
}

#[async_trait]
impl HttpResponse for ScriptedResponse {
    fn status(&self) -> u16 {
        self.status
    }

    async fn body(self: Box<Self>) -> Result<Vec<u8>, TransportFailure> {
        Ok(self.body)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(
        &self,
        request: RequestDescriptor,
    ) -> Result<Box<dyn HttpResponse>, TransportFailure> {
        self.sent.lock().unwrap().push(request);
        Ok(Box::new(ScriptedResponse {
            status: self.status,
            body: self.body.to_string().into_bytes(),
        }))
    }
}

struct Refusing;

#[async_trait]
impl HttpTransport for Refusing {
    async fn send(
        &self,
        _request: RequestDescriptor,
    ) -> Result<Box<dyn HttpResponse>, TransportFailure> {
        Err(TransportFailure::ConnectionRefused)
    }
}

fn answer_json(id: u64) -> Value {
    json!({
        "id": id,
        "content": "println!(\"hi\");",
        "author_name": "ferris",
        "title": "print in rust",
        "upvotes": 4,
        "downvotes": 0,
        "object": "answer",
    })
}

fn client_for(transport: Arc<dyn HttpTransport>) -> Client {
    let options = ClientOptions::new("test-api-key").with_base_url("https://grepper.test/v1/");
    Client::with_transport(options, transport).unwrap()
}

#[tokio::test]
async fn search_returns_the_list_data() {
    let transport = ScriptedTransport::new(
        200,
        json!({"object": "list", "data": [answer_json(1), answer_json(2), answer_json(3)]}),
    );
    let client = client_for(transport.clone());

    let answers = client.search("print line", Some(40)).await.unwrap();

    assert_eq!(answers.len(), 3);
    assert_eq!(answers[1].id, AnswerId::new(2));

    let request = transport.only_request();
    assert_eq!(request.method(), Method::Get);
    assert_eq!(
        request.url().as_str(),
        "https://grepper.test/v1/answers/search?query=print+line&similarity=40"
    );
    assert!(request.body().is_none());
}

#[tokio::test]
async fn search_defaults_similarity_to_sixty() {
    let transport = ScriptedTransport::new(200, json!({"object": "list", "data": []}));
    let client = client_for(transport.clone());

    let answers = client.search("q b", None).await.unwrap();

    assert!(answers.is_empty());
    assert_eq!(
        transport.only_request().url().query(),
        Some("query=q+b&similarity=60")
    );
}

#[tokio::test]
async fn every_request_carries_auth_and_content_type() {
    let transport = ScriptedTransport::new(200, answer_json(9));
    let client = client_for(transport.clone());

    client.answer(AnswerId::new(9)).await.unwrap();

    let request = transport.only_request();
    assert_eq!(
        request.headers().get("authorization"),
        Some("Basic dGVzdC1hcGkta2V5Og==")
    );
    assert_eq!(
        request.headers().get("content-type"),
        Some("application/x-www-form-urlencoded")
    );
}

#[tokio::test]
async fn answer_fetches_by_id() {
    let transport = ScriptedTransport::new(200, answer_json(42));
    let client = client_for(transport.clone());

    let answer = client.answer(AnswerId::new(42)).await.unwrap();

    assert_eq!(answer.id, AnswerId::new(42));
    assert_eq!(answer.title, "print in rust");
    assert_eq!(
        transport.only_request().url().as_str(),
        "https://grepper.test/v1/answers/42"
    );
}

#[tokio::test]
async fn update_posts_form_body_and_reshapes_success() {
    let transport = ScriptedTransport::new(200, json!({"id": 7, "success": "true"}));
    let client = client_for(transport.clone());

    let outcome = client.update(AnswerId::new(7), "x").await.unwrap();

    assert_eq!(
        outcome,
        UpdateOutcome {
            id: AnswerId::new(7),
            success: true
        }
    );
    let request = transport.only_request();
    assert_eq!(request.method(), Method::Post);
    assert_eq!(request.url().as_str(), "https://grepper.test/v1/answers/7");
    assert_eq!(
        request.body().map(|body| body.encode()).as_deref(),
        Some("answer%5Bcontent%5D=x")
    );
}

#[tokio::test]
async fn update_with_unknown_success_flag_fails_validation() {
    let transport = ScriptedTransport::new(200, json!({"id": 7, "success": "maybe"}));
    let client = client_for(transport);

    let err = client.update(AnswerId::new(7), "x").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.code(), "SCHEMA");
}

#[tokio::test]
async fn failures_propagate_unchanged() {
    let transport = ScriptedTransport::new(429, json!({"error": "slow down"}));
    let client = client_for(transport);
    let err = client.search("anything", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Response);
    assert_eq!(err.code(), "RATE_LIMIT");
    assert_eq!(err.message(), "Too many requests.");

    let client = client_for(Arc::new(Refusing));
    let err = client.answer(AnswerId::new(1)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Request);
    assert_eq!(err.code(), "REFUSED");
}

#[tokio::test]
async fn a_failed_call_does_not_affect_the_next_one() {
    let client = client_for(ScriptedTransport::new(503, json!(null)));
    for _ in 0..2 {
        let err = client.answer(AnswerId::new(1)).await.unwrap_err();
        assert_eq!(err.code(), "UNAVAILABLE");
    }
}

#[test]
fn base_url_is_stored_without_trailing_slash() {
    let client = client_for(Arc::new(Refusing));
    assert_eq!(client.base_url(), "https://grepper.test/v1");
    assert!(!format!("{client:?}").contains("dGVzdC1hcGkta2V5Og=="));
}

#[test]
fn default_base_url_is_the_public_service() {
    let client = Client::with_transport(ClientOptions::new("k"), Arc::new(Refusing)).unwrap();
    assert_eq!(client.base_url(), DEFAULT_BASE_URL);
}

#[test]
fn header_with_control_byte_fails_construction() {
    let options = ClientOptions::new("k").with_header("X-Trace", "a\u{1}b");
    let err = Client::with_transport(options, Arc::new(Refusing)).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidHeader { ref name } if name == "X-Trace"));
}
