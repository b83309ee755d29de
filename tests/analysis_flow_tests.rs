use anyhow::{anyhow, Result};
use codelens::analysis::{AnalysisError, AnalysisOutcome, RequestController};
use codelens::api::{ApiClient, CompletionTransport, RawResponse};
use codelens::types::ChatRequest;
use futures::future::BoxFuture;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Answers every request with the same canned result and counts calls.
struct CannedTransport {
    reply: Box<dyn Fn() -> Result<RawResponse> + Send + Sync>,
    calls: AtomicUsize,
}

impl CannedTransport {
    fn new(reply: impl Fn() -> Result<RawResponse> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            reply: Box::new(reply),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CompletionTransport for CannedTransport {
    fn send<'a>(&'a self, _request: &'a ChatRequest) -> BoxFuture<'a, Result<RawResponse>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = (self.reply)();
        Box::pin(async move { reply })
    }
}

fn controller(transport: Arc<CannedTransport>) -> RequestController {
    RequestController::new(ApiClient::with_transport(transport, "gpt-4"))
}

#[tokio::test]
async fn test_well_formed_body_becomes_result_text() {
    let transport = CannedTransport::new(|| {
        Ok(RawResponse::new(
            200,
            json!({"choices": [{"message": {"content": "fixed(code){}"}}]}).to_string(),
        ))
    });
    let controller = controller(transport.clone());

    let outcome = controller.submit("broken(code){").await.expect("outcome");
    assert!(outcome.is_success());
    assert_eq!(outcome.result_text(), "fixed(code){}");
    assert_eq!(outcome.reveal_text(), Some("fixed(code){}"));
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_server_error_is_formatted_with_status() {
    let transport = CannedTransport::new(|| Ok(RawResponse::new(500, "oops")));
    let outcome = controller(transport).submit("code").await.expect("outcome");

    assert_eq!(outcome.result_text(), "Error: 500 - Internal Server Error");
}

#[tokio::test]
async fn test_missing_choices_is_reported() {
    let transport = CannedTransport::new(|| Ok(RawResponse::new(200, "{}")));
    let outcome = controller(transport).submit("code").await.expect("outcome");

    assert!(matches!(
        outcome,
        AnalysisOutcome::Failed(AnalysisError::MalformedResponse)
    ));
    assert_eq!(
        outcome.result_text(),
        "Unexpected response structure from the API."
    );
}

#[tokio::test]
async fn test_network_failure_is_generic_and_retried_never() {
    let transport = CannedTransport::new(|| Err(anyhow!("connection reset by peer")));
    let controller = controller(transport.clone());

    let outcome = controller.submit("code").await.expect("outcome");
    assert_eq!(
        outcome.result_text(),
        "An error occurred while analyzing the code."
    );
    assert_eq!(transport.calls(), 1);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn test_blank_draft_never_calls_transport() {
    let transport = CannedTransport::new(|| Err(anyhow!("must not be called")));
    let outcome = controller(transport.clone())
        .submit(" \t\n")
        .await
        .expect("outcome");

    assert_eq!(
        outcome.result_text(),
        "Please enter some code to analyze or enhance."
    );
    assert_eq!(transport.calls(), 0);
}
