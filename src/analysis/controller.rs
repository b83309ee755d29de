use super::{AnalysisError, AnalysisOutcome};
use crate::api::ApiClient;
use std::sync::atomic::{AtomicBool, Ordering};

/// Issues analysis requests, one at a time.
///
/// The busy flag is held by a guard for the whole request, so it is released on
/// every exit path: completion, error, the future being dropped, or a panic.
pub struct RequestController {
    client: ApiClient,
    busy: AtomicBool,
}

struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl RequestController {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Analyzes `draft` with exactly one request.
    ///
    /// Returns `None` without doing anything when another submit is still
    /// outstanding. A blank draft short-circuits to [`AnalysisError::EmptyInput`]
    /// and never reaches the network.
    pub async fn submit(&self, draft: &str) -> Option<AnalysisOutcome> {
        let Some(_guard) = BusyGuard::acquire(&self.busy) else {
            log::debug!("submit ignored: a request is already outstanding");
            return None;
        };

        if draft.trim().is_empty() {
            return Some(AnalysisOutcome::Failed(AnalysisError::EmptyInput));
        }

        log::info!(
            "analyzing {} bytes of code with model {}",
            draft.len(),
            self.client.model()
        );
        let result = self.client.analyze(draft).await;
        if let Err(AnalysisError::Request(source)) = &result {
            log::error!("error analyzing code: {source}");
        }

        Some(result.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock_client::{MockReply, MockTransport};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn controller_with(transport: MockTransport) -> (Arc<RequestController>, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        let client = ApiClient::with_transport(transport.clone(), "gpt-4");
        (Arc::new(RequestController::new(client)), transport)
    }

    async fn wait_for_requests(transport: &MockTransport, count: usize) {
        for _ in 0..200 {
            if transport.request_count() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("transport never saw {count} request(s)");
    }

    #[tokio::test]
    async fn test_blank_draft_makes_no_request() {
        let (controller, transport) = controller_with(MockTransport::new(vec![]));

        for draft in ["", "   ", "\n\t  \n"] {
            let outcome = controller.submit(draft).await.expect("not ignored");
            assert_eq!(
                outcome.result_text(),
                "Please enter some code to analyze or enhance."
            );
            assert!(outcome.reveal_text().is_none());
        }

        assert_eq!(transport.request_count(), 0);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_success_yields_first_choice_content() {
        let (controller, transport) = controller_with(MockTransport::new(vec![MockReply::json(
            200,
            json!({"choices": [{"message": {"content": "fixed(code){}"}}]}),
        )]));

        let outcome = controller.submit("broken(code){").await.expect("outcome");
        assert_eq!(outcome.result_text(), "fixed(code){}");
        assert_eq!(outcome.reveal_text(), Some("fixed(code){}"));
        assert_eq!(transport.request_count(), 1);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_http_status_error_message() {
        let (controller, _) = controller_with(MockTransport::new(vec![MockReply::json(
            500,
            json!({"error": {"message": "boom"}}),
        )]));

        let outcome = controller.submit("code").await.expect("outcome");
        assert_eq!(outcome.result_text(), "Error: 500 - Internal Server Error");
        assert!(outcome.reveal_text().is_none());
    }

    #[tokio::test]
    async fn test_missing_choices_is_unexpected_structure() {
        let (controller, _) =
            controller_with(MockTransport::new(vec![MockReply::json(200, json!({}))]));

        let outcome = controller.submit("code").await.expect("outcome");
        assert_eq!(
            outcome.result_text(),
            "Unexpected response structure from the API."
        );
    }

    #[tokio::test]
    async fn test_transport_failure_releases_busy_flag() {
        let (controller, transport) = controller_with(MockTransport::new(vec![MockReply::Fail(
            "dns lookup failed".to_string(),
        )]));

        let outcome = controller.submit("code").await.expect("outcome");
        assert_eq!(
            outcome.result_text(),
            "An error occurred while analyzing the code."
        );
        assert_eq!(transport.request_count(), 1);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_concurrent_submit_is_ignored_while_busy() {
        let gate = Arc::new(Notify::new());
        let (controller, transport) = controller_with(
            MockTransport::new(vec![MockReply::json(
                200,
                json!({"choices": [{"message": {"content": "done"}}]}),
            )])
            .gated(gate.clone()),
        );

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("first").await }
        });
        wait_for_requests(&transport, 1).await;
        assert!(controller.is_busy());

        assert!(controller.submit("second").await.is_none());
        assert_eq!(transport.request_count(), 1);

        gate.notify_one();
        let outcome = first.await.expect("join").expect("outcome");
        assert_eq!(outcome.result_text(), "done");
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_panicking_request_still_releases_busy_flag() {
        let (controller, transport) = controller_with(MockTransport::new(vec![MockReply::Panic]));

        let joined = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("code").await }
        })
        .await;

        assert!(joined.expect_err("task panicked").is_panic());
        assert_eq!(transport.request_count(), 1);
        assert!(!controller.is_busy());
    }

    #[tokio::test]
    async fn test_dropped_submit_releases_busy_flag() {
        let gate = Arc::new(Notify::new());
        let (controller, transport) =
            controller_with(MockTransport::new(vec![]).gated(gate.clone()));

        let pending = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("code").await }
        });
        wait_for_requests(&transport, 1).await;
        assert!(controller.is_busy());

        pending.abort();
        assert!(pending.await.expect_err("aborted").is_cancelled());
        assert!(!controller.is_busy());
    }
}
