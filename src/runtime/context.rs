use super::UiUpdate;
use crate::analysis::RequestController;
use crate::reveal::{RevealAnimator, RevealHandle, RevealPhase};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Services a `RuntimeMode` drives. Everything they produce comes back to the
/// mode as a [`UiUpdate`] through the runtime's channel.
pub struct RuntimeContext {
    controller: Arc<RequestController>,
    animator: RevealAnimator,
    update_tx: mpsc::UnboundedSender<UiUpdate>,
}

impl RuntimeContext {
    pub fn new(
        controller: Arc<RequestController>,
        reveal_interval: Duration,
        update_tx: mpsc::UnboundedSender<UiUpdate>,
    ) -> Self {
        Self {
            controller,
            animator: RevealAnimator::new(reveal_interval),
            update_tx,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    /// Submits `draft` in the background.
    ///
    /// Exactly one update follows every dispatch: [`UiUpdate::AnalysisFinished`]
    /// with the outcome, or [`UiUpdate::AnalysisAborted`] when the submit was
    /// ignored, panicked or was cancelled.
    pub fn dispatch_analysis(&self, draft: String) {
        let controller = Arc::clone(&self.controller);
        let update_tx = self.update_tx.clone();
        let submit = tokio::spawn(async move { controller.submit(&draft).await });
        tokio::spawn(async move {
            let update = match submit.await {
                Ok(Some(outcome)) => UiUpdate::AnalysisFinished(outcome),
                Ok(None) => UiUpdate::AnalysisAborted,
                Err(error) => {
                    log::error!("analysis task did not complete: {error}");
                    UiUpdate::AnalysisAborted
                }
            };
            let _ = update_tx.send(update);
        });
    }

    pub fn start_reveal(&mut self, text: String) -> RevealHandle {
        let update_tx = self.update_tx.clone();
        self.animator.start(text, move |event| {
            let _ = update_tx.send(UiUpdate::Reveal(event));
        })
    }

    pub fn cancel_reveal(&mut self) {
        self.animator.cancel();
    }

    pub fn reveal_phase(&self) -> RevealPhase {
        self.animator.phase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock_client::{MockReply, MockTransport};
    use crate::api::ApiClient;
    use serde_json::json;

    fn context_with(
        replies: Vec<MockReply>,
    ) -> (RuntimeContext, mpsc::UnboundedReceiver<UiUpdate>) {
        let transport = Arc::new(MockTransport::new(replies));
        let client = ApiClient::with_transport(transport, "gpt-4");
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let controller = Arc::new(RequestController::new(client));
        (
            RuntimeContext::new(controller, Duration::from_millis(200), update_tx),
            update_rx,
        )
    }

    #[tokio::test]
    async fn test_dispatch_reports_outcome() {
        let (ctx, mut rx) = context_with(vec![MockReply::json(
            200,
            json!({"choices": [{"message": {"content": "ok"}}]}),
        )]);

        ctx.dispatch_analysis("code".to_string());
        match rx.recv().await {
            Some(UiUpdate::AnalysisFinished(outcome)) => assert_eq!(outcome.result_text(), "ok"),
            other => panic!("unexpected update: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dispatch_reports_panicked_submit_as_aborted() {
        let (ctx, mut rx) = context_with(vec![MockReply::Panic]);

        ctx.dispatch_analysis("code".to_string());
        assert!(matches!(rx.recv().await, Some(UiUpdate::AnalysisAborted)));
        assert!(!ctx.is_busy());
    }
}
