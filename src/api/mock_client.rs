use crate::api::client::{CompletionTransport, RawResponse};
use crate::types::ChatRequest;
use anyhow::{anyhow, Result};
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub enum MockReply {
    Response(RawResponse),
    Fail(String),
    Panic,
}

impl MockReply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::Response(RawResponse::new(status, body.to_string()))
    }
}

/// Scripted transport: replies are consumed in order, one per request.
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<ChatRequest>>,
    gate: Option<Arc<Notify>>,
}

impl MockTransport {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Holds every reply until the gate is notified.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl CompletionTransport for MockTransport {
    fn send<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<RawResponse>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }

            let reply = self.replies.lock().unwrap().pop_front();
            match reply {
                Some(MockReply::Response(response)) => Ok(response),
                Some(MockReply::Fail(message)) => Err(anyhow!(message)),
                Some(MockReply::Panic) => panic!("MockTransport: scripted panic"),
                None => Err(anyhow!("MockTransport: No more responses configured")),
            }
        })
    }
}
