use super::logging::{debug_payload_enabled, emit_debug_payload};
use crate::analysis::AnalysisError;
use crate::config::Config;
use crate::types::{ChatCompletion, ChatRequest};
use crate::util::is_local_endpoint_url;
use anyhow::{anyhow, Result};
use bytes::Bytes;
use futures::future::BoxFuture;
use reqwest::StatusCode;
use std::sync::Arc;

/// Status line and body of a completed HTTP exchange, before interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Bytes,
}

impl RawResponse {
    /// Builds a response whose status text is the canonical reason phrase.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        let status_text = StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();
        Self {
            status,
            status_text,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one chat request and hands back the raw exchange.
///
/// Implementations return `Err` only when no HTTP response was obtained
/// (connect failure, timeout, broken body). Non-2xx statuses are responses.
pub trait CompletionTransport: Send + Sync {
    fn send<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<RawResponse>>;
}

pub struct HttpTransport {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl CompletionTransport for HttpTransport {
    fn send<'a>(&'a self, request: &'a ChatRequest) -> BoxFuture<'a, Result<RawResponse>> {
        Box::pin(async move {
            let mut builder = self
                .http
                .post(&self.api_url)
                .header("content-type", "application/json")
                .json(request);

            if let Some(api_key) = &self.api_key {
                builder = builder.header("authorization", format!("Bearer {api_key}"));
            }

            let response = builder
                .send()
                .await
                .map_err(|error| map_api_request_error(error, &self.api_url))?;
            let status = response.status();
            let body = response
                .bytes()
                .await
                .map_err(|error| map_api_request_error(error, &self.api_url))?;

            Ok(RawResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            })
        })
    }
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn CompletionTransport>,
    model: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), config.model.clone()))
    }

    pub fn with_transport(transport: Arc<dyn CompletionTransport>, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends `draft` for review and returns the first choice's content.
    pub async fn analyze(&self, draft: &str) -> Result<String, AnalysisError> {
        let request = ChatRequest::for_draft(&self.model, draft);
        if debug_payload_enabled() {
            emit_debug_payload(&request);
        }

        let response = self
            .transport
            .send(&request)
            .await
            .map_err(AnalysisError::request)?;
        log::info!(
            "completion endpoint answered {} {} ({} bytes)",
            response.status,
            response.status_text,
            response.body.len()
        );
        classify_response(response)
    }
}

/// Maps a raw exchange onto the analysis result.
///
/// Non-2xx wins over the body. A 2xx body that is not JSON at all is a request
/// failure; JSON without a usable `choices[0].message.content` string is malformed.
pub fn classify_response(response: RawResponse) -> Result<String, AnalysisError> {
    if !response.is_success() {
        return Err(AnalysisError::HttpStatus {
            status: response.status,
            status_text: response.status_text,
        });
    }

    let value: serde_json::Value =
        serde_json::from_slice(&response.body).map_err(AnalysisError::request)?;
    let completion: ChatCompletion = serde_json::from_value(value).map_err(|error| {
        log::warn!("unexpected completion body: {error}");
        AnalysisError::MalformedResponse
    })?;

    completion.into_first_content().ok_or_else(|| {
        log::warn!("completion body has an empty choices list");
        AnalysisError::MalformedResponse
    })
}

fn map_api_request_error(error: reqwest::Error, request_url: &str) -> anyhow::Error {
    if error.is_connect() && is_local_endpoint_url(request_url) {
        return anyhow!(
            "cannot reach local API endpoint '{}': {}. Start your local server or update CODELENS_API_URL.",
            request_url,
            error
        );
    }
    if error.is_connect() {
        return anyhow!("cannot reach API endpoint '{}': {}", request_url, error);
    }
    if error.is_timeout() {
        return anyhow!("API request to '{}' timed out: {}", request_url, error);
    }
    if error.is_builder() {
        return anyhow!("invalid API request for '{}': {}", request_url, error);
    }
    anyhow!("API request to '{}' failed: {}", request_url, error)
}
