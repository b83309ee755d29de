pub mod client;
pub mod logging;
#[cfg(test)]
pub mod mock_client;

pub use client::{classify_response, ApiClient, CompletionTransport, HttpTransport, RawResponse};
