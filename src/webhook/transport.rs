//! HTTP transports that carry webhook messages.
//!
//! The handler talks to the network only through [`WebhookTransport`]
//! (blocking, used by the worker pool) and [`AsyncWebhookTransport`] (used on
//! the event loop). Production code uses [`UreqTransport`] and
//! [`ReqwestTransport`]; tests substitute their own implementations.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use ureq::{Agent, AgentBuilder};

use super::endpoint::WebhookEndpoint;
use super::payload::WebhookMessage;

/// Why a single webhook call failed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint answered with a non-2xx status.
    #[error("HTTP status {0}")]
    Status(u16),
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to serialise webhook message: {0}")]
    Serialise(#[from] serde_json::Error),
}

/// Map a response status to the outcome of a delivery.
pub(crate) fn check_status(status: u16) -> Result<(), TransportError> {
    match status {
        200..=299 => Ok(()),
        other => Err(TransportError::Status(other)),
    }
}

/// Blocking transport used from worker threads.
pub trait WebhookTransport: Send + Sync + 'static {
    /// Perform one POST of `message`.
    fn execute(&self, message: &WebhookMessage) -> Result<(), TransportError>;
}

/// Asynchronous transport used from the event loop.
pub trait AsyncWebhookTransport: Send + Sync + 'static {
    /// Perform one POST of `message` when the returned future is polled.
    fn execute(&self, message: WebhookMessage) -> BoxFuture<'static, Result<(), TransportError>>;
}

/// [`WebhookTransport`] backed by a pooled `ureq::Agent`.
pub struct UreqTransport {
    agent: Agent,
    endpoint: WebhookEndpoint,
}

impl UreqTransport {
    /// Build an agent using the platform TLS stack.
    pub fn new(
        endpoint: WebhookEndpoint,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, native_tls::Error> {
        let connector = native_tls::TlsConnector::new()?;
        let agent = AgentBuilder::new()
            .tls_connector(Arc::new(connector))
            .timeout_connect(connect_timeout)
            .timeout(request_timeout)
            .build();
        Ok(Self { agent, endpoint })
    }
}

impl WebhookTransport for UreqTransport {
    fn execute(&self, message: &WebhookMessage) -> Result<(), TransportError> {
        let body = serde_json::to_string(message)?;
        let result = self
            .agent
            .post(self.endpoint.as_str())
            .set("Content-Type", "application/json")
            .send_string(&body);
        match result {
            Ok(response) => check_status(response.status()),
            Err(ureq::Error::Status(code, _)) => Err(TransportError::Status(code)),
            // The transport error's Display includes the URL, which embeds the token.
            Err(ureq::Error::Transport(transport)) => Err(TransportError::Network(
                match transport.message() {
                    Some(detail) => format!("{}: {detail}", transport.kind()),
                    None => transport.kind().to_string(),
                },
            )),
        }
    }
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// [`AsyncWebhookTransport`] backed by a `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    endpoint: WebhookEndpoint,
}

impl ReqwestTransport {
    /// Build the client. Fails only when the TLS backend cannot initialise.
    pub fn new(
        endpoint: WebhookEndpoint,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;
        Ok(Self { client, endpoint })
    }
}

impl AsyncWebhookTransport for ReqwestTransport {
    fn execute(&self, message: WebhookMessage) -> BoxFuture<'static, Result<(), TransportError>> {
        let request = self
            .client
            .post(self.endpoint.url().clone())
            .header(CONTENT_TYPE, "application/json")
            .json(&message);
        Box::pin(async move {
            let response = request
                .send()
                .await
                .map_err(|err| TransportError::Network(err.without_url().to_string()))?;
            check_status(response.status().as_u16())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(200)]
    #[case(204)]
    fn success_statuses(#[case] status: u16) {
        assert!(check_status(status).is_ok());
    }

    #[rstest]
    #[case(400)]
    #[case(404)]
    #[case(429)]
    #[case(500)]
    fn failure_statuses(#[case] status: u16) {
        assert!(matches!(
            check_status(status),
            Err(TransportError::Status(code)) if code == status
        ));
    }
}
