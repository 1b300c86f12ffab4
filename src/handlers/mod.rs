//! Handler builders and associated traits.
//!
//! Provides a minimal builder API for constructing handlers in a
//! type‑safe manner. Each builder implements [`HandlerBuilderTrait`]
//! which returns a boxed [`DislogHandlerTrait`] ready for registration
//! with a logger bridge.

use std::io;

use thiserror::Error;

use crate::handler::DislogHandlerTrait;
use crate::webhook::EndpointError;

#[cfg(test)]
mod test_helpers;
pub mod webhook_builder;

pub use webhook_builder::DiscordWebhookBuilder;

/// Errors that may occur while building a handler.
#[derive(Debug, Error)]
pub enum HandlerBuildError {
    /// Invalid user supplied configuration.
    #[error("invalid handler configuration: {0}")]
    InvalidConfig(String),
    /// The webhook URL or id/token pair is not usable.
    #[error("invalid webhook: {0}")]
    InvalidWebhook(#[from] EndpointError),
    /// Event loop mode was requested outside a tokio runtime without a handle.
    #[error("event loop mode requires a tokio runtime handle")]
    MissingEventLoop,
    /// The async HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    /// The platform TLS connector could not be initialised.
    #[error("failed to initialise TLS: {0}")]
    Tls(#[from] native_tls::Error),
    /// Underlying I/O error whilst creating the handler.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Trait implemented by all handler builders.
///
/// Builders return boxed [`DislogHandlerTrait`] objects so the caller can
/// register them without knowing the concrete handler type.
pub trait HandlerBuilderTrait: Send + Sync {
    type Handler: DislogHandlerTrait + 'static;

    /// Build the concrete handler.
    fn build_inner(&self) -> Result<Self::Handler, HandlerBuildError>;

    /// Build the handler as a trait object.
    fn build(&self) -> Result<Box<dyn DislogHandlerTrait>, HandlerBuildError> {
        Ok(Box::new(self.build_inner()?))
    }
}
