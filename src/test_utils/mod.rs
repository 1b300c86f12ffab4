//! Helpers shared by unit tests, integration tests and benchmarks.
//!
//! Compiled for the crate's own tests and behind the `test-util` feature so
//! integration tests can inject transports without touching the network.

mod collecting_handler;
mod recording_transport;

pub use collecting_handler::CollectingHandler;
pub use recording_transport::{FailMode, RecordingTransport};
