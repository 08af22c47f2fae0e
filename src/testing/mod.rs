//! Mock provider for tests.
//!
//! `MockProvider` implements [`AiProvider`] without any network calls:
//! scripted responses, call counters for assertions. Enable the `testing`
//! feature to use it from dependent crates.

mod mock_provider;

pub use mock_provider::{MockCalls, MockProvider};
