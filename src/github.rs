//! GitHub REST API access for requesting Pages builds.
//!
//! The client talks to the network through the [`transport::Transport`]
//! trait and retries transient failures with exponential backoff.

/// Page build client and response validation.
pub mod client;

/// API call, request and response types.
pub mod request;

/// Bounded retry with exponential backoff and jitter.
pub mod retry;

/// HTTP transport abstraction and its reqwest implementation.
pub mod transport;
