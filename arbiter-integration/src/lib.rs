#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    missing_debug_implementations,
    rust_2018_idioms
)]

//! # Arbiter-Integration
//! Low-level plumbing shared by all venue connectors: the duplex WebSocket session engine, a
//! timeout-aware REST client, request signing, one-shot timers, the low-latency task queue and
//! the profiling tag attached to every observer event.

/// All socket IO related errors generated in `arbiter-integration`.
pub mod error;

/// Streaming ([`WsSession`](protocol::websocket::WsSession)) and request
/// ([`RestClient`](protocol::http::RestClient)) transports.
pub mod protocol;

/// Canonical request signing for authenticated command channels.
pub mod signer;

/// One-shot cancellable [`Timer`](timer::Timer)s scheduled off the caller's thread.
pub mod timer;

/// Low-latency single-consumer work queue for serialising observer callbacks.
pub mod task_queue;

/// Nanosecond [`ProfilingTag`](profile::ProfilingTag) capture.
pub mod profile;

#[cfg(test)]
use tracing_subscriber as _;
