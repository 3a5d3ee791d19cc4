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

//! # Arbiter
//! Pluggable market-data and trade-execution connector framework for cryptocurrency
//! exchanges. This facade crate wires the ecosystem together: the named connector factory
//! [`registry`](crate::registry) and task-queue [`dispatch`](crate::dispatch) adapters that
//! serialise observer callbacks onto one consumer thread.
//!
//! The member crates carry the substance:
//! * `arbiter-instrument` — symbols, instruments, registries and the fixed-point scalar.
//! * `arbiter-integration` — transports, timers, signing and the task queue.
//! * `arbiter-data` — streaming price connectors and the normalised market-data model.
//! * `arbiter-execution` — trade connectors, order lifecycle and reservation accounting.

pub use arbiter_data as data;
pub use arbiter_execution as execution;
pub use arbiter_instrument as instrument;
pub use arbiter_integration as integration;

/// Named connector factories.
pub mod registry;

/// Observer adapters dispatching callbacks through a task queue.
pub mod dispatch;
