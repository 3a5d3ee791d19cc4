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

//! # Arbiter-Execution
//! Authenticated trade connectors and the account state they maintain: the
//! [`TradeOrder`](order::TradeOrder) lifecycle state machine, balance cells with atomic
//! reservation accounting, per-instrument order-book reservations, trade constraints and the
//! cross-venue [`MixedOrderBook`](mixed_book::MixedOrderBook).

/// All errors generated in `arbiter-execution`.
pub mod error;

/// Trade order and its status state machine.
pub mod order;

/// Observer contract consuming account events.
pub mod observer;

/// Connector contract driving one venue's authenticated command channel.
pub mod connector;

/// Per-symbol balance cells with atomic reservation accounting.
pub mod balance;

/// Commission charging strategies.
pub mod commission;

/// Per-instrument trade constraints and the limits CSV.
pub mod constraints;

/// Balance, reservation and constraint bookkeeping shared by trade connectors.
pub mod account;

/// Cross-venue consolidated order book indexed by fee-adjusted price.
pub mod mixed_book;

/// Venue connector implementations.
pub mod exchange;

#[cfg(test)]
use futures as _;
#[cfg(test)]
use tokio_tungstenite as _;
#[cfg(test)]
use tracing_subscriber as _;
