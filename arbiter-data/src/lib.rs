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

//! # Arbiter-Data
//! Normalised market-data model and streaming price connectors. A
//! [`MarketConnector`](connector::MarketConnector) maintains one venue subscription session,
//! issues pull-style depth and candlestick requests, and delivers normalised entries to the
//! upstream [`MarketObserver`](observer::MarketObserver).

/// All errors generated in `arbiter-data`.
pub mod error;

/// Normalised market-data events delivered to the observer.
pub mod event;

/// Observer contract consuming normalised market-data events.
pub mod observer;

/// Connector contract driving one venue's market-data session.
pub mod connector;

/// Shared connector JSON configuration.
pub mod config;

/// Candlestick interval bucketing.
pub mod kline;

/// Venue connector implementations.
pub mod exchange;

#[cfg(test)]
use futures as _;
#[cfg(test)]
use tokio_tungstenite as _;
#[cfg(test)]
use tracing_subscriber as _;
