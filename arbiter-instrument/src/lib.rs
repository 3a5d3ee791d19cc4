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

//! # Arbiter-Instrument
//! Core Symbol, Instrument and fixed-point numeric data structures, together with the
//! process-wide instrument registry and the per-connector exchange dictionary.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Decimal fixed-point scalar used for all prices and amounts.
pub mod numeric;

/// [`Symbol`](asset::Symbol) currency code and its stable [`SymbolIndex`](asset::SymbolIndex)
/// handle.
pub mod asset;

/// [`Instrument`](instrument::Instrument) currency pair and its stable
/// [`InstrumentIndex`](instrument::InstrumentIndex) handle.
pub mod instrument;

/// Append-only registry interning all symbols and instruments for the process lifetime.
pub mod registry;

/// Per-connector bidirectional exchange-format string translation.
pub mod dictionary;

/// [`Side`] of an order book or order - Bid (buyers) or Ask (sellers).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Deserialize, Serialize)]
pub enum Side {
    #[serde(alias = "bid", alias = "buy")]
    Bid,
    #[serde(alias = "ask", alias = "sell")]
    Ask,
}

impl Side {
    /// Opposite [`Side`] of the book.
    pub fn opposite(&self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Side::Bid => "bid",
                Side::Ask => "ask",
            }
        )
    }
}
