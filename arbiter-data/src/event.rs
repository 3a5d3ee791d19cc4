use arbiter_instrument::{Side, instrument::InstrumentIndex, numeric::FixedNumber};
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

/// Normalised order book price level update.
///
/// An `amount` of zero is the sentinel for "remove this price level".
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize, Constructor)]
pub struct OrderBookEntry {
    pub instrument: InstrumentIndex,
    pub side: Side,
    pub price: FixedNumber,
    pub amount: FixedNumber,
    /// Venue timestamp in milliseconds.
    pub timestamp: i64,
}

/// Batch of [`OrderBookEntry`]s delivered together.
pub type OrderBookList = Vec<OrderBookEntry>;

/// Normalised candlestick.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Serialize, Constructor)]
pub struct CandlestickEntry {
    pub instrument: InstrumentIndex,
    pub time: DateTime<Utc>,
    /// Requested interval in seconds.
    pub interval_secs: u64,
    pub open: FixedNumber,
    pub high: FixedNumber,
    pub low: FixedNumber,
    pub close: FixedNumber,
    pub volume: FixedNumber,
}
