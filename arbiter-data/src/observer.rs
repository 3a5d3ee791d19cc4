use crate::{
    error::DataError,
    event::{CandlestickEntry, OrderBookEntry, OrderBookList},
};
use arbiter_instrument::{asset::SymbolIndex, instrument::InstrumentIndex};
use arbiter_integration::profile::ProfilingTag;

/// Observer contract for normalised market-data events.
///
/// Callbacks run on the transport thread that produced the event; consumers wanting a single
/// logical consumer thread dispatch through a task queue.
pub trait MarketObserver: Send + Sync + 'static {
    /// Cached market data for `instrument` (or all instruments when `None`) is stale and must
    /// be discarded before the next delivery.
    fn invalidate_data(&self, instrument: Option<InstrumentIndex>, tag: ProfilingTag);

    /// A single order book level changed.
    fn orderbook_entry(&self, entry: OrderBookEntry, tag: ProfilingTag);

    /// A batch of order book levels changed together, tagged with the network receive
    /// timestamp.
    fn orderbook_entries_bulk(&self, entries: OrderBookList, tag: ProfilingTag);

    /// A candlestick was received.
    fn candlestick(&self, entry: CandlestickEntry, tag: ProfilingTag);

    /// The venue announced a trade symbol.
    fn symbol_added(&self, symbol: SymbolIndex, tag: ProfilingTag);

    /// The venue announced a trade instrument.
    fn instrument_added(&self, instrument: InstrumentIndex, tag: ProfilingTag);

    /// The connector detected an error (network failure, protocol violation, ...). The
    /// connector remains usable; restarting is the consumer's decision.
    fn connector_error(&self, error: DataError);
}
