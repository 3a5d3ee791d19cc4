use arbiter_data::{
    error::DataError,
    event::{CandlestickEntry, OrderBookEntry, OrderBookList},
    observer::MarketObserver,
};
use arbiter_execution::{
    error::ExecutionError,
    observer::AccountObserver,
    order::{OrderHandle, OrderStatus},
};
use arbiter_instrument::{asset::SymbolIndex, instrument::InstrumentIndex, numeric::FixedNumber};
use arbiter_integration::{profile::ProfilingTag, task_queue::TaskQueue};
use std::sync::Arc;

/// [`MarketObserver`] adapter that re-dispatches every callback onto a [`TaskQueue`].
///
/// Connector callbacks run on whichever transport thread produced the event; wrapping the
/// downstream observer in this adapter serialises them into the queue's single consumer.
pub struct QueuedMarketObserver {
    inner: Arc<dyn MarketObserver>,
    queue: Arc<TaskQueue>,
}

impl QueuedMarketObserver {
    pub fn new(inner: Arc<dyn MarketObserver>, queue: Arc<TaskQueue>) -> Self {
        Self { inner, queue }
    }
}

impl std::fmt::Debug for QueuedMarketObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedMarketObserver").finish_non_exhaustive()
    }
}

impl MarketObserver for QueuedMarketObserver {
    fn invalidate_data(&self, instrument: Option<InstrumentIndex>, tag: ProfilingTag) {
        let inner = Arc::clone(&self.inner);
        self.queue.push(move || inner.invalidate_data(instrument, tag));
    }

    fn orderbook_entry(&self, entry: OrderBookEntry, tag: ProfilingTag) {
        let inner = Arc::clone(&self.inner);
        self.queue.push(move || inner.orderbook_entry(entry, tag));
    }

    fn orderbook_entries_bulk(&self, entries: OrderBookList, tag: ProfilingTag) {
        let inner = Arc::clone(&self.inner);
        self.queue
            .push(move || inner.orderbook_entries_bulk(entries, tag));
    }

    fn candlestick(&self, entry: CandlestickEntry, tag: ProfilingTag) {
        let inner = Arc::clone(&self.inner);
        self.queue.push(move || inner.candlestick(entry, tag));
    }

    fn symbol_added(&self, symbol: SymbolIndex, tag: ProfilingTag) {
        let inner = Arc::clone(&self.inner);
        self.queue.push(move || inner.symbol_added(symbol, tag));
    }

    fn instrument_added(&self, instrument: InstrumentIndex, tag: ProfilingTag) {
        let inner = Arc::clone(&self.inner);
        self.queue.push(move || inner.instrument_added(instrument, tag));
    }

    fn connector_error(&self, error: DataError) {
        let inner = Arc::clone(&self.inner);
        self.queue.push(move || inner.connector_error(error));
    }
}

/// [`AccountObserver`] adapter that re-dispatches every callback onto a [`TaskQueue`].
pub struct QueuedAccountObserver {
    inner: Arc<dyn AccountObserver>,
    queue: Arc<TaskQueue>,
}

impl QueuedAccountObserver {
    pub fn new(inner: Arc<dyn AccountObserver>, queue: Arc<TaskQueue>) -> Self {
        Self { inner, queue }
    }
}

impl std::fmt::Debug for QueuedAccountObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuedAccountObserver").finish_non_exhaustive()
    }
}

impl AccountObserver for QueuedAccountObserver {
    fn order_status_changed(&self, order: OrderHandle, previous: OrderStatus, tag: ProfilingTag) {
        let inner = Arc::clone(&self.inner);
        self.queue
            .push(move || inner.order_status_changed(order, previous, tag));
    }

    fn balance_received(&self, symbol: SymbolIndex, value: FixedNumber, tag: ProfilingTag) {
        let inner = Arc::clone(&self.inner);
        self.queue
            .push(move || inner.balance_received(symbol, value, tag));
    }

    fn connector_error(&self, error: ExecutionError) {
        let inner = Arc::clone(&self.inner);
        self.queue.push(move || inner.connector_error(error));
    }
}
