use crate::connector::TradeConnector;
use arbiter_data::event::OrderBookEntry;
use arbiter_instrument::{
    Side,
    instrument::InstrumentIndex,
    numeric::{DEFAULT_ACCURACY, FixedNumber},
};
use smol_str::SmolStr;
use std::{fmt, sync::Arc};

/// One venue's quote inside the consolidated book.
///
/// Rows are unique by `(exchange, price)` per side. Reservation operations delegate to the
/// owning exchange connector so that cross-venue consumers never double-spend a displayed
/// level.
#[derive(Clone)]
pub struct MixedBookItem {
    pub exchange: Arc<dyn TradeConnector>,
    pub instrument: InstrumentIndex,
    pub side: Side,
    pub price: FixedNumber,
    pub price_with_fee: FixedNumber,
    pub amount: FixedNumber,
    /// Venue timestamp in milliseconds.
    pub timestamp: i64,
}

impl MixedBookItem {
    pub fn exchange_name(&self) -> SmolStr {
        self.exchange.name()
    }

    /// Reserve part of this displayed level on the owning exchange.
    pub fn reserve(&self, amount: FixedNumber) -> bool {
        self.exchange
            .reserve_item(self.instrument, self.side, &self.price, &self.amount, &amount)
    }

    /// Release part of this level's reservation on the owning exchange.
    pub fn unreserve(&self, amount: FixedNumber) -> bool {
        self.exchange
            .unreserve_item(self.instrument, self.side, &self.price, &amount)
    }

    /// Release this level's whole reservation.
    pub fn unreserve_all(&self) -> bool {
        let reserved = self.reserved();
        self.unreserve(FixedNumber::from_f64(reserved, DEFAULT_ACCURACY))
    }

    /// Currently reserved amount on this level.
    pub fn reserved(&self) -> f64 {
        self.exchange
            .item_reserve(self.instrument, self.side, &self.price)
    }
}

impl fmt::Debug for MixedBookItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MixedBookItem")
            .field("exchange", &self.exchange_name())
            .field("side", &self.side)
            .field("price", &self.price)
            .field("price_with_fee", &self.price_with_fee)
            .field("amount", &self.amount)
            .finish()
    }
}

/// One side of the consolidated book, ordered by fee-adjusted price.
#[derive(Debug, Default)]
struct MixedBookSide {
    items: Vec<MixedBookItem>,
}

impl MixedBookSide {
    /// Remove the row keyed `(exchange, price)` if present.
    fn remove(&mut self, exchange: &Arc<dyn TradeConnector>, price: &FixedNumber) {
        if let Some(position) = self
            .items
            .iter()
            .position(|item| Arc::ptr_eq(&item.exchange, exchange) && item.price == *price)
        {
            self.items.remove(position);
        }
    }

    /// Insert keeping the side ordered by `price_with_fee` (ascending asks, descending bids).
    fn insert(&mut self, item: MixedBookItem) {
        let position = self.items.partition_point(|existing| match item.side {
            Side::Ask => existing.price_with_fee <= item.price_with_fee,
            Side::Bid => existing.price_with_fee >= item.price_with_fee,
        });
        self.items.insert(position, item);
    }

    fn clear_exchange(&mut self, exchange: &Arc<dyn TradeConnector>) {
        self.items
            .retain(|item| !Arc::ptr_eq(&item.exchange, exchange));
    }

    /// Extremal raw price over all rows: max for bids, min for asks.
    fn best_price(&self, side: Side) -> Option<FixedNumber> {
        let prices = self.items.iter().map(|item| item.price);
        match side {
            Side::Bid => prices.max(),
            Side::Ask => prices.min(),
        }
    }
}

/// Cross-venue consolidated order book for a single instrument.
///
/// Each side keeps one row per `(exchange, price)`, ordered by fee-adjusted price — the
/// primary consumer interface for profitable cross-venue pairing. `best_bid`/`best_ask` read
/// the extremal raw price.
#[derive(Debug)]
pub struct MixedOrderBook {
    instrument: InstrumentIndex,
    bids: MixedBookSide,
    asks: MixedBookSide,
}

impl MixedOrderBook {
    pub fn new(instrument: InstrumentIndex) -> Self {
        Self {
            instrument,
            bids: MixedBookSide::default(),
            asks: MixedBookSide::default(),
        }
    }

    pub fn instrument(&self) -> InstrumentIndex {
        self.instrument
    }

    /// Apply one entry from `exchange` with that venue's `fee`.
    ///
    /// Entries for other instruments are ignored. An amount of zero removes the
    /// `(exchange, price)` row; anything else replaces it. The fee-adjusted price is
    /// `price · (1 − fee)` on the bid side and `price / (1 − fee)` on the ask side.
    pub fn update(&mut self, exchange: &Arc<dyn TradeConnector>, entry: OrderBookEntry, fee: f64) {
        if entry.instrument != self.instrument {
            return;
        }

        let price_with_fee = match entry.side {
            Side::Bid => FixedNumber::from_f64(entry.price.to_f64() * (1.0 - fee), DEFAULT_ACCURACY),
            Side::Ask => FixedNumber::from_f64(entry.price.to_f64() / (1.0 - fee), DEFAULT_ACCURACY),
        };

        let side = match entry.side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };

        side.remove(exchange, &entry.price);
        if entry.amount.is_zero() {
            return;
        }

        side.insert(MixedBookItem {
            exchange: Arc::clone(exchange),
            instrument: entry.instrument,
            side: entry.side,
            price: entry.price,
            price_with_fee,
            amount: entry.amount,
            timestamp: entry.timestamp,
        });
    }

    /// Apply a batch of entries, filtering for this book's instrument.
    pub fn batch_update(
        &mut self,
        exchange: &Arc<dyn TradeConnector>,
        entries: &[OrderBookEntry],
        fee: f64,
    ) {
        for entry in entries {
            self.update(exchange, *entry, fee);
        }
    }

    /// Replace every row of `exchange` with the provided batch.
    pub fn snapshot(
        &mut self,
        exchange: &Arc<dyn TradeConnector>,
        entries: &[OrderBookEntry],
        fee: f64,
    ) {
        self.clear_exchange(exchange);
        self.batch_update(exchange, entries, fee);
    }

    /// Remove every row contributed by `exchange`.
    pub fn clear_exchange(&mut self, exchange: &Arc<dyn TradeConnector>) {
        self.bids.clear_exchange(exchange);
        self.asks.clear_exchange(exchange);
    }

    /// Remove every row.
    pub fn clear(&mut self) {
        self.bids.items.clear();
        self.asks.items.clear();
    }

    /// Highest bid price over all venues.
    pub fn best_bid(&self) -> Option<FixedNumber> {
        self.bids.best_price(Side::Bid)
    }

    /// Lowest ask price over all venues.
    pub fn best_ask(&self) -> Option<FixedNumber> {
        self.asks.best_price(Side::Ask)
    }

    /// Bid rows ordered by descending fee-adjusted price.
    pub fn bids(&self) -> &[MixedBookItem] {
        &self.bids.items
    }

    /// Ask rows ordered by ascending fee-adjusted price.
    pub fn asks(&self) -> &[MixedBookItem] {
        &self.asks.items
    }
}
