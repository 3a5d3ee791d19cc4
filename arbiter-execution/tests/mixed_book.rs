use arbiter_data::event::OrderBookEntry;
use arbiter_execution::{
    account::AccountLedger,
    connector::TradeConnector,
    constraints::TradeConstraints,
    error::ExecutionError,
    mixed_book::MixedOrderBook,
    order::OrderHandle,
};
use arbiter_instrument::{
    Side,
    asset::SymbolIndex,
    instrument::InstrumentIndex,
    numeric::FixedNumber,
    registry::InstrumentRegistry,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use smol_str::SmolStr;
use std::sync::Arc;

/// Trade connector stub backing reservation delegation with a real ledger.
#[derive(Debug)]
struct MockExchange {
    name: Mutex<SmolStr>,
    ledger: AccountLedger,
}

impl MockExchange {
    fn new(name: &str, registry: &InstrumentRegistry) -> Arc<dyn TradeConnector> {
        Arc::new(Self {
            name: Mutex::new(SmolStr::new(name)),
            ledger: AccountLedger::new(registry),
        })
    }
}

#[async_trait]
impl TradeConnector for MockExchange {
    fn configure(&self, _: &str) -> Result<(), ExecutionError> {
        Ok(())
    }

    async fn start(self: Arc<Self>) -> Result<(), ExecutionError> {
        Ok(())
    }

    fn stop(&self) {}

    fn place_order(&self, _: &OrderHandle) -> bool {
        false
    }

    fn cancel_order(&self, _: &OrderHandle) -> bool {
        false
    }

    fn order_status(&self, _: &OrderHandle) -> bool {
        false
    }

    fn orders_list(&self) -> bool {
        false
    }

    fn fetch_balance(&self) -> bool {
        false
    }

    fn balance(&self, symbol: SymbolIndex) -> f64 {
        self.ledger.balance(symbol)
    }

    fn reserve_balance(&self, symbol: SymbolIndex, quantity: f64) -> bool {
        self.ledger.reserve_balance(symbol, quantity)
    }

    fn unreserve_balance(&self, symbol: SymbolIndex, quantity: f64) -> bool {
        self.ledger.unreserve_balance(symbol, quantity)
    }

    fn reserve_item(
        &self,
        instrument: InstrumentIndex,
        side: Side,
        price: &FixedNumber,
        displayed_amount: &FixedNumber,
        quantity: &FixedNumber,
    ) -> bool {
        self.ledger
            .reserve_item(instrument, side, price, displayed_amount, quantity)
    }

    fn unreserve_item(
        &self,
        instrument: InstrumentIndex,
        side: Side,
        price: &FixedNumber,
        quantity: &FixedNumber,
    ) -> bool {
        self.ledger.unreserve_item(instrument, side, price, quantity)
    }

    fn item_reserve(&self, instrument: InstrumentIndex, side: Side, price: &FixedNumber) -> f64 {
        self.ledger.item_reserve(instrument, side, price)
    }

    fn maker_fee(&self) -> f64 {
        self.ledger.maker_fee()
    }

    fn set_maker_fee(&self, fee: f64) {
        self.ledger.set_maker_fee(fee);
    }

    fn taker_fee(&self) -> f64 {
        self.ledger.taker_fee()
    }

    fn set_taker_fee(&self, fee: f64) {
        self.ledger.set_taker_fee(fee);
    }

    fn constraints(&self, instrument: InstrumentIndex) -> TradeConstraints {
        self.ledger.constraints(instrument)
    }

    fn name(&self) -> SmolStr {
        self.name.lock().clone()
    }

    fn set_name(&self, name: &str) {
        *self.name.lock() = SmolStr::new(name);
    }
}

fn fixed(input: &str) -> FixedNumber {
    input.parse().unwrap()
}

fn entry(
    instrument: InstrumentIndex,
    side: Side,
    price: &str,
    amount: &str,
) -> OrderBookEntry {
    OrderBookEntry::new(instrument, side, fixed(price), fixed(amount), 0)
}

fn fixture() -> (InstrumentRegistry, InstrumentIndex) {
    let registry = InstrumentRegistry::new();
    let instrument = registry.add_instrument_by_name("btc", "usdt");
    (registry, instrument)
}

#[test]
fn snapshot_then_diff_removal_updates_best_ask() {
    let (registry, instrument) = fixture();
    let venue = MockExchange::new("alpha", &registry);
    let mut book = MixedOrderBook::new(instrument);

    book.snapshot(
        &venue,
        &[
            entry(instrument, Side::Ask, "100", "1"),
            entry(instrument, Side::Ask, "101", "2"),
            entry(instrument, Side::Bid, "99", "3"),
        ],
        0.0,
    );
    assert_eq!(book.best_ask(), Some(fixed("100")));
    assert_eq!(book.best_bid(), Some(fixed("99")));

    // A zero-amount diff removes the 100 level.
    book.update(&venue, entry(instrument, Side::Ask, "100", "0"), 0.0);
    assert_eq!(book.best_ask(), Some(fixed("101")));
    assert_eq!(book.asks().len(), 1);
}

#[test]
fn rows_are_unique_per_exchange_and_price() {
    let (registry, instrument) = fixture();
    let venue = MockExchange::new("alpha", &registry);
    let mut book = MixedOrderBook::new(instrument);

    book.update(&venue, entry(instrument, Side::Ask, "100", "1"), 0.0);
    book.update(&venue, entry(instrument, Side::Ask, "100", "2.5"), 0.0);

    assert_eq!(book.asks().len(), 1, "same (exchange, price) replaces the row");
    assert_eq!(book.asks()[0].amount, fixed("2.5"));
}

#[test]
fn best_prices_span_all_venues() {
    let (registry, instrument) = fixture();
    let alpha = MockExchange::new("alpha", &registry);
    let beta = MockExchange::new("beta", &registry);
    let mut book = MixedOrderBook::new(instrument);

    book.update(&alpha, entry(instrument, Side::Bid, "99", "1"), 0.0);
    book.update(&beta, entry(instrument, Side::Bid, "99.5", "1"), 0.0);
    book.update(&alpha, entry(instrument, Side::Ask, "100.5", "1"), 0.0);
    book.update(&beta, entry(instrument, Side::Ask, "100.1", "1"), 0.0);

    assert_eq!(book.best_bid(), Some(fixed("99.5")));
    assert_eq!(book.best_ask(), Some(fixed("100.1")));

    book.clear_exchange(&beta);
    assert_eq!(book.best_bid(), Some(fixed("99")));
    assert_eq!(book.best_ask(), Some(fixed("100.5")));

    book.clear();
    assert_eq!(book.best_bid(), None);
    assert_eq!(book.best_ask(), None);
}

#[test]
fn iteration_orders_by_fee_adjusted_price() {
    let (registry, instrument) = fixture();
    let cheap = MockExchange::new("cheap", &registry);
    let pricey = MockExchange::new("pricey", &registry);
    let mut book = MixedOrderBook::new(instrument);

    // The raw-cheaper ask loses once its venue fee is priced in: 99 / (1 - 0.05) ≈ 104.2.
    book.update(&pricey, entry(instrument, Side::Ask, "99", "1"), 0.05);
    book.update(&cheap, entry(instrument, Side::Ask, "100", "1"), 0.001);

    let asks: Vec<SmolStr> = book.asks().iter().map(|item| item.exchange_name()).collect();
    assert_eq!(asks, vec![SmolStr::new("cheap"), SmolStr::new("pricey")]);
    assert!(book.asks()[0].price_with_fee < book.asks()[1].price_with_fee);

    // Raw best ask still reads the unadjusted price.
    assert_eq!(book.best_ask(), Some(fixed("99")));

    // Bids order descending by fee-adjusted price.
    book.update(&cheap, entry(instrument, Side::Bid, "98", "1"), 0.001);
    book.update(&pricey, entry(instrument, Side::Bid, "99", "1"), 0.05);
    assert_eq!(book.bids()[0].exchange_name(), SmolStr::new("cheap"));
}

#[test]
fn entries_for_other_instruments_are_filtered() {
    let (registry, instrument) = fixture();
    let other = registry.add_instrument_by_name("eth", "usdt");
    let venue = MockExchange::new("alpha", &registry);
    let mut book = MixedOrderBook::new(instrument);

    book.batch_update(
        &venue,
        &[
            entry(other, Side::Ask, "10", "1"),
            entry(instrument, Side::Ask, "100", "1"),
        ],
        0.0,
    );

    assert_eq!(book.asks().len(), 1);
    assert_eq!(book.asks()[0].price, fixed("100"));
}

#[test]
fn item_reservation_delegates_to_owning_exchange() {
    let (registry, instrument) = fixture();
    let venue = MockExchange::new("alpha", &registry);
    let mut book = MixedOrderBook::new(instrument);

    book.update(&venue, entry(instrument, Side::Ask, "100", "2"), 0.0);
    let item = &book.asks()[0];

    assert!(item.reserve(fixed("1.5")));
    assert_eq!(item.reserved(), 1.5);
    assert!(
        !item.reserve(fixed("1")),
        "reservation beyond the displayed amount fails"
    );

    // The reservation lives on the venue connector, not the book row.
    assert_eq!(venue.item_reserve(instrument, Side::Ask, &fixed("100")), 1.5);

    assert!(item.unreserve(fixed("0.5")));
    assert_eq!(item.reserved(), 1.0);
    assert!(item.unreserve_all());
    assert_eq!(item.reserved(), 0.0);
}
