use arbiter::{
    data::{
        error::DataError,
        event::{CandlestickEntry, OrderBookEntry, OrderBookList},
        observer::MarketObserver,
    },
    execution::{
        error::ExecutionError,
        observer::AccountObserver,
        order::{OrderHandle, OrderStatus},
    },
    instrument::{
        asset::SymbolIndex, instrument::InstrumentIndex, numeric::FixedNumber,
        registry::InstrumentRegistry,
    },
    integration::profile::ProfilingTag,
    registry::{ConnectorRegistry, OkxConnectorFactory},
};
use std::sync::Arc;

#[derive(Debug, Default)]
struct NoOpObserver;

impl MarketObserver for NoOpObserver {
    fn invalidate_data(&self, _: Option<InstrumentIndex>, _: ProfilingTag) {}
    fn orderbook_entry(&self, _: OrderBookEntry, _: ProfilingTag) {}
    fn orderbook_entries_bulk(&self, _: OrderBookList, _: ProfilingTag) {}
    fn candlestick(&self, _: CandlestickEntry, _: ProfilingTag) {}
    fn symbol_added(&self, _: SymbolIndex, _: ProfilingTag) {}
    fn instrument_added(&self, _: InstrumentIndex, _: ProfilingTag) {}
    fn connector_error(&self, _: DataError) {}
}

impl AccountObserver for NoOpObserver {
    fn order_status_changed(&self, _: OrderHandle, _: OrderStatus, _: ProfilingTag) {}
    fn balance_received(&self, _: SymbolIndex, _: FixedNumber, _: ProfilingTag) {}
    fn connector_error(&self, _: ExecutionError) {}
}

#[test]
fn registered_factories_instantiate_named_connectors() {
    let mut factories = ConnectorRegistry::new();
    factories.register(Box::new(OkxConnectorFactory));
    assert_eq!(factories.factories().len(), 1);

    let registry = Arc::new(InstrumentRegistry::new());
    let observer = Arc::new(NoOpObserver);

    let market = factories.market_connector(
        "okx",
        Arc::clone(&observer) as _,
        Arc::clone(&registry),
    );
    assert_eq!(market.name(), "okx");

    let trade = factories.trade_connector("okx", observer as _, registry);
    assert_eq!(trade.name(), "okx");
}

#[test]
#[should_panic(expected = "already exists")]
fn duplicate_registration_is_fatal() {
    let mut factories = ConnectorRegistry::new();
    factories.register(Box::new(OkxConnectorFactory));
    factories.register(Box::new(OkxConnectorFactory));
}

#[test]
#[should_panic(expected = "does not exist")]
fn unknown_venue_lookup_is_fatal() {
    let factories = ConnectorRegistry::new();
    let registry = Arc::new(InstrumentRegistry::new());
    factories.market_connector("nowhere", Arc::new(NoOpObserver) as _, registry);
}
