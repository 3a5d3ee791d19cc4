use arbiter_data::{connector::MarketConnector, exchange::okx::OkxMarketConnector, observer::MarketObserver};
use arbiter_execution::{
    connector::TradeConnector, exchange::okx::OkxTradeConnector, observer::AccountObserver,
};
use arbiter_instrument::registry::InstrumentRegistry;
use fnv::FnvHashMap;
use smol_str::SmolStr;
use std::{fmt, sync::Arc};

/// Capability for instantiating one venue's connectors.
pub trait ConnectorFactory: Send + Sync {
    /// Venue tag the factory registers under.
    fn name(&self) -> &'static str;

    fn market_connector(
        &self,
        observer: Arc<dyn MarketObserver>,
        registry: Arc<InstrumentRegistry>,
    ) -> Arc<dyn MarketConnector>;

    fn trade_connector(
        &self,
        observer: Arc<dyn AccountObserver>,
        registry: Arc<InstrumentRegistry>,
    ) -> Arc<dyn TradeConnector>;
}

/// Registry mapping venue tags to [`ConnectorFactory`] capabilities.
///
/// Owned by the application and threaded to wherever connectors are built. Duplicate
/// registration and unknown venue lookups are programming errors and abort.
#[derive(Default)]
pub struct ConnectorRegistry {
    factories: FnvHashMap<SmolStr, Box<dyn ConnectorFactory>>,
}

impl ConnectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under its venue tag.
    ///
    /// Panics when the tag is already taken.
    pub fn register(&mut self, factory: Box<dyn ConnectorFactory>) {
        let name = SmolStr::new(factory.name());
        if self.factories.contains_key(&name) {
            panic!("connector factory '{name}' already exists");
        }
        self.factories.insert(name, factory);
    }

    /// Registered venue tags.
    pub fn factories(&self) -> Vec<SmolStr> {
        self.factories.keys().cloned().collect()
    }

    /// Instantiate a price connector for `venue`, named after its tag.
    ///
    /// Panics when the venue is unknown.
    pub fn market_connector(
        &self,
        venue: &str,
        observer: Arc<dyn MarketObserver>,
        registry: Arc<InstrumentRegistry>,
    ) -> Arc<dyn MarketConnector> {
        let Some(factory) = self.factories.get(venue) else {
            panic!("connector factory '{venue}' does not exist");
        };

        let connector = factory.market_connector(observer, registry);
        connector.set_name(venue);
        connector
    }

    /// Instantiate a trade connector for `venue`, named after its tag.
    ///
    /// Panics when the venue is unknown.
    pub fn trade_connector(
        &self,
        venue: &str,
        observer: Arc<dyn AccountObserver>,
        registry: Arc<InstrumentRegistry>,
    ) -> Arc<dyn TradeConnector> {
        let Some(factory) = self.factories.get(venue) else {
            panic!("connector factory '{venue}' does not exist");
        };

        let connector = factory.trade_connector(observer, registry);
        connector.set_name(venue);
        connector
    }
}

impl fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorRegistry")
            .field("factories", &self.factories())
            .finish()
    }
}

/// Factory for the OKX spot dialect connectors.
#[derive(Debug, Default)]
pub struct OkxConnectorFactory;

impl ConnectorFactory for OkxConnectorFactory {
    fn name(&self) -> &'static str {
        "okx"
    }

    fn market_connector(
        &self,
        observer: Arc<dyn MarketObserver>,
        registry: Arc<InstrumentRegistry>,
    ) -> Arc<dyn MarketConnector> {
        OkxMarketConnector::new(observer, registry)
    }

    fn trade_connector(
        &self,
        observer: Arc<dyn AccountObserver>,
        registry: Arc<InstrumentRegistry>,
    ) -> Arc<dyn TradeConnector> {
        OkxTradeConnector::new(observer, registry)
    }
}
