use crate::{asset::SymbolIndex, instrument::InstrumentIndex};
use fnv::FnvHashMap;
use smol_str::SmolStr;

/// Per-connector bidirectional map between exchange-format identifiers (eg/ "btc_usdt") and
/// internal registry handles.
///
/// Adding a translation is idempotent on the internal side; lookups of unknown identifiers
/// return `None`.
#[derive(Debug, Default)]
pub struct ExchangeDictionary {
    symbol_from_exchange: FnvHashMap<SmolStr, SymbolIndex>,
    symbol_to_exchange: FnvHashMap<SymbolIndex, SmolStr>,
    instrument_from_exchange: FnvHashMap<SmolStr, InstrumentIndex>,
    instrument_to_exchange: FnvHashMap<InstrumentIndex, SmolStr>,
}

impl ExchangeDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a translation between an exchange-format symbol name and an internal handle.
    pub fn add_symbol_translation(&mut self, exchange_name: &str, symbol: SymbolIndex) {
        let exchange_name = SmolStr::new(exchange_name);
        self.symbol_from_exchange
            .insert(exchange_name.clone(), symbol);
        self.symbol_to_exchange.insert(symbol, exchange_name);
    }

    /// Register a translation between an exchange-format instrument name and an internal handle.
    pub fn add_instrument_translation(&mut self, exchange_name: &str, instrument: InstrumentIndex) {
        let exchange_name = SmolStr::new(exchange_name);
        self.instrument_from_exchange
            .insert(exchange_name.clone(), instrument);
        self.instrument_to_exchange
            .insert(instrument, exchange_name);
    }

    pub fn symbol_from_exchange(&self, exchange_name: &str) -> Option<SymbolIndex> {
        self.symbol_from_exchange.get(exchange_name).copied()
    }

    pub fn symbol_to_exchange(&self, symbol: SymbolIndex) -> Option<&str> {
        self.symbol_to_exchange
            .get(&symbol)
            .map(SmolStr::as_str)
    }

    pub fn instrument_from_exchange(&self, exchange_name: &str) -> Option<InstrumentIndex> {
        self.instrument_from_exchange.get(exchange_name).copied()
    }

    pub fn instrument_to_exchange(&self, instrument: InstrumentIndex) -> Option<&str> {
        self.instrument_to_exchange
            .get(&instrument)
            .map(SmolStr::as_str)
    }
}
