use crate::{
    asset::{Symbol, SymbolIndex},
    instrument::{Instrument, InstrumentIndex},
};
use fnv::FnvHashMap;
use parking_lot::RwLock;

/// Append-only interning registry for all [`Symbol`]s and [`Instrument`]s known to the process.
///
/// Duplicate adds are no-ops returning the existing handle, so handles are stable and never
/// dangle for the registry's lifetime. One registry is constructed at startup and threaded
/// through connector constructors as an explicit dependency.
#[derive(Debug, Default)]
pub struct InstrumentRegistry {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    symbols: Vec<Symbol>,
    symbol_lookup: FnvHashMap<Symbol, SymbolIndex>,
    instruments: Vec<Instrument>,
    instrument_lookup: FnvHashMap<(SymbolIndex, SymbolIndex), InstrumentIndex>,
}

impl InstrumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a symbol, returning its stable handle. Adding an already-known symbol is a no-op.
    pub fn add_symbol(&self, name: &str) -> SymbolIndex {
        let symbol = Symbol::new(name);
        let mut inner = self.inner.write();

        if let Some(index) = inner.symbol_lookup.get(&symbol) {
            return *index;
        }

        let index = SymbolIndex(inner.symbols.len());
        inner.symbols.push(symbol.clone());
        inner.symbol_lookup.insert(symbol, index);
        index
    }

    /// Look up the handle of a previously interned symbol.
    pub fn find_symbol(&self, name: &str) -> Option<SymbolIndex> {
        self.inner
            .read()
            .symbol_lookup
            .get(&Symbol::new(name))
            .copied()
    }

    /// Intern an instrument from two previously interned symbols.
    ///
    /// Adding an already-known pair is a no-op returning the existing handle.
    pub fn add_instrument(&self, base: SymbolIndex, quote: SymbolIndex) -> InstrumentIndex {
        let mut inner = self.inner.write();

        if let Some(index) = inner.instrument_lookup.get(&(base, quote)) {
            return *index;
        }

        let index = InstrumentIndex(inner.instruments.len());
        inner.instruments.push(Instrument::new(base, quote));
        inner.instrument_lookup.insert((base, quote), index);
        index
    }

    /// Intern an instrument by symbol names, interning the symbols as required.
    pub fn add_instrument_by_name(&self, base: &str, quote: &str) -> InstrumentIndex {
        let base = self.add_symbol(base);
        let quote = self.add_symbol(quote);
        self.add_instrument(base, quote)
    }

    /// Look up the handle of a previously interned instrument.
    pub fn find_instrument(
        &self,
        base: SymbolIndex,
        quote: SymbolIndex,
    ) -> Option<InstrumentIndex> {
        self.inner
            .read()
            .instrument_lookup
            .get(&(base, quote))
            .copied()
    }

    /// Look up an instrument handle by symbol names.
    pub fn find_instrument_by_name(&self, base: &str, quote: &str) -> Option<InstrumentIndex> {
        let base = self.find_symbol(base)?;
        let quote = self.find_symbol(quote)?;
        self.find_instrument(base, quote)
    }

    /// The interned [`Symbol`] behind a handle.
    pub fn symbol(&self, index: SymbolIndex) -> Symbol {
        self.inner.read().symbols[index.index()].clone()
    }

    /// The interned [`Instrument`] behind a handle.
    pub fn instrument(&self, index: InstrumentIndex) -> Instrument {
        self.inner.read().instruments[index.index()]
    }

    /// Handles of every interned symbol, in interning order.
    pub fn symbols(&self) -> Vec<SymbolIndex> {
        (0..self.inner.read().symbols.len())
            .map(SymbolIndex)
            .collect()
    }

    /// Handles of every interned instrument, in interning order.
    pub fn instruments(&self) -> Vec<InstrumentIndex> {
        (0..self.inner.read().instruments.len())
            .map(InstrumentIndex)
            .collect()
    }
}
