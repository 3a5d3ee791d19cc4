use crate::asset::SymbolIndex;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Tradeable currency pair: an ordered `(base, quote)` pair of interned symbols.
///
/// eg/ Instrument { base: "btc", quote: "usdt" }
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Constructor,
)]
pub struct Instrument {
    pub base: SymbolIndex,
    pub quote: SymbolIndex,
}

impl Display for Instrument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.base, self.quote)
    }
}

/// Stable handle to an interned [`Instrument`] in the
/// [`InstrumentRegistry`](crate::registry::InstrumentRegistry).
///
/// Equality is identity: two handles are equal exactly when they refer to the same registry
/// entry. Handles never dangle for the registry's lifetime.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Constructor,
)]
pub struct InstrumentIndex(pub usize);

impl InstrumentIndex {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for InstrumentIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "InstrumentIndex({})", self.0)
    }
}
