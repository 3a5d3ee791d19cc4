use derive_more::Constructor;
use serde::{Deserialize, Deserializer, Serialize};
use smol_str::{SmolStr, StrExt};
use std::fmt::{Display, Formatter};

/// Arbiter new type representing a currency symbol `String` identifier.
///
/// eg/ "btc", "eth", "usdt", etc
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct Symbol(SmolStr);

impl Symbol {
    /// Construct a new [`Symbol`], lower-casing the provided identifier.
    pub fn new<S>(input: S) -> Self
    where
        S: Into<SmolStr>,
    {
        Self(input.into().to_lowercase_smolstr())
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Symbol {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Symbol::new)
    }
}

impl<S> From<S> for Symbol
where
    S: Into<SmolStr>,
{
    fn from(input: S) -> Self {
        Symbol::new(input)
    }
}

/// Stable handle to an interned [`Symbol`] in the
/// [`InstrumentRegistry`](crate::registry::InstrumentRegistry).
///
/// Equality is identity: two handles are equal exactly when they refer to the same registry
/// entry. Handles never dangle for the registry's lifetime.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize, Constructor,
)]
pub struct SymbolIndex(pub usize);

impl SymbolIndex {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl Display for SymbolIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SymbolIndex({})", self.0)
    }
}
