use crate::error::DataError;
use arbiter_instrument::{dictionary::ExchangeDictionary, registry::InstrumentRegistry};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::warn;

/// Connector JSON configuration shared by price and trade connectors.
///
/// ```json
/// {
///   "dictionary": {"btc_usdt": ["btc", "usdt"], "btc": "btc"},
///   "limits-url": "https://example.com/limits.csv",
///   "api-key": "...",
///   "secret": "..."
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ConnectorConfig {
    /// Exchange-format name → `[base, quote]` instrument or `"symbol"` translation.
    pub dictionary: HashMap<String, DictionaryEntry>,

    /// CSV of per-instrument trade limits fetched on start.
    pub limits_url: Option<String>,

    /// Public credential for signing.
    pub api_key: Option<String>,

    /// Secret credential; only ever enters the signature digest.
    pub secret: Option<String>,

    pub maker_fee: Option<f64>,
    pub taker_fee: Option<f64>,

    /// Streaming endpoint override.
    pub ws_url: Option<String>,

    /// REST endpoint override.
    pub rest_url: Option<String>,

    /// Milliseconds without a pong before the ping is considered lost.
    pub ping_timeout: Option<u64>,

    /// Milliseconds of stream silence before a ping is issued.
    pub data_timeout: Option<u64>,

    /// Milliseconds before an unacknowledged command triggers a response timeout.
    pub response_timeout: Option<u64>,
}

/// One `dictionary` translation: an instrument pair or a single symbol.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DictionaryEntry {
    Instrument([String; 2]),
    Symbol(String),
}

impl ConnectorConfig {
    pub fn parse(raw: &str) -> Result<Self, DataError> {
        serde_json::from_str(raw).map_err(|error| DataError::Config(error.to_string()))
    }

    /// Build the connector's [`ExchangeDictionary`] from the configured translations.
    ///
    /// Translations naming symbols or pairs absent from the registry are logged and skipped.
    pub fn build_dictionary(&self, registry: &InstrumentRegistry) -> ExchangeDictionary {
        let mut dictionary = ExchangeDictionary::new();

        for (exchange_name, entry) in &self.dictionary {
            match entry {
                DictionaryEntry::Instrument([base, quote]) => {
                    match registry.find_instrument_by_name(base, quote) {
                        Some(instrument) => {
                            dictionary.add_instrument_translation(exchange_name, instrument);
                        }
                        None => warn!(
                            %exchange_name,
                            %base,
                            %quote,
                            "dictionary names an instrument missing from the registry"
                        ),
                    }
                }
                DictionaryEntry::Symbol(symbol) => match registry.find_symbol(symbol) {
                    Some(symbol) => dictionary.add_symbol_translation(exchange_name, symbol),
                    None => warn!(
                        %exchange_name,
                        %symbol,
                        "dictionary names a symbol missing from the registry"
                    ),
                },
            }
        }

        dictionary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognised_keys() {
        let config = ConnectorConfig::parse(
            r#"{
                "dictionary": {"btc_usdt": ["btc", "usdt"], "btc": "btc"},
                "limits-url": "https://example.com/limits.csv",
                "api-key": "key",
                "secret": "shh",
                "maker-fee": 0.001,
                "taker-fee": 0.002
            }"#,
        )
        .unwrap();

        assert_eq!(config.dictionary.len(), 2);
        assert_eq!(config.limits_url.as_deref(), Some("https://example.com/limits.csv"));
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.secret.as_deref(), Some("shh"));
        assert_eq!(config.maker_fee, Some(0.001));
        assert_eq!(config.taker_fee, Some(0.002));
    }

    #[test]
    fn test_build_dictionary_skips_unknown_entries() {
        let registry = InstrumentRegistry::new();
        let pair = registry.add_instrument_by_name("btc", "usdt");
        let btc = registry.find_symbol("btc").unwrap();

        let config = ConnectorConfig::parse(
            r#"{"dictionary": {
                "btc_usdt": ["btc", "usdt"],
                "eth_usdt": ["eth", "usdt"],
                "btc": "btc"
            }}"#,
        )
        .unwrap();

        let dictionary = config.build_dictionary(&registry);
        assert_eq!(dictionary.instrument_from_exchange("btc_usdt"), Some(pair));
        assert_eq!(dictionary.instrument_from_exchange("eth_usdt"), None);
        assert_eq!(dictionary.symbol_from_exchange("btc"), Some(btc));
    }
}
