use crate::error::DataError;
use arbiter_instrument::instrument::InstrumentIndex;
use async_trait::async_trait;
use smol_str::SmolStr;
use std::sync::Arc;

/// Connector contract driving one venue's market-data session.
///
/// [`MarketConnector::start`] blocks until the streaming transport completes its handshake;
/// every other operation is non-blocking, enqueueing frames or scheduling requests.
#[async_trait]
pub trait MarketConnector: Send + Sync {
    /// Apply the connector's JSON configuration.
    fn configure(&self, config: &str) -> Result<(), DataError>;

    /// Establish the streaming session and flush subscriptions queued before connect.
    async fn start(self: Arc<Self>) -> Result<(), DataError>;

    /// Tear the streaming session down.
    fn stop(&self);

    /// Subscribe to streaming depth for the provided instruments. Unknown handles are logged
    /// and skipped; known handles are recorded for re-subscription after reconnect.
    fn subscribe(&self, instruments: &[InstrumentIndex]);

    /// Pull a full market depth snapshot for `instrument`.
    fn fetch_stack(&self, instrument: InstrumentIndex);

    /// Pull candlesticks for `instrument`, bucketing `interval_secs` to the venue's smallest
    /// qualifying interval.
    fn fetch_candlesticks(&self, instrument: InstrumentIndex, interval_secs: u64, since_ms: u64);

    /// Announce every registry symbol to the observer.
    fn fetch_symbols(&self);

    /// Announce every registry instrument to the observer.
    fn fetch_instruments(&self);

    /// Connector name as it appears in the configuration.
    fn name(&self) -> SmolStr;

    /// Set the connector name.
    fn set_name(&self, name: &str);
}
