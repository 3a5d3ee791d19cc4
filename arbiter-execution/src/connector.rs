use crate::{constraints::TradeConstraints, error::ExecutionError, order::OrderHandle};
use arbiter_instrument::{
    Side, asset::SymbolIndex, instrument::InstrumentIndex, numeric::FixedNumber,
};
use async_trait::async_trait;
use smol_str::SmolStr;
use std::sync::Arc;

/// Connector contract driving one venue's authenticated command channel.
///
/// [`TradeConnector::start`] blocks until the streaming transport completes its handshake;
/// every other operation is non-blocking, enqueueing frames or scheduling requests. Command
/// operations return `false` when the command could not be issued (unknown instrument, missing
/// order id, no session); the reason is logged.
#[async_trait]
pub trait TradeConnector: Send + Sync + 'static {
    /// Apply the connector's JSON configuration.
    fn configure(&self, config: &str) -> Result<(), ExecutionError>;

    /// Establish the command session, fetching configured trade limits on the way up.
    async fn start(self: Arc<Self>) -> Result<(), ExecutionError>;

    /// Tear the command session down.
    fn stop(&self);

    /// Issue an order placement command.
    fn place_order(&self, order: &OrderHandle) -> bool;

    /// Issue an order cancellation command.
    fn cancel_order(&self, order: &OrderHandle) -> bool;

    /// Issue an order information command, refreshing the order status.
    fn order_status(&self, order: &OrderHandle) -> bool;

    /// Request the venue's open order list.
    fn orders_list(&self) -> bool;

    /// Request an account balance refresh.
    fn fetch_balance(&self) -> bool;

    /// Locally stored balance available for trading: `available − reserved`.
    fn balance(&self, symbol: SymbolIndex) -> f64;

    /// Reserve `quantity` against the stored balance; fails without side-effect when the
    /// reservation would overdraw.
    fn reserve_balance(&self, symbol: SymbolIndex, quantity: f64) -> bool;

    /// Release a previous balance reservation.
    fn unreserve_balance(&self, symbol: SymbolIndex, quantity: f64) -> bool;

    /// Reserve part of a displayed order book level.
    fn reserve_item(
        &self,
        instrument: InstrumentIndex,
        side: Side,
        price: &FixedNumber,
        displayed_amount: &FixedNumber,
        quantity: &FixedNumber,
    ) -> bool;

    /// Release part of an order book level reservation.
    fn unreserve_item(
        &self,
        instrument: InstrumentIndex,
        side: Side,
        price: &FixedNumber,
        quantity: &FixedNumber,
    ) -> bool;

    /// Currently reserved amount on an order book level.
    fn item_reserve(&self, instrument: InstrumentIndex, side: Side, price: &FixedNumber) -> f64;

    fn maker_fee(&self) -> f64;
    fn set_maker_fee(&self, fee: f64);
    fn taker_fee(&self) -> f64;
    fn set_taker_fee(&self, fee: f64);

    /// Trade limits for `instrument`, falling back to defaults with the connector's commission
    /// strategy.
    fn constraints(&self, instrument: InstrumentIndex) -> TradeConstraints;

    /// Connector name as it appears in the configuration.
    fn name(&self) -> SmolStr;

    /// Set the connector name.
    fn set_name(&self, name: &str);
}
