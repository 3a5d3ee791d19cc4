use crate::connector::TradeConnector;
use arbiter_instrument::{Side, instrument::InstrumentIndex, numeric::FixedNumber};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{
    any::Any,
    fmt,
    sync::{Arc, Weak},
};

/// Shared handle to a [`TradeOrder`].
pub type OrderHandle = Arc<TradeOrder>;

/// Order execution type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum ExecutionType {
    /// Limited price execution.
    Limit,
    /// Immediate or cancel.
    Ioc,
    /// Market execution.
    Market,
}

/// Order lifecycle state.
///
/// Transitions: `None → Unknown → {Placed, Failed}`; `Placed → {PartialFilled, Filled,
/// PartialCancelled, Cancelled, Unknown}`; `PartialFilled → {Filled, Cancelled,
/// PartialCancelled}`. `Failed`, `Filled` and `Cancelled` are terminal from the connector's
/// perspective.
#[derive(
    Debug, Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize,
)]
pub enum OrderState {
    /// Undefined (just created).
    #[default]
    None,
    /// Command issued, but the result is unknown (for instance, no response yet).
    Unknown,
    Placed,
    Filled,
    PartialFilled,
    PartialCancelled,
    Cancelled,
    Failed,
}

impl OrderState {
    /// True once the connector will drive no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderState::Filled | OrderState::Cancelled | OrderState::Failed
        )
    }

    /// Whether the state machine permits a transition from `self` to `next`.
    pub fn permits(&self, next: OrderState) -> bool {
        match self {
            OrderState::None => matches!(next, OrderState::Unknown),
            OrderState::Unknown => matches!(next, OrderState::Placed | OrderState::Failed),
            OrderState::Placed => matches!(
                next,
                OrderState::PartialFilled
                    | OrderState::Filled
                    | OrderState::PartialCancelled
                    | OrderState::Cancelled
                    | OrderState::Unknown
            ),
            OrderState::PartialFilled => matches!(
                next,
                OrderState::Filled | OrderState::Cancelled | OrderState::PartialCancelled
            ),
            OrderState::PartialCancelled => {
                matches!(next, OrderState::Cancelled | OrderState::Filled)
            }
            OrderState::Filled | OrderState::Cancelled | OrderState::Failed => false,
        }
    }
}

/// Mutable status sub-record of a [`TradeOrder`].
#[derive(Debug, Clone, Default, Eq, PartialEq, Deserialize, Serialize)]
pub struct OrderStatus {
    pub state: OrderState,
    /// Venue-assigned order identifier, empty until placement is acknowledged.
    pub order_id: SmolStr,
    pub filled_amount: FixedNumber,
    pub filled_price: FixedNumber,
    /// Milliseconds, 0 when not yet known.
    pub created_ms: i64,
    pub finished_ms: i64,
    pub cancelled_ms: i64,
}

/// Trade order owned by its creator.
///
/// The immutable intent (instrument, side, execution type, amount, price) is fixed at
/// construction; the connector drives the [`OrderStatus`] record through the state machine as
/// venue replies arrive.
pub struct TradeOrder {
    instrument: InstrumentIndex,
    side: Side,
    execution: ExecutionType,
    amount: FixedNumber,
    price: FixedNumber,
    status: Mutex<OrderStatus>,
    userdata: Mutex<Option<Arc<dyn Any + Send + Sync>>>,
    connector: Weak<dyn TradeConnector>,
}

impl TradeOrder {
    pub fn new(
        connector: &Arc<dyn TradeConnector>,
        instrument: InstrumentIndex,
        side: Side,
        execution: ExecutionType,
        amount: FixedNumber,
        price: FixedNumber,
    ) -> OrderHandle {
        Arc::new(Self {
            instrument,
            side,
            execution,
            amount,
            price,
            status: Mutex::new(OrderStatus::default()),
            userdata: Mutex::new(None),
            connector: Arc::downgrade(connector),
        })
    }

    /// Place this order on its connector.
    pub fn place(self: &Arc<Self>) -> bool {
        match self.connector.upgrade() {
            Some(connector) => connector.place_order(self),
            None => false,
        }
    }

    /// Cancel this order on its connector.
    pub fn cancel(self: &Arc<Self>) -> bool {
        match self.connector.upgrade() {
            Some(connector) => connector.cancel_order(self),
            None => false,
        }
    }

    /// Request a status refresh from the venue.
    pub fn update_status(self: &Arc<Self>) -> bool {
        match self.connector.upgrade() {
            Some(connector) => connector.order_status(self),
            None => false,
        }
    }

    pub fn instrument(&self) -> InstrumentIndex {
        self.instrument
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn execution(&self) -> ExecutionType {
        self.execution
    }

    pub fn amount(&self) -> FixedNumber {
        self.amount
    }

    pub fn price(&self) -> FixedNumber {
        self.price
    }

    /// Snapshot of the current status.
    pub fn status(&self) -> OrderStatus {
        self.status.lock().clone()
    }

    /// Swap `status` in, leaving the previous status in its place.
    pub fn swap_status(&self, status: &mut OrderStatus) {
        std::mem::swap(&mut *self.status.lock(), status);
    }

    /// Mutate the status in place without producing an observer event.
    pub(crate) fn with_status<T>(&self, mutate: impl FnOnce(&mut OrderStatus) -> T) -> T {
        mutate(&mut self.status.lock())
    }

    pub fn set_userdata(&self, userdata: Arc<dyn Any + Send + Sync>) {
        *self.userdata.lock() = Some(userdata);
    }

    pub fn userdata(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.userdata.lock().clone()
    }

    pub fn connector(&self) -> Option<Arc<dyn TradeConnector>> {
        self.connector.upgrade()
    }
}

impl fmt::Debug for TradeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TradeOrder")
            .field("instrument", &self.instrument)
            .field("side", &self.side)
            .field("execution", &self.execution)
            .field("amount", &self.amount)
            .field("price", &self.price)
            .field("status", &*self.status.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states_permit_nothing() {
        for terminal in [OrderState::Filled, OrderState::Cancelled, OrderState::Failed] {
            assert!(terminal.is_terminal());
            for next in [
                OrderState::None,
                OrderState::Unknown,
                OrderState::Placed,
                OrderState::Filled,
                OrderState::PartialFilled,
                OrderState::PartialCancelled,
                OrderState::Cancelled,
                OrderState::Failed,
            ] {
                assert!(!terminal.permits(next), "{terminal:?} -> {next:?}");
            }
        }
    }

    #[test]
    fn test_lifecycle_transitions() {
        assert!(OrderState::None.permits(OrderState::Unknown));
        assert!(!OrderState::None.permits(OrderState::Placed));

        assert!(OrderState::Unknown.permits(OrderState::Placed));
        assert!(OrderState::Unknown.permits(OrderState::Failed));
        assert!(!OrderState::Unknown.permits(OrderState::Filled));

        assert!(OrderState::Placed.permits(OrderState::PartialFilled));
        assert!(OrderState::Placed.permits(OrderState::Cancelled));
        assert!(OrderState::Placed.permits(OrderState::Unknown));

        assert!(OrderState::PartialFilled.permits(OrderState::Filled));
        assert!(OrderState::PartialFilled.permits(OrderState::PartialCancelled));
        assert!(!OrderState::PartialFilled.permits(OrderState::Placed));
    }

    #[test]
    fn test_swap_status_exchanges_records() {
        let order = TradeOrder {
            instrument: InstrumentIndex(0),
            side: Side::Bid,
            execution: ExecutionType::Limit,
            amount: FixedNumber::from(1),
            price: FixedNumber::from(100),
            status: Mutex::new(OrderStatus::default()),
            userdata: Mutex::new(None),
            connector: Weak::<crate::exchange::okx::OkxTradeConnector>::new(),
        };

        let mut incoming = OrderStatus {
            state: OrderState::Placed,
            order_id: SmolStr::new("42"),
            ..OrderStatus::default()
        };
        order.swap_status(&mut incoming);

        assert_eq!(incoming.state, OrderState::None, "swap returns the old record");
        assert_eq!(order.status().state, OrderState::Placed);
        assert_eq!(order.status().order_id, "42");
    }
}
