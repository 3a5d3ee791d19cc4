use crate::{
    error::ExecutionError,
    order::{OrderHandle, OrderStatus},
};
use arbiter_instrument::{asset::SymbolIndex, numeric::FixedNumber};
use arbiter_integration::profile::ProfilingTag;

/// Observer contract for account events.
///
/// Callbacks run on the transport thread that produced the event; consumers wanting a single
/// logical consumer thread dispatch through a task queue.
pub trait AccountObserver: Send + Sync + 'static {
    /// An order's status advanced. `previous` is the record the new status replaced.
    fn order_status_changed(&self, order: OrderHandle, previous: OrderStatus, tag: ProfilingTag);

    /// The venue reported a balance for `symbol`.
    fn balance_received(&self, symbol: SymbolIndex, value: FixedNumber, tag: ProfilingTag);

    /// The connector detected an error (network failure, protocol violation, ...). The
    /// connector remains usable; restarting is the consumer's decision.
    fn connector_error(&self, error: ExecutionError);
}
