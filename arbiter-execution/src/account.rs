use crate::{balance::BalanceCell, constraints::TradeConstraints};
use arbiter_instrument::{
    Side, asset::SymbolIndex, instrument::InstrumentIndex, numeric::FixedNumber,
    registry::InstrumentRegistry,
};
use fnv::FnvHashMap;
use parking_lot::{Mutex, RwLock};
use std::{
    collections::BTreeMap,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

/// Residuals within this band compact to zero and evict the reservation key.
const RESERVE_EPSILON: f64 = 1e-13;

/// Per-instrument `(side, price) → reserved` map guarded by one lock.
#[derive(Debug, Default)]
struct BookReserve {
    sides: Mutex<[BTreeMap<FixedNumber, f64>; 2]>,
}

/// Balance, order-book reservation and constraint bookkeeping shared by trade connectors.
///
/// Balance cells are lock-free; order-book reservations take a per-instrument mutex. The
/// ledger is seeded with every registry symbol and instrument at construction and grows as the
/// configuration names more.
#[derive(Debug, Default)]
pub struct AccountLedger {
    balances: RwLock<FnvHashMap<SymbolIndex, Arc<BalanceCell>>>,
    book_reserve: RwLock<FnvHashMap<InstrumentIndex, Arc<BookReserve>>>,
    constraints: RwLock<FnvHashMap<InstrumentIndex, TradeConstraints>>,
    maker_fee: AtomicU64,
    taker_fee: AtomicU64,
}

impl AccountLedger {
    /// Construct a ledger seeded with every symbol and instrument the registry holds.
    pub fn new(registry: &InstrumentRegistry) -> Self {
        let ledger = Self::default();
        for symbol in registry.symbols() {
            ledger.add_symbol(symbol);
        }
        for instrument in registry.instruments() {
            ledger.add_instrument(instrument);
        }
        ledger
    }

    /// Track balances for `symbol`.
    pub fn add_symbol(&self, symbol: SymbolIndex) {
        self.balances
            .write()
            .entry(symbol)
            .or_insert_with(|| Arc::new(BalanceCell::new()));
    }

    /// Track order-book reservations for `instrument`.
    pub fn add_instrument(&self, instrument: InstrumentIndex) {
        self.book_reserve
            .write()
            .entry(instrument)
            .or_insert_with(|| Arc::new(BookReserve::default()));
    }

    fn cell(&self, symbol: SymbolIndex) -> Arc<BalanceCell> {
        if let Some(cell) = self.balances.read().get(&symbol) {
            return Arc::clone(cell);
        }

        Arc::clone(
            self.balances
                .write()
                .entry(symbol)
                .or_insert_with(|| Arc::new(BalanceCell::new())),
        )
    }

    /// Balance free for trading: `available − reserved`. Unknown symbols materialise a zero
    /// cell.
    pub fn balance(&self, symbol: SymbolIndex) -> f64 {
        self.cell(symbol).free()
    }

    /// Store the venue-reported balance for `symbol`.
    pub fn set_available(&self, symbol: SymbolIndex, value: &FixedNumber) {
        self.cell(symbol).set_available(value.to_f64());
    }

    pub fn reserve_balance(&self, symbol: SymbolIndex, quantity: f64) -> bool {
        match self.balances.read().get(&symbol) {
            Some(cell) => cell.reserve(quantity),
            None => false,
        }
    }

    pub fn unreserve_balance(&self, symbol: SymbolIndex, quantity: f64) -> bool {
        match self.balances.read().get(&symbol) {
            Some(cell) => cell.unreserve(quantity),
            None => false,
        }
    }

    /// Reserve part of a displayed order book level.
    ///
    /// Ask-side amounts are positive and bound the reservation from above; bid-side amounts
    /// are expressed as negatives and bound it from below.
    pub fn reserve_item(
        &self,
        instrument: InstrumentIndex,
        side: Side,
        price: &FixedNumber,
        displayed_amount: &FixedNumber,
        quantity: &FixedNumber,
    ) -> bool {
        let Some(reserve) = self.book_reserve.read().get(&instrument).cloned() else {
            return false;
        };

        let mut sides = reserve.sides.lock();
        let levels = &mut sides[side as usize];
        let current = levels.get(price).copied().unwrap_or(0.0);
        let requested = current + quantity.to_f64();
        let displayed = displayed_amount.to_f64();

        if displayed > 0.0 {
            if requested > displayed {
                return false;
            }
        } else if requested < displayed {
            return false;
        }

        levels.insert(*price, requested);
        true
    }

    /// Release part of an order book level reservation, evicting near-zero residuals.
    pub fn unreserve_item(
        &self,
        instrument: InstrumentIndex,
        side: Side,
        price: &FixedNumber,
        quantity: &FixedNumber,
    ) -> bool {
        let Some(reserve) = self.book_reserve.read().get(&instrument).cloned() else {
            return false;
        };

        let mut sides = reserve.sides.lock();
        let levels = &mut sides[side as usize];
        let residual = levels.get(price).copied().unwrap_or(0.0) - quantity.to_f64();

        if residual.abs() < RESERVE_EPSILON {
            levels.remove(price);
        } else {
            levels.insert(*price, residual);
        }

        true
    }

    /// Currently reserved amount on an order book level.
    pub fn item_reserve(&self, instrument: InstrumentIndex, side: Side, price: &FixedNumber) -> f64 {
        let Some(reserve) = self.book_reserve.read().get(&instrument).cloned() else {
            return 0.0;
        };

        let sides = reserve.sides.lock();
        sides[side as usize].get(price).copied().unwrap_or(0.0)
    }

    /// Trade limits for `instrument`, defaulting when none were ingested.
    pub fn constraints(&self, instrument: InstrumentIndex) -> TradeConstraints {
        self.constraints
            .read()
            .get(&instrument)
            .copied()
            .unwrap_or_default()
    }

    pub fn set_constraints(&self, instrument: InstrumentIndex, constraints: TradeConstraints) {
        self.constraints.write().insert(instrument, constraints);
    }

    pub fn maker_fee(&self) -> f64 {
        f64::from_bits(self.maker_fee.load(Ordering::Acquire))
    }

    pub fn set_maker_fee(&self, fee: f64) {
        self.maker_fee.store(fee.to_bits(), Ordering::Release);
    }

    pub fn taker_fee(&self) -> f64 {
        f64::from_bits(self.taker_fee.load(Ordering::Acquire))
    }

    pub fn set_taker_fee(&self, fee: f64) {
        self.taker_fee.store(fee.to_bits(), Ordering::Release);
    }
}
