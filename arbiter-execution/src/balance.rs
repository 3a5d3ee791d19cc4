use std::sync::atomic::{AtomicU64, Ordering};

/// Per-symbol `{available, reserved}` balance cell.
///
/// Both fields are `f64` bit patterns in atomics so concurrent reservers never double-book:
/// [`BalanceCell::reserve`] loops a compare-and-swap over `reserved` with the conservation
/// check `available − (reserved + quantity) ≥ 0` and `reserved + quantity ≥ 0`, then re-reads
/// `available` and compensates if a concurrent balance update invalidated the reservation.
#[derive(Debug, Default)]
pub struct BalanceCell {
    available: AtomicU64,
    reserved: AtomicU64,
}

impl BalanceCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn available(&self) -> f64 {
        f64::from_bits(self.available.load(Ordering::Acquire))
    }

    pub fn reserved(&self) -> f64 {
        f64::from_bits(self.reserved.load(Ordering::Acquire))
    }

    /// Balance still free for trading: `available − reserved`.
    pub fn free(&self) -> f64 {
        self.available() - self.reserved()
    }

    /// Store the venue-reported balance.
    pub fn set_available(&self, value: f64) {
        self.available.store(value.to_bits(), Ordering::Release);
    }

    /// Attempt to reserve `quantity`; fails without side-effect when the reservation would
    /// overdraw or turn negative.
    pub fn reserve(&self, quantity: f64) -> bool {
        let mut current = self.reserved();
        let new_reserve = loop {
            let new_reserve = current + quantity;
            if self.available() - new_reserve < 0.0 || new_reserve < 0.0 {
                return false;
            }

            match self.reserved.compare_exchange_weak(
                current.to_bits(),
                new_reserve.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => break new_reserve,
                Err(actual) => current = f64::from_bits(actual),
            }
        };

        // The stored balance may have dropped while the swap was in flight; the reservation is
        // best-effort consistent against stock balance updates.
        if self.available() < new_reserve {
            self.unreserve(quantity);
            return false;
        }

        true
    }

    /// Release `quantity` from the reservation.
    pub fn unreserve(&self, quantity: f64) -> bool {
        let mut current = self.reserved();
        loop {
            let new_reserve = current - quantity;
            match self.reserved.compare_exchange(
                current.to_bits(),
                new_reserve.to_bits(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = f64::from_bits(actual),
            }
        }
    }
}
