use arbiter_instrument::Side;
use std::fmt::Debug;

/// Commission charging strategy: how a venue's fee scales the base and quote legs of a trade.
pub trait CommissionStrategy: Send + Sync + Debug {
    /// Multiplier applied to the base amount.
    fn base_ratio(&self, side: Side, fee: f64) -> f64;

    /// Multiplier applied to the quote total.
    fn quote_ratio(&self, side: Side, fee: f64) -> f64;

    fn name(&self) -> &'static str;
}

/// Fee charged on the quote leg: buys pay `1 + fee`, sells receive `1 − fee`.
#[derive(Debug)]
pub struct QuoteCommission;

impl CommissionStrategy for QuoteCommission {
    fn base_ratio(&self, _side: Side, _fee: f64) -> f64 {
        1.0
    }

    fn quote_ratio(&self, side: Side, fee: f64) -> f64 {
        match side {
            Side::Bid => 1.0 + fee,
            Side::Ask => 1.0 - fee,
        }
    }

    fn name(&self) -> &'static str {
        "quote"
    }
}

/// Fee charged on the incoming leg: buys receive `1 − fee` base, sells receive `1 − fee` quote.
#[derive(Debug)]
pub struct IncomeCommission;

impl CommissionStrategy for IncomeCommission {
    fn base_ratio(&self, side: Side, fee: f64) -> f64 {
        match side {
            Side::Bid => 1.0 - fee,
            Side::Ask => 1.0,
        }
    }

    fn quote_ratio(&self, side: Side, fee: f64) -> f64 {
        match side {
            Side::Bid => 1.0,
            Side::Ask => 1.0 - fee,
        }
    }

    fn name(&self) -> &'static str {
        "income"
    }
}

/// Fee settled outside the traded legs; both ratios are 1.
#[derive(Debug)]
pub struct ExternalCommission;

impl CommissionStrategy for ExternalCommission {
    fn base_ratio(&self, _side: Side, _fee: f64) -> f64 {
        1.0
    }

    fn quote_ratio(&self, _side: Side, _fee: f64) -> f64 {
        1.0
    }

    fn name(&self) -> &'static str {
        "external"
    }
}

static QUOTE: QuoteCommission = QuoteCommission;
static INCOME: IncomeCommission = IncomeCommission;
static EXTERNAL: ExternalCommission = ExternalCommission;

/// The strategy used when a configuration names none.
pub fn default_strategy() -> &'static dyn CommissionStrategy {
    &EXTERNAL
}

/// Look a strategy up by case-insensitive name.
pub fn by_name(name: &str) -> Option<&'static dyn CommissionStrategy> {
    match name.to_ascii_lowercase().as_str() {
        "quote" => Some(&QUOTE),
        "income" => Some(&INCOME),
        "external" => Some(&EXTERNAL),
        _ => None,
    }
}
