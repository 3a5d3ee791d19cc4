use crate::commission::{CommissionStrategy, default_strategy};
use arbiter_instrument::numeric::FixedNumber;
use tracing::warn;

/// Per-instrument trade limits together with the commission charging strategy.
#[derive(Debug, Copy, Clone)]
pub struct TradeConstraints {
    pub price_min: FixedNumber,
    pub price_max: FixedNumber,
    pub price_quantum: FixedNumber,
    pub amount_min: FixedNumber,
    pub amount_max: FixedNumber,
    pub amount_quantum: FixedNumber,
    pub total_min: FixedNumber,
    pub total_max: FixedNumber,
    pub total_quantum: FixedNumber,
    pub commission: &'static dyn CommissionStrategy,
}

impl Default for TradeConstraints {
    fn default() -> Self {
        Self {
            price_min: FixedNumber::ZERO,
            price_max: FixedNumber::ZERO,
            price_quantum: FixedNumber::ZERO,
            amount_min: FixedNumber::ZERO,
            amount_max: FixedNumber::ZERO,
            amount_quantum: FixedNumber::ZERO,
            total_min: FixedNumber::ZERO,
            total_max: FixedNumber::ZERO,
            total_quantum: FixedNumber::ZERO,
            commission: default_strategy(),
        }
    }
}

/// One row of the trade limits CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitsRow {
    /// Exchange-format instrument name.
    pub instrument: String,
    pub amount_min: FixedNumber,
    pub amount_quantum: FixedNumber,
    pub price_quantum: FixedNumber,
}

/// Parse the trade limits CSV.
///
/// Lines are CR-delimited with the first line a header; a leading LF on continuation lines is
/// tolerated. Columns 1..4 carry instrument, amount_min, amount_quantum and price_quantum.
/// Rows that fail to parse are logged and skipped.
pub fn parse_limits_csv(body: &str) -> Vec<LimitsRow> {
    body.split('\r')
        .skip(1)
        .filter_map(|line| {
            let line = line.strip_prefix('\n').unwrap_or(line);
            if line.is_empty() {
                return None;
            }

            let values: Vec<&str> = line.split(',').collect();
            if values.len() < 5 {
                warn!(line, "limits CSV row carries too few columns");
                return None;
            }

            let parsed = (
                values[2].trim().parse::<FixedNumber>(),
                values[3].trim().parse::<FixedNumber>(),
                values[4].trim().parse::<FixedNumber>(),
            );
            match parsed {
                (Ok(amount_min), Ok(amount_quantum), Ok(price_quantum)) => Some(LimitsRow {
                    instrument: values[1].trim().to_string(),
                    amount_min,
                    amount_quantum,
                    price_quantum,
                }),
                _ => {
                    warn!(line, "limits CSV row carries unparseable numbers");
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(input: &str) -> FixedNumber {
        input.parse().unwrap()
    }

    #[test]
    fn test_parse_limits_csv_skips_header_and_bad_rows() {
        let body = "id,pair,amount_min,amount_quantum,price_quantum\r\
                    \n1,btc_usdt,0.001,0.0001,0.01\r\
                    \n2,eth_usdt,bogus,0.001,0.01\r\
                    \n3,ltc_usdt,0.1,0.01,0.001\r";

        let rows = parse_limits_csv(body);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].instrument, "btc_usdt");
        assert_eq!(rows[0].amount_min, fixed("0.001"));
        assert_eq!(rows[0].amount_quantum, fixed("0.0001"));
        assert_eq!(rows[0].price_quantum, fixed("0.01"));

        assert_eq!(rows[1].instrument, "ltc_usdt");
    }

    #[test]
    fn test_default_constraints_use_external_commission() {
        let constraints = TradeConstraints::default();
        assert_eq!(constraints.commission.name(), "external");
        assert!(constraints.amount_min.is_zero());
    }
}
