use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::{
    cmp::Ordering,
    fmt::{Display, Formatter},
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
    str::FromStr,
};
use thiserror::Error;

/// Default number of fractional digits used when constructing from a float.
pub const DEFAULT_ACCURACY: u32 = 8;

/// Largest supported number of fractional digits.
pub const MAX_ACCURACY: u32 = 18;

const POW10: [i64; 19] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
    10_000_000_000,
    100_000_000_000,
    1_000_000_000_000,
    10_000_000_000_000,
    100_000_000_000_000,
    1_000_000_000_000_000,
    10_000_000_000_000_000,
    100_000_000_000_000_000,
    1_000_000_000_000_000_000,
];

/// Power-of-ten lookup used by all [`FixedNumber`] arithmetic.
///
/// Exponents at or above the table size exceed what an `i64` mantissa can carry and abort the
/// process.
fn pow10(exp: u32) -> i64 {
    match POW10.get(exp as usize) {
        Some(power) => *power,
        None => panic!("power-of-ten table exceeded: 10^{exp}"),
    }
}

/// Errors generated parsing a [`FixedNumber`] from a decimal string.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum NumericError {
    #[error("invalid decimal string: {0}")]
    InvalidDecimal(String),

    #[error("integer component overflow in decimal string: {0}")]
    Overflow(String),

    #[error("too many fractional digits ({digits} > {MAX_ACCURACY}) in decimal string: {input}")]
    Accuracy { input: String, digits: usize },
}

/// Signed decimal fixed-point scalar.
///
/// Holds an integer part, a fractional mantissa (`base`) and the number of fractional digits
/// (`exp`), with `|base| < 10^exp` and both parts carrying the sign of the number. Addition,
/// subtraction and multiplication are exact; division rounds to nearest. Comparison agrees with
/// arithmetic: `a == b` exactly when `a - b` is zero.
#[derive(Debug, Copy, Clone, Default)]
pub struct FixedNumber {
    int: i64,
    base: i64,
    exp: u32,
}

impl FixedNumber {
    /// Zero with no fractional digits.
    pub const ZERO: FixedNumber = FixedNumber {
        int: 0,
        base: 0,
        exp: 0,
    };

    /// Construct from a float, truncating the fraction at `accuracy` digits and stripping
    /// trailing zeroes.
    pub fn from_f64(value: f64, accuracy: u32) -> Self {
        let int = value.trunc() as i64;
        let mut exp = accuracy;
        let mut base = ((value - int as f64) * pow10(exp) as f64) as i64;

        while exp > 0 && base % 10 == 0 {
            base /= 10;
            exp -= 1;
        }

        Self { int, base, exp }
    }

    /// Integer part.
    pub fn int_part(&self) -> i64 {
        self.int
    }

    /// Fractional mantissa.
    pub fn fraction(&self) -> i64 {
        self.base
    }

    /// Number of fractional digits.
    pub fn accuracy(&self) -> u32 {
        self.exp
    }

    /// Nearest `f64` representation.
    pub fn to_f64(&self) -> f64 {
        self.int as f64 + self.base as f64 / pow10(self.exp) as f64
    }

    /// True if the value is exactly zero, regardless of declared accuracy.
    pub fn is_zero(&self) -> bool {
        self.int == 0 && self.base == 0
    }

    /// True for values below zero.
    pub fn is_negative(&self) -> bool {
        self.int < 0 || self.base < 0
    }

    /// Rescale to exactly `accuracy` fractional digits, truncating or zero-extending the
    /// mantissa.
    pub fn set_accuracy(&mut self, accuracy: u32) -> &mut Self {
        match accuracy.cmp(&self.exp) {
            Ordering::Less => self.base /= pow10(self.exp - accuracy),
            Ordering::Greater => self.base *= pow10(accuracy - self.exp),
            Ordering::Equal => {}
        }
        self.exp = accuracy;
        self
    }

    /// Exchange values with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Both mantissas scaled to a common exponent for comparison.
    fn aligned(&self, other: &Self) -> (i64, i64) {
        if other.exp > self.exp {
            (self.base * pow10(other.exp - self.exp), other.base)
        } else {
            (self.base, other.base * pow10(self.exp - other.exp))
        }
    }

    /// Restore `|base| < 10^exp` and sign consistency after raw part arithmetic.
    fn normalise(int: i64, base: i64, exp: u32) -> Self {
        let unit = pow10(exp);
        let mut int = int + base / unit;
        let mut base = base % unit;

        if int > 0 && base < 0 {
            int -= 1;
            base += unit;
        } else if int < 0 && base > 0 {
            int += 1;
            base -= unit;
        }

        Self { int, base, exp }
    }
}

impl From<i64> for FixedNumber {
    fn from(value: i64) -> Self {
        Self {
            int: value,
            base: 0,
            exp: 0,
        }
    }
}

impl FromStr for FixedNumber {
    type Err = NumericError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let negative = trimmed.starts_with('-');

        let (int_digits, frac_digits) = match trimmed.split_once('.') {
            Some((int_digits, frac_digits)) => (int_digits, frac_digits),
            None => (trimmed, ""),
        };

        let int = int_digits
            .parse::<i64>()
            .map_err(|error| match error.kind() {
                std::num::IntErrorKind::PosOverflow | std::num::IntErrorKind::NegOverflow => {
                    NumericError::Overflow(input.to_string())
                }
                _ => NumericError::InvalidDecimal(input.to_string()),
            })?;

        if frac_digits.is_empty() {
            return Ok(Self { int, base: 0, exp: 0 });
        }

        if frac_digits.len() > MAX_ACCURACY as usize {
            return Err(NumericError::Accuracy {
                input: input.to_string(),
                digits: frac_digits.len(),
            });
        }

        let unsigned_base = frac_digits
            .parse::<u64>()
            .map_err(|_| NumericError::InvalidDecimal(input.to_string()))?;

        let base = if negative {
            -(unsigned_base as i64)
        } else {
            unsigned_base as i64
        };

        Ok(Self {
            int,
            base,
            exp: frac_digits.len() as u32,
        })
    }
}

impl Display for FixedNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.exp == 0 {
            return write!(f, "{}", self.int);
        }

        let sign = if self.is_negative() { "-" } else { "" };
        write!(
            f,
            "{sign}{}.{:0width$}",
            self.int.abs(),
            self.base.abs(),
            width = self.exp as usize
        )
    }
}

impl PartialEq for FixedNumber {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FixedNumber {}

impl PartialOrd for FixedNumber {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FixedNumber {
    fn cmp(&self, other: &Self) -> Ordering {
        let (mine, theirs) = self.aligned(other);
        self.int.cmp(&other.int).then(mine.cmp(&theirs))
    }
}

impl AddAssign for FixedNumber {
    fn add_assign(&mut self, rhs: Self) {
        let exp = self.exp.max(rhs.exp);
        let int = self.int + rhs.int;
        let base =
            self.base * pow10(exp - self.exp) + rhs.base * pow10(exp - rhs.exp);
        *self = Self::normalise(int, base, exp);
    }
}

impl SubAssign for FixedNumber {
    fn sub_assign(&mut self, rhs: Self) {
        *self += -rhs;
    }
}

impl MulAssign for FixedNumber {
    fn mul_assign(&mut self, rhs: Self) {
        let exp = self.exp + rhs.exp;
        let int = self.int * rhs.int;
        let base = self.int * rhs.base * pow10(self.exp)
            + rhs.int * self.base * pow10(rhs.exp)
            + self.base * rhs.base;
        *self = Self::normalise(int, base, exp);
    }
}

impl DivAssign for FixedNumber {
    fn div_assign(&mut self, rhs: Self) {
        // Scale the dividend so the integer quotient carries exp_a fractional digits.
        let scale = self.exp + rhs.exp;
        let mine = self.int * pow10(scale) + self.base * pow10(rhs.exp);
        let theirs = rhs.int * pow10(rhs.exp) + rhs.base;

        let quot = mine / theirs;
        let rem = mine % theirs;
        let rounded = if rem.abs() * 2 >= theirs.abs() {
            quot + if (mine < 0) ^ (theirs < 0) { -1 } else { 1 }
        } else {
            quot
        };

        let unit = pow10(self.exp);
        self.int = rounded / unit;
        self.base = rounded % unit;
    }
}

impl Add for FixedNumber {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sub for FixedNumber {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl Mul for FixedNumber {
    type Output = Self;

    fn mul(mut self, rhs: Self) -> Self {
        self *= rhs;
        self
    }
}

impl Div for FixedNumber {
    type Output = Self;

    fn div(mut self, rhs: Self) -> Self {
        self /= rhs;
        self
    }
}

impl Neg for FixedNumber {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            int: -self.int,
            base: -self.base,
            exp: self.exp,
        }
    }
}

impl Serialize for FixedNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FixedNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Visitor;

        impl de::Visitor<'_> for Visitor {
            type Value = FixedNumber;

            fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str("decimal string or number")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                value.parse().map_err(de::Error::custom)
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(FixedNumber::from_f64(value, DEFAULT_ACCURACY))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(FixedNumber::from(value))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(FixedNumber::from(value as i64))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}
