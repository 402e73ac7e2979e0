//! Fixed-point money amounts
//!
//! Costs are accumulated in integer minor units (cents) so that totals do
//! not depend on the order items are summed in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of minor units in one major unit
pub const MINOR_UNITS: i64 = 100;

/// A money amount in minor units (cents)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount
    pub const ZERO: Money = Money(0);

    /// Create an amount from minor units
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Cost of `quantity` units at a decimal `unit_cost`, rounded once to
    /// the nearest cent (half away from zero)
    ///
    /// The unit cost is read as the shortest decimal that round-trips to
    /// the same `f64`, so `1.005` is one and five thousandths rather than
    /// the binary value just below it. The product is exact before the
    /// single rounding step. Returns `None` for NaN, infinities and
    /// results outside the `i64` cent range.
    ///
    /// # Examples
    ///
    /// ```
    /// use eventboard_domain::Money;
    ///
    /// assert_eq!(Money::line_total(1, 10.5), Some(Money::from_cents(1050)));
    /// assert_eq!(Money::line_total(1000, 0.005), Some(Money::from_cents(500)));
    /// assert_eq!(Money::line_total(1, 1.005), Some(Money::from_cents(101)));
    /// assert_eq!(Money::line_total(1, f64::NAN), None);
    /// ```
    pub fn line_total(quantity: i64, unit_cost: f64) -> Option<Self> {
        if !unit_cost.is_finite() {
            return None;
        }

        let (digits, scale) = decimal_digits(unit_cost)?;
        let numerator = digits
            .checked_mul(i128::from(quantity.unsigned_abs()))?
            .checked_mul(i128::from(MINOR_UNITS))?;

        // A divisor past i128 is far larger than any numerator, so the
        // quotient rounds to zero
        let cents = match 10i128.checked_pow(scale) {
            Some(divisor) => {
                let (quotient, remainder) = (numerator / divisor, numerator % divisor);
                if remainder >= divisor - remainder {
                    quotient + 1
                } else {
                    quotient
                }
            }
            None => 0,
        };

        let negative = (unit_cost < 0.0) != (quantity < 0);
        let cents = if negative { -cents } else { cents };
        i64::try_from(cents).ok().map(Self)
    }

    /// Amount in minor units
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Amount in major units (for display and JSON output only)
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / MINOR_UNITS as f64
    }

    /// Whether the amount is below zero
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Checked addition
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }
}

/// Decimal digits of `|amount|` and the number of them after the point
fn decimal_digits(amount: f64) -> Option<(i128, u32)> {
    let repr = amount.abs().to_string();
    let (whole, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    let digits = format!("{}{}", whole, fraction).parse().ok()?;
    Some((digits, u32::try_from(fraction.len()).ok()?))
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let unit = MINOR_UNITS as u64;
        write!(f, "{}{}.{:02}", sign, abs / unit, abs % unit)
    }
}
