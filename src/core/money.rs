use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount in integer cents.
///
/// Every intermediate calculation in this crate (subtotals, tax
/// allocation, remainder spreading) happens in integer cents; values
/// only become [`Decimal`] again at display and export boundaries.
/// Converting a `Decimal` to cents rounds half away from zero, so
/// `Cents::from_decimal(c.to_decimal()) == c` holds for all values.
/// Conversion and arithmetic saturate at the `i64` cent bounds
/// instead of overflowing; absurd feed amounts degrade, they never
/// panic.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(i64);

impl Cents {
    pub const ZERO: Cents = Cents(0);

    /// A value already expressed in cents.
    pub const fn new(cents: i64) -> Self {
        Cents(cents)
    }

    /// Convert a decimal currency amount to cents, rounding half away
    /// from zero. Values outside the `i64` cent range saturate.
    pub fn from_decimal(amount: Decimal) -> Self {
        // The scale-up itself can overflow a Decimal near its limits,
        // so it has to saturate before the i64 check gets a say.
        let scaled = amount
            .saturating_mul(Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        match scaled.to_i64() {
            Some(cents) => Cents(cents),
            None if scaled.is_sign_negative() => Cents(i64::MIN),
            None => Cents(i64::MAX),
        }
    }

    /// The exact decimal currency value, always at 2 decimal places.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    pub const fn abs(self) -> Self {
        Cents(self.0.saturating_abs())
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Flat 10% GST on this amount, rounded half away from zero.
    pub const fn flat_gst(self) -> Self {
        let half = if self.0 >= 0 { 5 } else { -5 };
        Cents(self.0.saturating_add(half) / 10)
    }
}

impl Add for Cents {
    type Output = Cents;
    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Cents {
    type Output = Cents;
    fn sub(self, rhs: Cents) -> Cents {
        Cents(self.0.saturating_sub(rhs.0))
    }
}

impl AddAssign for Cents {
    fn add_assign(&mut self, rhs: Cents) {
        *self = *self + rhs;
    }
}

impl SubAssign for Cents {
    fn sub_assign(&mut self, rhs: Cents) {
        *self = *self - rhs;
    }
}

impl Neg for Cents {
    type Output = Cents;
    fn neg(self) -> Cents {
        Cents(self.0.saturating_neg())
    }
}

impl Sum for Cents {
    fn sum<I: Iterator<Item = Cents>>(iter: I) -> Cents {
        iter.fold(Cents::ZERO, Add::add)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

/// Result of spreading a rounding remainder across line items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    /// Per-line adjustment in cents, index-aligned with the input slice.
    pub deltas: Vec<Cents>,
    /// Whatever the step cap left undistributed. Zero in practice; the
    /// cap only bites when the remainder exceeds two cents per line.
    pub residual: Cents,
}

/// Spread `remainder` across `amounts` one cent at a time, largest
/// amount first, cycling until the remainder is gone or the step cap
/// (two single-cent passes over the lines) is exhausted.
///
/// Larger lines absorb rounding adjustment first, and no line moves by
/// more than one cent per pass. The returned deltas are aligned with
/// the input order, not the sorted order.
pub fn distribute_remainder(amounts: &[Cents], remainder: Cents) -> Distribution {
    let mut deltas = vec![Cents::ZERO; amounts.len()];
    let mut left = remainder.raw();

    if left == 0 || amounts.is_empty() {
        return Distribution {
            deltas,
            residual: Cents::new(left),
        };
    }

    // Stable descending sort: equal amounts keep their input order.
    let mut order: Vec<usize> = (0..amounts.len()).collect();
    order.sort_by(|&a, &b| amounts[b].cmp(&amounts[a]));

    let step = if left > 0 { 1 } else { -1 };
    let cap = amounts.len() * 2;
    let mut taken = 0usize;

    while left != 0 && taken < cap {
        let idx = order[taken % order.len()];
        deltas[idx] += Cents::new(step);
        left -= step;
        taken += 1;
    }

    Distribution {
        deltas,
        residual: Cents::new(left),
    }
}
