//! Exact proportion arithmetic
//!
//! Mixing ratios are stored as integer parts-per-billion instead of floats
//! so that composition mappings keep their sum-to-one invariant exactly and
//! round-trip through serialization without drift. Physical quantities
//! (mass, temperature, pressure, density) stay `f64`; only proportions use
//! fixed-point.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub};

/// Fixed-point scale: one billion parts per whole.
pub const PROPORTION_SCALE: u64 = 1_000_000_000;

/// A mixing proportion in `[0, 1]`, stored as parts-per-billion.
///
/// Addition and subtraction saturate at the `[0, 1]` bounds; multiplication
/// runs through `u128` intermediates so nothing overflows. Values outside
/// `[0, 1]` handed to [`Proportion::from_f64`] clamp, which is what the
/// combine/replace short-circuit rules expect (`>= 1` means full
/// replacement, `<= 0` means no-op).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Proportion(u64);

impl Proportion {
    pub const ZERO: Proportion = Proportion(0);
    pub const HALF: Proportion = Proportion(PROPORTION_SCALE / 2);
    pub const ONE: Proportion = Proportion(PROPORTION_SCALE);

    /// Create from raw parts-per-billion, clamped to one.
    pub fn from_parts(parts: u64) -> Self {
        Self(parts.min(PROPORTION_SCALE))
    }

    /// Exact whole percentage, clamped to one hundred.
    pub const fn from_percent(percent: u64) -> Self {
        let percent = if percent > 100 { 100 } else { percent };
        Self(percent * (PROPORTION_SCALE / 100))
    }

    /// Create from a float, clamped to `[0, 1]`. NaN maps to zero.
    pub fn from_f64(value: f64) -> Self {
        if !(value > 0.0) {
            return Self::ZERO;
        }
        if value >= 1.0 {
            return Self::ONE;
        }
        Self((value * PROPORTION_SCALE as f64).round() as u64)
    }

    /// Exact `numerator / denominator`, clamped to one.
    pub fn from_ratio(numerator: u64, denominator: u64) -> Self {
        if denominator == 0 {
            return Self::ZERO;
        }
        let parts = numerator as u128 * PROPORTION_SCALE as u128 / denominator as u128;
        Self(parts.min(PROPORTION_SCALE as u128) as u64)
    }

    /// Raw parts-per-billion.
    pub fn parts(self) -> u64 {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / PROPORTION_SCALE as f64
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_one(self) -> bool {
        self.0 == PROPORTION_SCALE
    }

    /// `1 - self`.
    pub fn complement(self) -> Self {
        Self(PROPORTION_SCALE - self.0)
    }

    /// Scale a physical quantity by this proportion.
    pub fn scale(self, value: f64) -> f64 {
        value * self.to_f64()
    }
}

impl Add for Proportion {
    type Output = Proportion;

    fn add(self, rhs: Proportion) -> Proportion {
        Self((self.0 + rhs.0).min(PROPORTION_SCALE))
    }
}

impl AddAssign for Proportion {
    fn add_assign(&mut self, rhs: Proportion) {
        *self = *self + rhs;
    }
}

impl Sub for Proportion {
    type Output = Proportion;

    fn sub(self, rhs: Proportion) -> Proportion {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Mul for Proportion {
    type Output = Proportion;

    fn mul(self, rhs: Proportion) -> Proportion {
        Self((self.0 as u128 * rhs.0 as u128 / PROPORTION_SCALE as u128) as u64)
    }
}

impl Sum for Proportion {
    fn sum<I: Iterator<Item = Proportion>>(iter: I) -> Proportion {
        iter.fold(Proportion::ZERO, |acc, p| acc + p)
    }
}

impl fmt::Display for Proportion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}%", self.to_f64() * 100.0)
    }
}

/// Rescale proportions in place so they sum to exactly [`Proportion::ONE`].
///
/// The integer division remainder is handed to the largest entry, so the
/// repaired sum is exact rather than merely within tolerance. Returns
/// `false` when the input sums to zero (nothing left to normalize).
pub fn normalize(parts: &mut [Proportion]) -> bool {
    let total: u128 = parts.iter().map(|p| p.0 as u128).sum();
    if total == 0 {
        return false;
    }
    let mut assigned: u64 = 0;
    for p in parts.iter_mut() {
        p.0 = (p.0 as u128 * PROPORTION_SCALE as u128 / total) as u64;
        assigned += p.0;
    }
    // Floor division can only undershoot, never overshoot.
    let remainder = PROPORTION_SCALE - assigned;
    if remainder > 0
        && let Some(largest) = parts.iter_mut().max_by_key(|p| p.0)
    {
        largest.0 += remainder;
    }
    true
}
