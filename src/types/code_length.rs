//! Codelengths in bits.

use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// A non-negative number of bits.
///
/// Only meaningful relative to another encoding of the same data; it is not
/// the length of an actual bitstream.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CodeLength(f64);

impl CodeLength {
    /// Zero bits.
    pub const ZERO: Self = Self(0.0);

    /// Create a codelength. Negative inputs are clamped to zero.
    pub fn bits(bits: f64) -> Self {
        Self(bits.max(0.0))
    }

    /// The number of bits.
    pub fn as_bits(&self) -> f64 {
        self.0
    }

    /// Signed difference `self - other` in bits.
    pub fn delta(&self, other: CodeLength) -> f64 {
        self.0 - other.0
    }

    /// Whether two codelengths agree within `tolerance` bits.
    pub fn approx_eq(&self, other: CodeLength, tolerance: f64) -> bool {
        (self.0 - other.0).abs() <= tolerance
    }
}

impl Add for CodeLength {
    type Output = CodeLength;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for CodeLength {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Saturating subtraction: a codelength never goes below zero.
impl Sub for CodeLength {
    type Output = CodeLength;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::bits(self.0 - rhs.0)
    }
}

impl Sum for CodeLength {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl std::fmt::Display for CodeLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} bits", self.0)
    }
}
