//! Universal codes for unbounded natural numbers.
//!
//! A universal code assigns every `n >= 0` a prefix-free codeword without a
//! predetermined maximum. Only the codeword length matters here.

use std::fmt::Debug;

/// Normalising constant of Rissanen's universal prior for the integers.
pub const RISSANEN_C0: f64 = 2.865064;

/// Bit cost of encoding an unbounded natural number.
///
/// Implementations must be monotone non-decreasing in `n`.
pub trait UniversalCode: Debug + Send + Sync {
    /// Codeword length for `n`, in bits.
    fn cost(&self, n: u64) -> f64;
}

/// Rissanen's log* code: `log2(c0) + log2(x) + log2(log2(x)) + ...` over the
/// positive terms, with `x = n + 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RissanenCode;

impl UniversalCode for RissanenCode {
    fn cost(&self, n: u64) -> f64 {
        let mut bits = RISSANEN_C0.log2();
        let mut x = (n as f64 + 1.0).log2();
        while x > 0.0 {
            bits += x;
            x = x.log2();
        }
        bits
    }
}

/// Elias gamma code over `n + 1`: `2 * floor(log2(n + 1)) + 1` bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EliasGammaCode;

impl UniversalCode for EliasGammaCode {
    fn cost(&self, n: u64) -> f64 {
        let x = n.saturating_add(1);
        let floor_log = 63 - x.leading_zeros();
        f64::from(2 * floor_log + 1)
    }
}

/// `log2` of the binomial coefficient `C(n, k)`. `k > n` is treated as `k = n`.
pub fn log2_binomial(n: u64, k: u64) -> f64 {
    let k = k.min(n);
    let k = k.min(n - k);
    (0..k)
        .map(|i| ((n - i) as f64).log2() - ((i + 1) as f64).log2())
        .sum()
}

/// Cost of a subset of `k` items out of `n`: the size `k` (uniform over
/// `0..=n`) and then which subset of that size.
pub fn subset_cost(n: u64, k: u64) -> f64 {
    ((n + 1) as f64).log2() + log2_binomial(n, k)
}
