//! Minimal-change permutation enumeration.
//!
//! Steinhaus–Johnson–Trotter with Even's speedup: every permutation after the
//! first differs from its predecessor by one swap of two neighbouring
//! positions. The sequence is lazy and finite; there is no rewind, so start a
//! new [`Permutations`] to enumerate again.

/// Generator over all `n!` permutations of `0..n`.
///
/// The first permutation is the identity. For `n >= 2` the last is
/// `[1, 0, 2, 3, ..., n-1]`. `n == 0` yields the single empty permutation.
#[derive(Debug, Clone)]
pub struct Permutations {
    perm: Vec<usize>,
    /// Direction of each element: -1 (left), +1 (right), 0 (immobile).
    /// Stored alongside `perm` and swapped with it.
    dirs: Vec<i8>,
    started: bool,
    done: bool,
}

impl Permutations {
    /// Create a generator over permutations of `0..n`.
    pub fn new(n: usize) -> Self {
        let perm: Vec<usize> = (0..n).collect();
        let mut dirs = vec![-1i8; n];
        if let Some(first) = dirs.first_mut() {
            *first = 0;
        }

        Self {
            perm,
            dirs,
            started: false,
            done: false,
        }
    }

    /// Number of items being permuted.
    pub fn len(&self) -> usize {
        self.perm.len()
    }

    /// Whether the generator permutes zero items.
    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    /// Advance to the next permutation and borrow it, without allocating.
    ///
    /// Returns `None` once every permutation has been produced.
    pub fn advance(&mut self) -> Option<&[usize]> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.perm);
        }

        let n = self.perm.len();

        // Largest element that can still move.
        let mut mobile: Option<usize> = None;
        for j in 0..n {
            if self.dirs[j] != 0 && mobile.map_or(true, |m| self.perm[j] > self.perm[m]) {
                mobile = Some(j);
            }
        }

        let Some(i) = mobile else {
            self.done = true;
            return None;
        };

        let element = self.perm[i];
        let k = step(i, self.dirs[i]);
        self.perm.swap(i, k);
        self.dirs.swap(i, k);

        // Stop at either end, or in front of a larger element.
        if k == 0 || k == n - 1 || self.perm[step(k, self.dirs[k])] > element {
            self.dirs[k] = 0;
        }

        for j in 0..n {
            if self.perm[j] > element {
                self.dirs[j] = if j < k { 1 } else { -1 };
            }
        }

        Some(&self.perm)
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().map(<[usize]>::to_vec)
    }
}

fn step(position: usize, dir: i8) -> usize {
    if dir < 0 {
        position - 1
    } else {
        position + 1
    }
}

/// `n!`, or `None` if it does not fit in a `u64`.
pub fn factorial(n: usize) -> Option<u64> {
    (1..=n as u64).try_fold(1u64, |acc, k| acc.checked_mul(k))
}
