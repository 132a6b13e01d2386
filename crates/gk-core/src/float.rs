//! Float helpers for lawful equality and hashing of geometric values.
//!
//! `-0.0` and `+0.0` must compare and hash identically, so every float is
//! passed through [`canonical_bits`] before it reaches `Eq` or `Hash`.

use std::hash::Hasher;

/// Replace `-0.0` by `+0.0`, leaving every other value untouched.
#[inline]
pub fn normalize_zero(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// Bit pattern of `v` after zero normalization.
#[inline]
pub fn canonical_bits(v: f64) -> u64 {
    normalize_zero(v).to_bits()
}

/// Compare two slices of floats by canonical bit pattern.
pub fn bits_eq(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| canonical_bits(*x) == canonical_bits(*y))
}

/// Feed the canonical bit patterns of `values` into `state`.
pub fn hash_f64s<H: Hasher>(values: &[f64], state: &mut H) {
    for v in values {
        state.write_u64(canonical_bits(*v));
    }
}
