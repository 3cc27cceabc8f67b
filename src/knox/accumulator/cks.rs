//! The Camenisch-Kohlweiss-Soriente accumulator over BLS12-381 as described in
//! <https://eprint.iacr.org/2008/539.pdf>
//!
//! Credential indices 1..=L are accumulated as `acc = Σ_{j∈V} g'_{L+1-j}` where
//! the tails `g_k = g·γ^k` and `g'_k = g'·γ^k` are published for every
//! `k ∈ 1..=2L` except `L+1`. A holder of index `i` keeps
//! `ω = Σ_{j∈V, j≠i} g'_{L+1-j+i}` and proves membership with
//! `e(g_i, acc) / e(g, ω) = z = e(g, g')^{γ^{L+1}}`.

/// Accumulator value
mod accumulator;
/// Accumulator membership changes
mod delta;
/// Accumulator errors
mod error;
/// Revocation and accumulator keys
mod key;
/// Issuer signature over the credential index
mod signature;
/// Published tails
mod tails;
/// Witnesses
mod witness;

pub use accumulator::*;
pub use delta::*;
pub use error::*;
pub use key::*;
pub use signature::*;
pub use tails::*;
pub use witness::*;

use blsful::inner_types::{Field, Scalar};

/// γ^k
fn gamma_pow(gamma: &Scalar, k: u32) -> Scalar {
    Field::pow_vartime(gamma, [k as u64])
}
