use super::{gamma_pow, AccumulatorSecretKey, Error, RevocationPublicKey};
use blsful::inner_types::{G1Projective, G2Projective};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read access to published tails.
///
/// Tails may live in external storage, callers only need indexed reads.
pub trait TailsAccessor {
    /// The accumulator capacity L
    fn max_credentials(&self) -> u32;

    /// g_k = g·γ^k
    fn tail(&self, k: u32) -> Result<G1Projective, Error>;

    /// g'_k = g'·γ^k
    fn tail_dash(&self, k: u32) -> Result<G2Projective, Error>;

    /// The G2 element index `i` contributes to the accumulator, g'_{L+1-i}
    fn accumulator_tail(&self, i: u32) -> Result<G2Projective, Error> {
        let l = self.max_credentials();
        if i == 0 || i > l {
            return Err(Error::from_msg(
                Error::TAIL_OUT_OF_RANGE,
                "credential index must be in 1..=L",
            ));
        }
        // i >= 1 so L - i + 1 <= L
        self.tail_dash(l - i + 1)
    }

    /// The G2 element index `j` contributes to the witness of `i`, g'_{L+1-j+i}
    fn witness_tail(&self, i: u32, j: u32) -> Result<G2Projective, Error> {
        let l = self.max_credentials();
        if i == 0 || i > l || j == 0 || j > l || i == j {
            return Err(Error::from_msg(
                Error::TAIL_OUT_OF_RANGE,
                "witness tail needs distinct indices in 1..=L",
            ));
        }
        let k = (l - j + 1).checked_add(i).ok_or_else(|| {
            Error::from_msg(Error::TAIL_OUT_OF_RANGE, "witness tail position overflows")
        })?;
        self.tail_dash(k)
    }
}

/// The published tails for an accumulator of capacity L, held in memory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tails {
    max_credentials: u32,
    g: BTreeMap<u32, G1Projective>,
    g_dash: BTreeMap<u32, G2Projective>,
}

impl Tails {
    /// Derive g_k and g'_k for k in 1..=2L, skipping L+1
    pub fn generate(
        max_credentials: u32,
        pk: &RevocationPublicKey,
        gamma: &AccumulatorSecretKey,
    ) -> Result<Self, Error> {
        let last = max_credentials
            .checked_mul(2)
            .ok_or_else(|| Error::from_msg(Error::INVALID_CAPACITY, "2L does not fit in a u32"))?;
        let hidden = max_credentials + 1;
        let mut g = BTreeMap::new();
        let mut g_dash = BTreeMap::new();
        for k in (1..=last).filter(|k| *k != hidden) {
            let pow = gamma_pow(&gamma.0, k);
            g.insert(k, pk.g * pow);
            g_dash.insert(k, pk.g_dash * pow);
        }
        Ok(Self {
            max_credentials,
            g,
            g_dash,
        })
    }

    /// The number of published tail pairs
    pub fn len(&self) -> usize {
        self.g.len()
    }

    /// True when no tails were generated
    pub fn is_empty(&self) -> bool {
        self.g.is_empty()
    }
}

impl TailsAccessor for Tails {
    fn max_credentials(&self) -> u32 {
        self.max_credentials
    }

    fn tail(&self, k: u32) -> Result<G1Projective, Error> {
        self.g
            .get(&k)
            .copied()
            .ok_or_else(|| Error::from_msg(Error::TAIL_OUT_OF_RANGE, &format!("no tail at {}", k)))
    }

    fn tail_dash(&self, k: u32) -> Result<G2Projective, Error> {
        self.g_dash
            .get(&k)
            .copied()
            .ok_or_else(|| Error::from_msg(Error::TAIL_OUT_OF_RANGE, &format!("no tail at {}", k)))
    }
}
