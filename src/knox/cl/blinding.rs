use super::{random_bits_msb, PublicKey};
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// The holder's secret v' that the issuer never learns
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindingFactor(pub BigUint);

impl BlindingFactor {
    /// Draw v' with `bits` bits and commit to it as U = S^v' mod N
    pub fn new(
        pk: &PublicKey,
        bits: u64,
        rng: impl RngCore + CryptoRng,
    ) -> (BigUint, Self) {
        let v_prime = random_bits_msb(bits, rng);
        let u = pk.s.modpow(&v_prime, &pk.n);
        (u, Self(v_prime))
    }
}
