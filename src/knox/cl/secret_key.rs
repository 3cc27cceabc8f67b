use super::is_sophie_germain_prime;
use crate::{error::Error, ClResult};
use core::fmt::{self, Debug, Formatter};
use num_bigint::BigUint;
use num_traits::Zero;

/// The issuer's private factorization p', q' where N = (2p'+1)(2q'+1).
///
/// This is only ever read while signing and never serialized, cloned or
/// printed. Both factors are overwritten when the key is dropped.
pub struct SecretKey {
    p_prime: BigUint,
    q_prime: BigUint,
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey {{ .. }}")
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        wipe(&mut self.p_prime);
        wipe(&mut self.q_prime);
    }
}

// BigUint has no Zeroize impl, overwrite its digits in place before clearing
fn wipe(n: &mut BigUint) {
    let words = ((n.bits() + 31) / 32) as usize;
    n.assign_from_slice(&vec![0u32; words]);
    n.set_zero();
    core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
}

impl SecretKey {
    /// Wrap already generated Sophie-Germain primes
    pub fn new(p_prime: BigUint, q_prime: BigUint) -> ClResult<Self> {
        if p_prime == q_prime {
            return Err(Error::InvalidInput("p' and q' must differ"));
        }
        if !is_sophie_germain_prime(&p_prime) || !is_sophie_germain_prime(&q_prime) {
            return Err(Error::InvalidInput(
                "p' and q' must be primes with 2p'+1 and 2q'+1 prime",
            ));
        }
        Ok(Self { p_prime, q_prime })
    }

    /// N = (2p'+1)(2q'+1)
    pub fn modulus(&self) -> BigUint {
        ((&self.p_prime << 1) + 1u32) * ((&self.q_prime << 1) + 1u32)
    }

    /// The order p'q' of the quadratic residues modulo N
    pub(crate) fn subgroup_order(&self) -> BigUint {
        &self.p_prime * &self.q_prime
    }
}
