use crate::{error::Error, ClResult};
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_prime::{nt_funcs::is_prime, RandPrime};
use num_traits::One;
use rand_core::{CryptoRng, RngCore};

/// Draw `bits` random bits and force the most significant one so the
/// result always lies in [2^(bits-1), 2^bits)
pub fn random_bits_msb(bits: u64, mut rng: impl RngCore + CryptoRng) -> BigUint {
    debug_assert!(bits > 0);
    rng.gen_biguint(bits) | (BigUint::one() << (bits - 1))
}

/// Draw a random prime uniformly from [2^start_bits, 2^start_bits + 2^range_bits).
///
/// Gives up with [`Error::InvalidParameters`] once the range looks prime free.
pub fn random_prime_in_range(
    start_bits: u64,
    range_bits: u64,
    mut rng: impl RngCore + CryptoRng,
) -> ClResult<BigUint> {
    let start = BigUint::one() << start_bits;
    let width = BigUint::one() << range_bits;
    // primes near 2^k are ln(2^k) apart, this bound leaves a negligible miss chance
    let attempts = 64 * start_bits.max(64);
    for _ in 0..attempts {
        // start + width is even so forcing the low bit stays in range
        let candidate = (&start + rng.gen_biguint_below(&width)) | BigUint::one();
        if is_prime(&candidate, None).probably() {
            return Ok(candidate);
        }
    }
    Err(Error::InvalidParameters(format!(
        "no prime found in [2^{}, 2^{} + 2^{}) after {} attempts",
        start_bits, start_bits, range_bits, attempts
    )))
}

/// Generate a safe prime p = 2p'+1 with exactly `bits` bits and return p'
pub fn random_sophie_germain_prime(bits: usize, mut rng: impl RngCore + CryptoRng) -> BigUint {
    let safe: BigUint = rng.gen_safe_prime_exact(bits);
    safe >> 1
}

/// Check that `p` is prime and so is 2p+1
pub fn is_sophie_germain_prime(p: &BigUint) -> bool {
    is_prime(p, None).probably() && is_prime(&((p << 1) + 1u32), None).probably()
}

/// A random quadratic residue modulo `n` that is a unit other than 1
pub fn random_qr(n: &BigUint, mut rng: impl RngCore + CryptoRng) -> BigUint {
    loop {
        let r = rng.gen_biguint_below(n);
        if !r.gcd(n).is_one() {
            continue;
        }
        let qr = r.modpow(&BigUint::from(2u32), n);
        if !qr.is_one() {
            return qr;
        }
    }
}

/// An exponent drawn uniformly from [2, p'q' + 1]
pub fn random_exponent(order: &BigUint, mut rng: impl RngCore + CryptoRng) -> BigUint {
    let lower = BigUint::from(2u32);
    let upper = order + &lower;
    rng.gen_biguint_range(&lower, &upper)
}
