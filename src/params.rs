use crate::{error::Error, ClResult};
use serde::{Deserialize, Serialize};

/// Bit length of each safe prime p = 2p'+1 and q = 2q'+1
pub const LARGE_PRIME: usize = 1024;
/// Bit length of the holder's blinding value v'
pub const LARGE_VPRIME: u64 = 2128;
/// Bit length of the issuer's blinding value v''
pub const LARGE_VPRIME_PRIME: u64 = 2724;
/// The signing exponent e is drawn from [2^596, 2^596 + 2^119)
pub const LARGE_E_START: u64 = 596;
/// See [`LARGE_E_START`]
pub const LARGE_E_END_RANGE: u64 = 119;
/// Default accumulator capacity
pub const DEFAULT_MAX_CREDENTIALS: u32 = 100;
/// Narrowest allowed range for e, 2^16 candidates hold plenty of primes at any start
pub const MIN_E_RANGE_BITS: u64 = 16;
/// Largest capacity L whose tail positions 1..=2L fit in a u32
pub const MAX_CREDENTIALS_LIMIT: u32 = u32::MAX / 2 - 1;

/// System wide sizes used when generating keys and signing credentials.
///
/// Every issuer and holder of a credential definition must agree on these,
/// the range of `e` in particular bounds the range checks performed by the
/// later proof of knowledge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialParameters {
    /// Bit length of p and q
    pub prime_bits: usize,
    /// Bit length of v'
    pub v_prime_bits: u64,
    /// Bit length of v''
    pub v_prime_prime_bits: u64,
    /// log2 of the smallest signing exponent
    pub e_start_bits: u64,
    /// log2 of the width of the signing exponent range
    pub e_range_bits: u64,
    /// The accumulator capacity L
    pub max_credentials: u32,
}

impl Default for CredentialParameters {
    fn default() -> Self {
        Self {
            prime_bits: LARGE_PRIME,
            v_prime_bits: LARGE_VPRIME,
            v_prime_prime_bits: LARGE_VPRIME_PRIME,
            e_start_bits: LARGE_E_START,
            e_range_bits: LARGE_E_END_RANGE,
            max_credentials: DEFAULT_MAX_CREDENTIALS,
        }
    }
}

impl CredentialParameters {
    /// Parse parameters from a JSON document, absent fields keep their defaults
    pub fn from_json(data: &str) -> ClResult<Self> {
        let params: Self = serde_json::from_str(data)?;
        params.validate()?;
        Ok(params)
    }

    /// Check the sizes are usable
    pub fn validate(&self) -> ClResult<()> {
        if self.prime_bits < 16 {
            return Err(Error::InvalidParameters(format!(
                "prime_bits must be at least 16, got {}",
                self.prime_bits
            )));
        }
        if self.v_prime_bits == 0 || self.v_prime_prime_bits == 0 {
            return Err(Error::InvalidParameters(
                "blinding sizes must be non-zero".to_string(),
            ));
        }
        if self.e_range_bits < MIN_E_RANGE_BITS {
            return Err(Error::InvalidParameters(format!(
                "e_range_bits must be at least {}, got {}",
                MIN_E_RANGE_BITS, self.e_range_bits
            )));
        }
        if self.e_range_bits >= self.e_start_bits {
            return Err(Error::InvalidParameters(format!(
                "e range 2^{} must be narrower than its start 2^{}",
                self.e_range_bits, self.e_start_bits
            )));
        }
        if self.max_credentials == 0 || self.max_credentials > MAX_CREDENTIALS_LIMIT {
            return Err(Error::InvalidParameters(format!(
                "max_credentials must be in 1..={}, got {}",
                MAX_CREDENTIALS_LIMIT, self.max_credentials
            )));
        }
        Ok(())
    }
}
