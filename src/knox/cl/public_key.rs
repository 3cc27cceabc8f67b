use crate::{error::Error, ClResult};
use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The issuer's public key for CL signatures.
///
/// `n` is a product of two safe primes, `s` generates the quadratic residues
/// modulo `n` and every base in `r` and `z` is a power of `s`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// The RSA modulus
    pub n: BigUint,
    /// The blinding base
    pub s: BigUint,
    /// The verification target
    pub z: BigUint,
    /// One base per attribute name
    pub r: BTreeMap<String, BigUint>,
}

impl PublicKey {
    /// The attribute names this key can sign
    pub fn attribute_names(&self) -> impl Iterator<Item = &String> {
        self.r.keys()
    }

    /// Compute Π R[attr]^value mod N.
    ///
    /// `attributes` must name exactly the bases of this key.
    pub fn attribute_product(&self, attributes: &BTreeMap<String, BigUint>) -> ClResult<BigUint> {
        if attributes.len() != self.r.len() {
            return Err(Error::InvalidInput(
                "attribute values do not match the declared attributes",
            ));
        }
        let mut rx = BigUint::one();
        for (name, value) in attributes {
            let base = self.r.get(name).ok_or(Error::InvalidInput(
                "attribute values do not match the declared attributes",
            ))?;
            rx = (rx * base.modpow(value, &self.n)) % &self.n;
        }
        Ok(rx)
    }
}
