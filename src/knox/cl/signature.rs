use super::PublicKey;
use crate::ClResult;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What the issuer returns: (A, e, v'')
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindSignature {
    /// The signature group element
    pub a: BigUint,
    /// The prime signing exponent
    pub e: BigUint,
    /// The issuer's blinding contribution
    pub v_prime_prime: BigUint,
}

/// A usable CL signature (A, e, v) with v = v' + v''
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// The signature group element
    pub a: BigUint,
    /// The prime signing exponent
    pub e: BigUint,
    /// The combined blinding value
    pub v: BigUint,
}

impl BlindSignature {
    /// Fold the holder's v' into the signature
    pub fn to_unblinded(&self, v_prime: &BigUint) -> Signature {
        Signature {
            a: self.a.clone(),
            e: self.e.clone(),
            v: v_prime + &self.v_prime_prime,
        }
    }
}

impl Signature {
    /// Check Z == (Π R[attr]^value) · S^v · A^e (mod N)
    pub fn verify(&self, pk: &PublicKey, attributes: &BTreeMap<String, BigUint>) -> ClResult<bool> {
        let rx = pk.attribute_product(attributes)?;
        let sv = pk.s.modpow(&self.v, &pk.n);
        let ae = self.a.modpow(&self.e, &pk.n);
        let rhs = (rx * sv % &pk.n) * ae % &pk.n;
        Ok(rhs == pk.z)
    }
}
