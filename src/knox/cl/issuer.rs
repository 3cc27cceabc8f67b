use super::{
    random_bits_msb, random_exponent, random_prime_in_range, random_qr,
    random_sophie_germain_prime, BlindSignature, PublicKey, SecretKey,
};
use crate::{error::Error, params::CredentialParameters, ClResult};
use log::trace;
use num_bigint::BigUint;
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};
use std::collections::BTreeMap;

/// Key generation and signing for CL signatures.
///
/// Signing runs in two modes. [`Issuer::blind_sign`] folds in the holder's
/// commitment U = S^v' so the final v is unknown to the issuer and the
/// credential cannot be linked back to issuance. [`Issuer::sign`] has no
/// holder contribution: the issuer knows the complete signature, so it must
/// only be used where that linkability is acceptable.
pub struct Issuer;

impl Issuer {
    /// Generate fresh safe primes and a key over `attribute_names`
    pub fn new_keys<S: AsRef<str>>(
        attribute_names: &[S],
        params: &CredentialParameters,
        mut rng: impl RngCore + CryptoRng,
    ) -> ClResult<(PublicKey, SecretKey)> {
        if attribute_names.is_empty() {
            return Err(Error::InvalidInput("list of attributes is empty"));
        }
        let p_prime = random_sophie_germain_prime(params.prime_bits, &mut rng);
        let mut q_prime = random_sophie_germain_prime(params.prime_bits, &mut rng);
        while q_prime == p_prime {
            q_prime = random_sophie_germain_prime(params.prime_bits, &mut rng);
        }
        let sk = SecretKey::new(p_prime, q_prime)?;
        let pk = Self::public_key(attribute_names, &sk, rng)?;
        Ok((pk, sk))
    }

    /// Derive a public key over `attribute_names` from existing factors
    pub fn public_key<S: AsRef<str>>(
        attribute_names: &[S],
        sk: &SecretKey,
        mut rng: impl RngCore + CryptoRng,
    ) -> ClResult<PublicKey> {
        if attribute_names.is_empty() {
            return Err(Error::InvalidInput("list of attributes is empty"));
        }
        let n = sk.modulus();
        let order = sk.subgroup_order();
        let s = random_qr(&n, &mut rng);
        let z = s.modpow(&random_exponent(&order, &mut rng), &n);
        let mut r = BTreeMap::new();
        for name in attribute_names {
            let base = s.modpow(&random_exponent(&order, &mut rng), &n);
            if r.insert(name.as_ref().to_string(), base).is_some() {
                return Err(Error::InvalidInput("duplicate attribute name"));
            }
        }
        Ok(PublicKey { n, s, z, r })
    }

    /// Sign `attributes` folding in the holder's commitment `u`
    pub fn blind_sign(
        u: &BigUint,
        attributes: &BTreeMap<String, BigUint>,
        pk: &PublicKey,
        sk: &SecretKey,
        params: &CredentialParameters,
        rng: impl RngCore + CryptoRng,
    ) -> ClResult<BlindSignature> {
        if u.is_zero() {
            return Err(Error::InvalidInput(
                "u must be provided to issue a credential",
            ));
        }
        Self::generate(Some(u), attributes, pk, sk, params, rng)
    }

    /// Sign `attributes` without any holder contribution to v
    pub fn sign(
        attributes: &BTreeMap<String, BigUint>,
        pk: &PublicKey,
        sk: &SecretKey,
        params: &CredentialParameters,
        rng: impl RngCore + CryptoRng,
    ) -> ClResult<BlindSignature> {
        Self::generate(None, attributes, pk, sk, params, rng)
    }

    fn generate(
        u: Option<&BigUint>,
        attributes: &BTreeMap<String, BigUint>,
        pk: &PublicKey,
        sk: &SecretKey,
        params: &CredentialParameters,
        mut rng: impl RngCore + CryptoRng,
    ) -> ClResult<BlindSignature> {
        trace!("Issuer::generate: >>> attributes: {:?}", attributes.keys());
        let v_prime_prime = random_bits_msb(params.v_prime_prime_bits, &mut rng);
        let e = random_prime_in_range(params.e_start_bits, params.e_range_bits, &mut rng)?;
        let a = Self::sign_with(pk, sk, attributes, &v_prime_prime, u, &e)?;
        trace!("Issuer::generate: <<<");
        Ok(BlindSignature {
            a,
            e,
            v_prime_prime,
        })
    }

    /// A = (Z / (Rx · U · S^v''))^(e^-1 mod p'q') mod N
    fn sign_with(
        pk: &PublicKey,
        sk: &SecretKey,
        attributes: &BTreeMap<String, BigUint>,
        v_prime_prime: &BigUint,
        u: Option<&BigUint>,
        e: &BigUint,
    ) -> ClResult<BigUint> {
        let n = &pk.n;
        let mut rx = pk.attribute_product(attributes)?;
        if let Some(u) = u.filter(|u| !u.is_zero()) {
            rx = rx * (u % n) % n;
        }
        let denominator = rx * pk.s.modpow(v_prime_prime, n) % n;
        let denominator = denominator
            .modinv(n)
            .ok_or(Error::InvalidSigningOperation("Rx · S^v'' is not invertible mod N"))?;
        let q = &pk.z * denominator % n;

        let order = sk.subgroup_order();
        let e_inverse = (e % &order)
            .modinv(&order)
            .ok_or(Error::InvalidSigningOperation("e is not invertible mod p'q'"))?;
        Ok(q.modpow(&e_inverse, n))
    }
}
