use super::{gamma_pow, Error};
use blsful::inner_types::{pairing, Curve, Field, G1Projective, G2Projective, Group, Gt, Scalar};
use rand_chacha::ChaChaRng;
use rand_core::{CryptoRng, RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The public half of the non-revocation key
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevocationPublicKey {
    /// Base of the G1 tails
    pub g: G1Projective,
    /// Base of the G2 tails
    pub g_dash: G2Projective,
    /// Reserved for the non-revocation proof commitments
    pub h: G1Projective,
    /// Signature constant term
    pub h0: G1Projective,
    /// Base of the credential context m2
    pub h1: G1Projective,
    /// Base of the blinding value vr
    pub h2: G1Projective,
    /// Reserved for the non-revocation proof commitments
    pub htilde: G1Projective,
    /// Verification base in G2
    pub h_cap: G2Projective,
    /// Base of the witness value u_i
    pub u: G2Projective,
    /// g·sk
    pub pk: G1Projective,
    /// h^·x
    pub y: G2Projective,
}

/// The non-revocation signing key (x, sk)
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RevocationSecretKey {
    pub(crate) x: Scalar,
    pub(crate) sk: Scalar,
}

impl core::fmt::Debug for RevocationSecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "RevocationSecretKey {{ .. }}")
    }
}

impl RevocationSecretKey {
    const SEED_SIZE: usize = 32;

    /// Generate a key pair from a CS-PRNG
    pub fn random(mut rng: impl RngCore + CryptoRng) -> (RevocationPublicKey, Self) {
        let g = G1Projective::random(&mut rng);
        let g_dash = G2Projective::random(&mut rng);
        let h = G1Projective::random(&mut rng);
        let h0 = G1Projective::random(&mut rng);
        let h1 = G1Projective::random(&mut rng);
        let h2 = G1Projective::random(&mut rng);
        let htilde = G1Projective::random(&mut rng);
        let h_cap = G2Projective::random(&mut rng);
        let u = G2Projective::random(&mut rng);
        let x = Scalar::random(&mut rng);
        let sk = Scalar::random(&mut rng);
        let public = RevocationPublicKey {
            g,
            g_dash,
            h,
            h0,
            h1,
            h2,
            htilde,
            h_cap,
            u,
            pk: g * sk,
            y: h_cap * x,
        };
        (public, Self { x, sk })
    }

    /// Derive a key pair deterministically from seed data
    pub fn hash<B: AsRef<[u8]>>(data: B) -> (RevocationPublicKey, Self) {
        const SALT: &[u8] = b"CKS-REVOCATION-KEYGEN-SALT-";
        let mut reader = sha3::Shake256::default()
            .chain(SALT)
            .chain(data.as_ref())
            .finalize_xof();
        let mut okm = [0u8; Self::SEED_SIZE];
        reader.read(&mut okm);
        Self::random(ChaChaRng::from_seed(okm))
    }
}

/// The accumulator trapdoor γ
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct AccumulatorSecretKey(pub(crate) Scalar);

impl core::fmt::Debug for AccumulatorSecretKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "AccumulatorSecretKey {{ .. }}")
    }
}

impl AccumulatorSecretKey {
    /// Draw a fresh trapdoor
    pub fn random(rng: impl RngCore + CryptoRng) -> Self {
        Self(Scalar::random(rng))
    }

    /// z = e(g, g')^{γ^{L+1}}.
    ///
    /// The tail at L+1 is never published, only its pairing with g.
    pub fn public_key(
        &self,
        pk: &RevocationPublicKey,
        max_credentials: u32,
    ) -> Result<AccumulatorPublicKey, Error> {
        let position = max_credentials.checked_add(1).ok_or_else(|| {
            Error::from_msg(Error::INVALID_CAPACITY, "L + 1 does not fit in a u32")
        })?;
        let hidden = pk.g_dash * gamma_pow(&self.0, position);
        Ok(AccumulatorPublicKey(pairing(
            &pk.g.to_affine(),
            &hidden.to_affine(),
        )))
    }
}

/// The accumulator verification value z
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AccumulatorPublicKey(pub Gt);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_keys_are_deterministic() {
        let (pk1, _) = RevocationSecretKey::hash(b"issuer-seed");
        let (pk2, _) = RevocationSecretKey::hash(b"issuer-seed");
        let (pk3, _) = RevocationSecretKey::hash(b"other-seed");
        assert_eq!(pk1, pk2);
        assert_ne!(pk1, pk3);
    }

    #[test]
    fn public_values_match_secrets() {
        let (pk, sk) = RevocationSecretKey::random(rand::thread_rng());
        assert_eq!(pk.pk, pk.g * sk.sk);
        assert_eq!(pk.y, pk.h_cap * sk.x);
    }

    #[test]
    fn debug_is_redacted() {
        let gamma = AccumulatorSecretKey(Scalar::from(7u64));
        assert_eq!(format!("{:?}", gamma), "AccumulatorSecretKey { .. }");
    }
}
