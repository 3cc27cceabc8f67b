use super::{Error, RevocationPublicKey, RevocationSecretKey, TailsAccessor};
use blsful::inner_types::{
    multi_miller_loop, Curve, Field, G1Projective, G2Prepared, Group, Scalar,
};
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The holder's blinding vr' for the non-revocation signature
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct RevocationBlinding(pub(crate) Scalar);

impl core::fmt::Debug for RevocationBlinding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "RevocationBlinding {{ .. }}")
    }
}

impl RevocationBlinding {
    /// Draw vr' and return the commitment Ur = h2·vr' sent to the issuer
    pub fn new(pk: &RevocationPublicKey, rng: impl RngCore + CryptoRng) -> (G1Projective, Self) {
        let vr_prime = Scalar::random(rng);
        (pk.h2 * vr_prime, Self(vr_prime))
    }
}

/// The issuer's half of a non-revocation credential
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonRevocationSignature {
    /// (h0 + h1·m2 + Ur + g_i + h2·vr'')·(x + c)^-1
    pub sigma: G1Projective,
    /// Random exponent c
    pub c: Scalar,
    /// The issuer's share of the blinding vr
    pub vr_prime_prime: Scalar,
    /// The tail at i
    pub g_i: G1Projective,
    /// The credential index
    pub i: u32,
    /// The credential context bound into the signature
    pub m2: Scalar,
}

impl NonRevocationSignature {
    /// Sign index `i` and context `m2` over the holder's commitment `ur`
    pub fn new(
        i: u32,
        m2: Scalar,
        ur: G1Projective,
        pk: &RevocationPublicKey,
        sk: &RevocationSecretKey,
        tails: &impl TailsAccessor,
        mut rng: impl RngCore + CryptoRng,
    ) -> Result<Self, Error> {
        if i == 0 || i > tails.max_credentials() {
            return Err(Error::from_msg(
                Error::TAIL_OUT_OF_RANGE,
                "credential index must be in 1..=L",
            ));
        }
        let g_i = tails.tail(i)?;
        let vr_prime_prime = Scalar::random(&mut rng);
        let c = Scalar::random(&mut rng);
        let exp = Option::<Scalar>::from((sk.x + c).invert())
            .ok_or_else(|| Error::from_msg(Error::NOT_INVERTIBLE, "x + c is not invertible"))?;
        let sigma = (pk.h0 + pk.h1 * m2 + ur + g_i + pk.h2 * vr_prime_prime) * exp;
        Ok(Self {
            sigma,
            c,
            vr_prime_prime,
            g_i,
            i,
            m2,
        })
    }

    /// Combine with the holder's blinding, vr = vr' + vr''
    pub fn to_unblinded(&self, blinding: &RevocationBlinding) -> NonRevocationCredential {
        NonRevocationCredential {
            sigma: self.sigma,
            c: self.c,
            vr: blinding.0 + self.vr_prime_prime,
            g_i: self.g_i,
            i: self.i,
            m2: self.m2,
        }
    }
}

/// The holder's completed non-revocation credential
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonRevocationCredential {
    /// Signature value
    pub sigma: G1Projective,
    /// Random exponent c
    pub c: Scalar,
    /// vr' + vr''
    pub vr: Scalar,
    /// The tail at i
    pub g_i: G1Projective,
    /// The credential index
    pub i: u32,
    /// The credential context
    pub m2: Scalar,
}

impl NonRevocationCredential {
    /// e(σ, y + h^·c) == e(h0 + h1·m2 + h2·vr + g_i, h^)
    pub fn verify(&self, pk: &RevocationPublicKey) -> bool {
        let message = pk.h0 + pk.h1 * self.m2 + pk.h2 * self.vr + self.g_i;
        multi_miller_loop(&[
            (
                &self.sigma.to_affine(),
                &G2Prepared::from((pk.y + pk.h_cap * self.c).to_affine()),
            ),
            (
                &(-message).to_affine(),
                &G2Prepared::from(pk.h_cap.to_affine()),
            ),
        ])
        .final_exponentiation()
        .is_identity()
        .unwrap_u8()
            == 1
    }
}
