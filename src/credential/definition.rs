use super::IssuedCredential;
use crate::knox::accumulator::cks::{
    AccumulatorPublicKey, AccumulatorSecretKey, NonRevocationSignature, RevocationPublicKey,
    RevocationSecretKey, Tails, Witness,
};
use crate::knox::{cl, Knox};
use crate::params::CredentialParameters;
use crate::revocation_registry::{AccumulatorState, PublishedRegistry, RevocationRegistry};
use crate::ClResult;
use blsful::inner_types::{G1Projective, Scalar};
use log::debug;
use num_bigint::BigUint;
use rand_core::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Identifies a credential definition
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CredentialDefinitionId {
    /// The definition name
    pub name: String,
    /// The definition version
    pub version: String,
}

impl CredentialDefinitionId {
    /// Create a new id
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl Display for CredentialDefinitionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

/// Everything holders and verifiers may read about a credential definition.
///
/// Never changes once created.
#[derive(Clone, Debug)]
pub struct CredentialDefinitionPublic {
    /// The definition id
    pub id: CredentialDefinitionId,
    /// The sorted attribute names
    pub attribute_names: Vec<String>,
    /// The CL public key {N, S, Z, R}
    pub primary_key: cl::PublicKey,
    /// The non-revocation public key
    pub revocation_key: RevocationPublicKey,
    /// The accumulator verification value z
    pub accumulator_key: AccumulatorPublicKey,
    /// The published tails
    pub tails: Tails,
    /// The sizes used for this definition
    pub params: CredentialParameters,
}

/// The issuer's private key material for one definition
struct CredentialDefinitionSecret {
    primary: cl::SecretKey,
    revocation: RevocationSecretKey,
    accumulator: AccumulatorSecretKey,
}

impl fmt::Debug for CredentialDefinitionSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "CredentialDefinitionSecret {{ .. }}")
    }
}

/// A credential definition as owned by its issuer
#[derive(Debug)]
pub struct CredentialDefinition {
    public: Arc<CredentialDefinitionPublic>,
    secret: CredentialDefinitionSecret,
    registry: RevocationRegistry,
}

impl CredentialDefinition {
    /// Generate fresh keys over `attribute_names`
    pub fn new<S: AsRef<str>>(
        id: CredentialDefinitionId,
        attribute_names: &[S],
        params: CredentialParameters,
        mut rng: impl RngCore + CryptoRng,
    ) -> ClResult<Self> {
        params.validate()?;
        let (primary_key, primary) = cl::Issuer::new_keys(attribute_names, &params, &mut rng)?;
        Self::with_primary_key(id, primary_key, primary, params, rng)
    }

    /// Build the definition on caller supplied Sophie-Germain primes p', q'
    pub fn from_factors<S: AsRef<str>>(
        id: CredentialDefinitionId,
        attribute_names: &[S],
        p_prime: BigUint,
        q_prime: BigUint,
        params: CredentialParameters,
        mut rng: impl RngCore + CryptoRng,
    ) -> ClResult<Self> {
        params.validate()?;
        let primary = cl::SecretKey::new(p_prime, q_prime)?;
        let primary_key = cl::Issuer::public_key(attribute_names, &primary, &mut rng)?;
        Self::with_primary_key(id, primary_key, primary, params, rng)
    }

    fn with_primary_key(
        id: CredentialDefinitionId,
        primary_key: cl::PublicKey,
        primary: cl::SecretKey,
        params: CredentialParameters,
        mut rng: impl RngCore + CryptoRng,
    ) -> ClResult<Self> {
        let (revocation_key, revocation) = RevocationSecretKey::random(&mut rng);
        let accumulator = AccumulatorSecretKey::random(&mut rng);
        let accumulator_key = accumulator.public_key(&revocation_key, params.max_credentials)?;
        let tails = Tails::generate(params.max_credentials, &revocation_key, &accumulator)?;
        debug!(
            "created credential definition {} with capacity {}",
            id, params.max_credentials
        );
        Ok(Self {
            public: Arc::new(CredentialDefinitionPublic {
                id,
                attribute_names: primary_key.attribute_names().cloned().collect(),
                primary_key,
                revocation_key,
                accumulator_key,
                tails,
                params,
            }),
            secret: CredentialDefinitionSecret {
                primary,
                revocation,
                accumulator,
            },
            registry: RevocationRegistry::new(params.max_credentials),
        })
    }

    /// The definition id
    pub fn id(&self) -> &CredentialDefinitionId {
        &self.public.id
    }

    /// The shareable public half
    pub fn public(&self) -> &Arc<CredentialDefinitionPublic> {
        &self.public
    }

    /// The current accumulator state
    pub fn accumulator_state(&self) -> &AccumulatorState {
        self.registry.state()
    }

    /// The revocation registry
    pub fn registry(&self) -> &RevocationRegistry {
        &self.registry
    }

    /// Snapshot the accumulator and delta log for holders
    pub fn publish(&self) -> PublishedRegistry {
        self.registry.publish()
    }

    /// Sign `attributes` for `holder_id` and assign the next accumulator index.
    ///
    /// `u` and `ur` are the holder's commitments. Nothing is recorded unless
    /// every signature and the witness were computed.
    pub fn issue(
        &mut self,
        holder_id: &str,
        attributes: BTreeMap<String, BigUint>,
        u: Option<&BigUint>,
        ur: G1Projective,
        mut rng: impl RngCore + CryptoRng,
    ) -> ClResult<IssuedCredential> {
        let index = self.registry.next_index()?;
        let public = &self.public;
        let signature = match u {
            Some(u) => cl::Issuer::blind_sign(
                u,
                &attributes,
                &public.primary_key,
                &self.secret.primary,
                &public.params,
                &mut rng,
            )?,
            None => cl::Issuer::sign(
                &attributes,
                &public.primary_key,
                &self.secret.primary,
                &public.params,
                &mut rng,
            )?,
        };
        let non_revocation = NonRevocationSignature::new(
            index,
            credential_context(holder_id, index),
            ur,
            &public.revocation_key,
            &self.secret.revocation,
            &public.tails,
            &mut rng,
        )?;
        let state = self.registry.state();
        let witness = Witness::new(
            index,
            state.seq_no + 1,
            &state.active,
            &public.tails,
            &public.revocation_key,
            &self.secret.revocation,
            &self.secret.accumulator,
        )?;
        let assigned = self.registry.assign(&public.tails)?;
        debug_assert_eq!(assigned, index);
        debug!("issued {} index {} to {}", public.id, index, holder_id);
        Ok(IssuedCredential {
            definition: public.id.clone(),
            attributes,
            signature,
            non_revocation,
            witness,
        })
    }

    /// Permanently revoke the credential at `index`
    pub fn revoke(&mut self, index: u32) -> ClResult<()> {
        self.registry.revoke(&self.public.tails, index)?;
        debug!("revoked {} index {}", self.public.id, index);
        Ok(())
    }
}

/// m2, the credential context binding the holder to its index
pub fn credential_context(holder_id: &str, index: u32) -> Scalar {
    let mut input = Vec::with_capacity(holder_id.len() + 4);
    input.extend_from_slice(holder_id.as_bytes());
    input.extend_from_slice(&index.to_be_bytes());
    Knox::hash_to_scalar(b"CL-CREDENTIAL-CONTEXT", &input)
}
