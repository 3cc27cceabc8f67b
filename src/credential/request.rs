use super::CredentialDefinitionId;
use crate::knox::accumulator::cks::{NonRevocationSignature, Witness};
use crate::knox::cl::BlindSignature;
use blsful::inner_types::G1Projective;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a holder sends to request a credential
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRequest {
    /// The holder whose attributes are signed
    pub holder_id: String,
    /// U = S^v' mod N
    pub u: BigUint,
    /// Ur = h2·vr'
    pub ur: G1Projective,
}

/// What the issuer returns for a [`CredentialRequest`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedCredential {
    /// The definition the credential was issued under
    pub definition: CredentialDefinitionId,
    /// The encoded attribute values that were signed
    pub attributes: BTreeMap<String, BigUint>,
    /// (A, e, v'')
    pub signature: BlindSignature,
    /// The issuer's share of the non-revocation credential
    pub non_revocation: NonRevocationSignature,
    /// The initial membership witness
    pub witness: Witness,
}

impl IssuedCredential {
    /// The assigned accumulator index
    pub fn index(&self) -> u32 {
        self.witness.index
    }
}
