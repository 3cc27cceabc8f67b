mod definition;
mod request;

pub use definition::*;
pub use request::*;

use crate::knox::accumulator::cks::{NonRevocationCredential, Witness};
use crate::knox::cl::Signature;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A credential as held by its holder after issuance
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// The definition this credential was issued under
    pub definition: CredentialDefinitionId,
    /// The encoded attribute values that were signed
    pub attributes: BTreeMap<String, BigUint>,
    /// The primary CL signature (A, e, v)
    pub signature: Signature,
    /// The signature over the accumulator index
    pub non_revocation: NonRevocationCredential,
    /// The membership witness, kept in sync by the holder
    pub witness: Witness,
}

impl Credential {
    /// The accumulator index of this credential
    pub fn index(&self) -> u32 {
        self.witness.index
    }
}
