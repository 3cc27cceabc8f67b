//! Issuance and revocation core for CL anonymous credentials.
//!
//! An [`issuer::Issuer`] owns credential definitions, blind signs attribute
//! sets with CL signatures over an RSA modulus and tracks every issued
//! credential in a pairing based accumulator. A [`prover::Prover`] keeps
//! its non-revocation witness in sync with the issuer's published delta log
//! and checks it locally before presenting.
#![warn(missing_docs)]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Issuer attribute sources
pub mod attributes;
/// Credential definitions and issued credentials
pub mod credential;
/// Errors produced by this crate
pub mod error;
/// Credential issuance and revocation
pub mod issuer;
/// Raw cryptographic primitives
pub mod knox;
/// System wide sizes
pub mod params;
/// Holder side processing and witness synchronization
pub mod prover;
/// Accumulator state, delta log and published snapshots
pub mod revocation_registry;

/// Result type used throughout this crate
pub type ClResult<T> = Result<T, error::Error>;

/// Everything a caller usually needs
pub mod prelude {
    pub use super::attributes::*;
    pub use super::credential::*;
    pub use super::error::*;
    pub use super::issuer::*;
    pub use super::knox::accumulator::cks::{
        Accumulator, AccumulatorPublicKey, DeltaEvent, DeltaKind, NonRevocationCredential,
        NonRevocationSignature, RevocationBlinding, RevocationPublicKey, Tails, TailsAccessor,
        Witness,
    };
    pub use super::knox::cl::{BlindSignature, BlindingFactor, PublicKey, Signature};
    pub use super::params::*;
    pub use super::prover::*;
    pub use super::revocation_registry::*;
    pub use super::ClResult;
    pub use blsful::inner_types::{G1Projective, G2Projective, Scalar};
    pub use num_bigint::BigUint;
}
