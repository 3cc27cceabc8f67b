/// Holder side blinding of the signature
mod blinding;
/// Random big integer helpers
mod helpers;
/// Key generation and blind signing
mod issuer;
/// The issuer's public key
mod public_key;
/// The issuer's private factorization
mod secret_key;
/// Signatures over attribute values
mod signature;

pub use blinding::*;
pub use helpers::*;
pub use issuer::*;
pub use public_key::*;
pub use secret_key::*;
pub use signature::*;
