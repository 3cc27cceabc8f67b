/// Accumulator methods
pub mod accumulator;
/// Camenisch-Lysyanskaya signatures over an RSA group
pub mod cl;

use blsful::inner_types::Scalar;
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

/// General purpose crypto operations
pub struct Knox {}

impl Knox {
    /// Compute a variable length hash
    pub fn xof_digest<X: Default + ExtendableOutput + Update>(input: &[u8], output: &mut [u8]) {
        let mut r = X::default().chain(input.as_ref()).finalize_xof();
        r.read(output);
    }

    /// Hash a domain separated message to a field element
    pub fn hash_to_scalar(dst: &[u8], input: &[u8]) -> Scalar {
        let mut data = Vec::with_capacity(dst.len() + input.len());
        data.extend_from_slice(dst);
        data.extend_from_slice(input);
        let mut okm = [0u8; 64];
        Self::xof_digest::<Shake256>(&data, &mut okm);
        Scalar::from_bytes_wide(&okm)
    }
}
