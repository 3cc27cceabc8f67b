use super::{Error, TailsAccessor};
use blsful::inner_types::G2Projective;
use blsful::inner_types::GroupEncoding;
use serde::{Deserialize, Serialize};

/// The accumulator value Σ_{j∈V} g'_{L+1-j}.
///
/// The empty set accumulates to the identity.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Accumulator(pub G2Projective);

impl core::fmt::Display for Accumulator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Accumulator {{ {} }}", self.0)
    }
}

impl From<Accumulator> for G2Projective {
    fn from(a: Accumulator) -> Self {
        a.0
    }
}

impl From<G2Projective> for Accumulator {
    fn from(g: G2Projective) -> Self {
        Self(g)
    }
}

impl Default for Accumulator {
    fn default() -> Self {
        Self(G2Projective::IDENTITY)
    }
}

impl Accumulator {
    /// The number of bytes in an accumulator
    pub const BYTES: usize = 96;

    /// True when nothing is accumulated
    pub fn is_identity(&self) -> bool {
        self.0.is_identity().unwrap_u8() == 1
    }

    /// Return a new accumulator with index `i` added
    pub fn add(&self, tails: &impl TailsAccessor, i: u32) -> Result<Self, Error> {
        let mut a = *self;
        a.add_assign(tails, i)?;
        Ok(a)
    }

    /// Add index `i` to this accumulator
    pub fn add_assign(&mut self, tails: &impl TailsAccessor, i: u32) -> Result<(), Error> {
        self.0 += tails.accumulator_tail(i)?;
        Ok(())
    }

    /// Return a new accumulator with index `i` removed
    pub fn remove(&self, tails: &impl TailsAccessor, i: u32) -> Result<Self, Error> {
        let mut a = *self;
        a.remove_assign(tails, i)?;
        Ok(a)
    }

    /// Remove index `i` from this accumulator
    pub fn remove_assign(&mut self, tails: &impl TailsAccessor, i: u32) -> Result<(), Error> {
        self.0 -= tails.accumulator_tail(i)?;
        Ok(())
    }

    /// Convert accumulator to bytes
    pub fn to_bytes(&self) -> [u8; Self::BYTES] {
        let mut d = [0u8; Self::BYTES];
        d.copy_from_slice(self.0.to_bytes().as_ref());
        d
    }
}
