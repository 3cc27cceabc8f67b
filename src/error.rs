use core::fmt::{self, Display, Formatter};

/// Errors created by this library
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The caller supplied a value that cannot be used
    InvalidInput(&'static str),
    /// No credential definition matched the requested key
    LookupFailed(String),
    /// Every accumulator index of the credential definition is taken
    CapacityExceeded {
        /// The maximum number of credentials
        capacity: u32,
    },
    /// The credential's accumulator index has been revoked
    RevokedCredential {
        /// The retired index
        index: u32,
    },
    /// The witness lags behind the published accumulator
    StaleWitness,
    /// The index is not an active member of the accumulator
    InvalidRevocationIndex(u32),
    /// Modular arithmetic could not be completed
    InvalidSigningOperation(&'static str),
    /// An accumulator primitive failed
    Accumulator(String),
    /// Configuration could not be parsed
    InvalidParameters(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(reason) => write!(f, "invalid input: {}", reason),
            Self::LookupFailed(key) => write!(f, "no credential definition found for {}", key),
            Self::CapacityExceeded { capacity } => {
                write!(f, "accumulator is full, capacity = {}", capacity)
            }
            Self::RevokedCredential { index } => {
                write!(f, "credential with index {} has been revoked", index)
            }
            Self::StaleWitness => write!(f, "witness is not synchronized with the accumulator"),
            Self::InvalidRevocationIndex(index) => {
                write!(f, "index {} is not active in the accumulator", index)
            }
            Self::InvalidSigningOperation(reason) => {
                write!(f, "invalid signing operation: {}", reason)
            }
            Self::Accumulator(message) => write!(f, "accumulator error: {}", message),
            Self::InvalidParameters(message) => write!(f, "invalid parameters: {}", message),
        }
    }
}

impl std::error::Error for Error {}

impl From<crate::knox::accumulator::cks::Error> for Error {
    fn from(e: crate::knox::accumulator::cks::Error) -> Self {
        Self::Accumulator(e.message)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidParameters(e.to_string())
    }
}
