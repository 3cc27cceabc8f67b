/// An accumulator error
#[derive(Clone, Debug)]
pub struct Error {
    /// The string message
    pub message: String,
    /// The code number of the error
    pub code: usize,
}

impl Error {
    /// A tail was requested outside 1..=2L or at L+1
    pub const TAIL_OUT_OF_RANGE: usize = 1;
    /// A scalar had no inverse
    pub const NOT_INVERTIBLE: usize = 2;
    /// The event cannot be applied to this witness
    pub const INVALID_EVENT: usize = 3;
    /// The capacity L leaves no room for tail positions up to 2L
    pub const INVALID_CAPACITY: usize = 4;

    /// Create a message from a number and string
    pub fn from_msg(code: usize, message: &str) -> Self {
        Self {
            code,
            message: String::from(message),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Error {{ code: {}, message: {} }}",
            self.code, self.message
        )
    }
}
