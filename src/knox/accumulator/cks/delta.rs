use serde::{Deserialize, Serialize};

/// The membership change recorded by a delta event
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeltaKind {
    /// The index joined the accumulator
    Assign,
    /// The index was permanently retired
    Revoke,
}

/// One entry of the append-only accumulator log
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeltaEvent {
    /// Strictly increasing position in the log, starting at 1
    pub seq_no: u64,
    /// What happened
    pub kind: DeltaKind,
    /// The affected credential index
    pub index: u32,
}

impl core::fmt::Display for DeltaEvent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "DeltaEvent {{ seq_no: {}, kind: {:?}, index: {} }}",
            self.seq_no, self.kind, self.index
        )
    }
}
