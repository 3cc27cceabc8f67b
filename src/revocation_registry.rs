use crate::error::Error;
use crate::knox::accumulator::cks::{Accumulator, DeltaEvent, DeltaKind, TailsAccessor};
use crate::ClResult;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// The issuer's accumulator bookkeeping at one point of the delta log
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulatorState {
    /// The accumulator over `active`
    pub accumulator: Accumulator,
    /// Indices currently accumulated
    pub active: BTreeSet<u32>,
    /// Indices permanently retired
    pub revoked: BTreeSet<u32>,
    /// Sequence number of the last committed event, 0 before any event
    pub seq_no: u64,
}

/// Read access to a published accumulator and its delta log.
///
/// Implementations may be backed by remote storage, so every read can fail.
pub trait DeltaFeed {
    /// All events with a sequence number greater than `seq_no`, in order
    fn events_since(&self, seq_no: u64) -> ClResult<Vec<DeltaEvent>>;

    /// The latest published accumulator state
    fn state(&self) -> ClResult<AccumulatorState>;
}

/// The accumulator of one credential definition together with its delta log.
///
/// Only the owning issuer mutates a registry. Holders read published
/// snapshots instead.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RevocationRegistry {
    max_credentials: u32,
    assigned: u32,
    state: AccumulatorState,
    log: Vec<DeltaEvent>,
}

impl RevocationRegistry {
    /// An empty registry with room for `max_credentials` indices
    pub fn new(max_credentials: u32) -> Self {
        Self {
            max_credentials,
            assigned: 0,
            state: AccumulatorState::default(),
            log: Vec::new(),
        }
    }

    /// The accumulator capacity L
    pub fn max_credentials(&self) -> u32 {
        self.max_credentials
    }

    /// The index the next call to [`RevocationRegistry::assign`] returns
    pub fn next_index(&self) -> ClResult<u32> {
        if self.assigned >= self.max_credentials {
            return Err(Error::CapacityExceeded {
                capacity: self.max_credentials,
            });
        }
        Ok(self.assigned + 1)
    }

    /// Allocate the next unused index and fold it into the accumulator
    pub fn assign(&mut self, tails: &impl TailsAccessor) -> ClResult<u32> {
        let index = self.next_index()?;
        let accumulator = self.state.accumulator.add(tails, index)?;
        self.commit(accumulator, DeltaKind::Assign, index);
        self.assigned = index;
        self.state.active.insert(index);
        debug!(
            "assigned index {} seq_no {} active {}",
            index,
            self.state.seq_no,
            self.state.active.len()
        );
        Ok(index)
    }

    /// Permanently retire an active index
    pub fn revoke(&mut self, tails: &impl TailsAccessor, index: u32) -> ClResult<()> {
        if !self.state.active.contains(&index) {
            return Err(Error::InvalidRevocationIndex(index));
        }
        let accumulator = if self.state.active.len() == 1 {
            Accumulator::default()
        } else {
            self.state.accumulator.remove(tails, index)?
        };
        self.commit(accumulator, DeltaKind::Revoke, index);
        self.state.active.remove(&index);
        self.state.revoked.insert(index);
        debug!(
            "revoked index {} seq_no {} active {}",
            index,
            self.state.seq_no,
            self.state.active.len()
        );
        Ok(())
    }

    fn commit(&mut self, accumulator: Accumulator, kind: DeltaKind, index: u32) {
        let seq_no = self.state.seq_no + 1;
        self.log.push(DeltaEvent {
            seq_no,
            kind,
            index,
        });
        self.state.accumulator = accumulator;
        self.state.seq_no = seq_no;
    }

    /// The current state
    pub fn state(&self) -> &AccumulatorState {
        &self.state
    }

    /// The full delta log
    pub fn deltas(&self) -> &[DeltaEvent] {
        &self.log
    }

    /// An immutable snapshot holders can share across threads
    pub fn publish(&self) -> PublishedRegistry {
        PublishedRegistry {
            state: Arc::new(self.state.clone()),
            log: self.log.clone().into(),
        }
    }
}

impl DeltaFeed for RevocationRegistry {
    fn events_since(&self, seq_no: u64) -> ClResult<Vec<DeltaEvent>> {
        Ok(events_after(&self.log, seq_no))
    }

    fn state(&self) -> ClResult<AccumulatorState> {
        Ok(self.state.clone())
    }
}

/// A published, read-only copy of a registry
#[derive(Clone, Debug)]
pub struct PublishedRegistry {
    state: Arc<AccumulatorState>,
    log: Arc<[DeltaEvent]>,
}

impl DeltaFeed for PublishedRegistry {
    fn events_since(&self, seq_no: u64) -> ClResult<Vec<DeltaEvent>> {
        Ok(events_after(&self.log, seq_no))
    }

    fn state(&self) -> ClResult<AccumulatorState> {
        Ok(self.state.as_ref().clone())
    }
}

// The log is dense, event n sits at position n - 1
fn events_after(log: &[DeltaEvent], seq_no: u64) -> Vec<DeltaEvent> {
    usize::try_from(seq_no)
        .ok()
        .and_then(|start| log.get(start..))
        .map(|events| events.to_vec())
        .unwrap_or_default()
}
