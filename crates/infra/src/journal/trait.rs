use std::sync::Arc;

use thiserror::Error;

use splitledger_core::GroupId;
use splitledger_events::EventEnvelope;
use splitledger_ledger::LedgerEvent;

/// A journaled event with its stream position.
pub type JournalRecord = EventEnvelope<LedgerEvent>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JournalError {
    /// The stream is not at the version the writer expected.
    #[error("stream version mismatch for group {group_id}: expected {expected}, found {found}")]
    VersionMismatch {
        group_id: GroupId,
        expected: u64,
        found: u64,
    },

    /// A batch mixed events from different groups.
    #[error("event for group {found} appended to group {group_id}")]
    ForeignEvent { group_id: GroupId, found: GroupId },

    #[error("journal unavailable: {0}")]
    Unavailable(String),
}

/// Append-only storage of per-group event streams.
pub trait Journal: Send + Sync {
    /// Append `events` to `group_id`'s stream, which must currently hold
    /// exactly `expected_version` records. Returns the sealed envelopes with
    /// sequence numbers `expected_version + 1 ..`.
    fn append(
        &self,
        group_id: GroupId,
        expected_version: u64,
        events: &[LedgerEvent],
    ) -> Result<Vec<JournalRecord>, JournalError>;

    /// Full stream for a group, oldest first. Empty for unknown groups.
    fn load(&self, group_id: GroupId) -> Result<Vec<JournalRecord>, JournalError>;
}

impl<J> Journal for Arc<J>
where
    J: Journal + ?Sized,
{
    fn append(
        &self,
        group_id: GroupId,
        expected_version: u64,
        events: &[LedgerEvent],
    ) -> Result<Vec<JournalRecord>, JournalError> {
        (**self).append(group_id, expected_version, events)
    }

    fn load(&self, group_id: GroupId) -> Result<Vec<JournalRecord>, JournalError> {
        (**self).load(group_id)
    }
}
