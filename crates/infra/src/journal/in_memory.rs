use std::collections::HashMap;
use std::sync::RwLock;

use splitledger_core::GroupId;
use splitledger_events::{Event, EventEnvelope};
use splitledger_ledger::LedgerEvent;

use super::r#trait::{Journal, JournalError, JournalRecord};

/// In-memory journal. Not durable; intended for tests and the dev server.
#[derive(Debug, Default)]
pub struct InMemoryJournal {
    streams: RwLock<HashMap<GroupId, Vec<JournalRecord>>>,
}

impl InMemoryJournal {
    pub fn new() -> Self {
        Self::default()
    }

    fn current_version(stream: &[JournalRecord]) -> u64 {
        stream.last().map(|e| e.sequence_number()).unwrap_or(0)
    }
}

impl Journal for InMemoryJournal {
    fn append(
        &self,
        group_id: GroupId,
        expected_version: u64,
        events: &[LedgerEvent],
    ) -> Result<Vec<JournalRecord>, JournalError> {
        if events.is_empty() {
            return Ok(vec![]);
        }

        if let Some(foreign) = events.iter().find(|e| e.group_id() != group_id) {
            return Err(JournalError::ForeignEvent {
                group_id,
                found: foreign.group_id(),
            });
        }

        let mut streams = self
            .streams
            .write()
            .map_err(|_| JournalError::Unavailable("lock poisoned".to_string()))?;

        let stream = streams.entry(group_id).or_default();
        let current = Self::current_version(stream);
        if current != expected_version {
            return Err(JournalError::VersionMismatch {
                group_id,
                expected: expected_version,
                found: current,
            });
        }

        let committed: Vec<JournalRecord> = events
            .iter()
            .zip(current + 1..)
            .map(|(event, seq)| EventEnvelope::seal(seq, event.clone()))
            .collect();
        stream.extend(committed.iter().cloned());

        Ok(committed)
    }

    fn load(&self, group_id: GroupId) -> Result<Vec<JournalRecord>, JournalError> {
        let streams = self
            .streams
            .read()
            .map_err(|_| JournalError::Unavailable("lock poisoned".to_string()))?;

        Ok(streams.get(&group_id).cloned().unwrap_or_default())
    }
}
