//! Storage for every group's aggregate, with one lock per group.
//!
//! The outer `RwLock` only guards the list of groups (taken for writing while
//! a group is created, so ids stay sequential and gap-free). Each group sits
//! behind its own `Mutex`: mutations on one group serialize, mutations on
//! different groups run in parallel.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use splitledger_core::GroupId;
use splitledger_ledger::GroupLedger;

pub type GroupHandle = Arc<Mutex<GroupLedger>>;

#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<Vec<GroupHandle>>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next id and build the group with `init`. Only an `Ok`
    /// ledger is stored; on `Err` the id stays free for the next caller.
    pub fn create<E>(
        &self,
        init: impl FnOnce(GroupId) -> Result<GroupLedger, E>,
    ) -> Result<GroupId, E> {
        // A panic mid-create leaves the list untouched (push is the last step).
        let mut groups = self.groups.write().unwrap_or_else(PoisonError::into_inner);
        let group_id = GroupId::new(groups.len() as u64);

        let ledger = init(group_id)?;
        groups.push(Arc::new(Mutex::new(ledger)));
        Ok(group_id)
    }

    pub fn get(&self, group_id: GroupId) -> Option<GroupHandle> {
        let groups = self.groups.read().unwrap_or_else(PoisonError::into_inner);
        usize::try_from(group_id.value())
            .ok()
            .and_then(|idx| groups.get(idx))
            .cloned()
    }

    /// Number of groups created so far; also the next id to be assigned.
    pub fn count(&self) -> u64 {
        self.groups
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_from_zero() {
        let registry = GroupRegistry::new();
        let a = registry.create::<()>(|id| Ok(GroupLedger::empty(id))).unwrap();
        let b = registry.create::<()>(|id| Ok(GroupLedger::empty(id))).unwrap();

        assert_eq!(a, GroupId::new(0));
        assert_eq!(b, GroupId::new(1));
        assert_eq!(registry.count(), 2);
    }

    #[test]
    fn failed_init_does_not_consume_an_id() {
        let registry = GroupRegistry::new();
        assert_eq!(registry.create(|_| Err("nope")), Err("nope"));
        assert_eq!(registry.count(), 0);

        let id = registry.create::<()>(|id| Ok(GroupLedger::empty(id))).unwrap();
        assert_eq!(id, GroupId::new(0));
    }

    #[test]
    fn unknown_ids_are_absent() {
        let registry = GroupRegistry::new();
        assert!(registry.get(GroupId::new(0)).is_none());
        registry.create::<()>(|id| Ok(GroupLedger::empty(id))).unwrap();
        assert!(registry.get(GroupId::new(0)).is_some());
        assert!(registry.get(GroupId::new(1)).is_none());
    }
}
