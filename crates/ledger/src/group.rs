//! Group identity and membership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use splitledger_core::{GroupId, LedgerError, LedgerResult, PrincipalId};

/// Smallest membership a group can be created with.
pub const MIN_MEMBERS: usize = 2;

/// A named set of principals sharing expenses.
///
/// Members are kept in join order and never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub creator: PrincipalId,
    members: Vec<PrincipalId>,
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Build a group from its creator plus the initial members.
    ///
    /// Duplicates (including the creator listed again) count once.
    pub fn found(
        id: GroupId,
        name: impl Into<String>,
        creator: PrincipalId,
        initial_members: &[PrincipalId],
        created_at: DateTime<Utc>,
    ) -> LedgerResult<Self> {
        let members = founding_members(creator, initial_members)?;
        Ok(Self {
            id,
            name: name.into(),
            creator,
            members,
            created_at,
        })
    }

    /// Rebuild from a recorded `GroupCreated` without re-validating.
    pub(crate) fn restore(
        id: GroupId,
        name: String,
        creator: PrincipalId,
        members: Vec<PrincipalId>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            creator,
            members,
            created_at,
        }
    }

    pub fn members(&self) -> &[PrincipalId] {
        &self.members
    }

    pub fn is_member(&self, principal: PrincipalId) -> bool {
        self.members.contains(&principal)
    }

    /// Fails with `NotGroupMember` unless `principal` belongs to the group.
    pub fn ensure_member(&self, principal: PrincipalId) -> LedgerResult<()> {
        if self.is_member(principal) {
            Ok(())
        } else {
            Err(LedgerError::not_member(self.id, principal))
        }
    }

    /// Fails with `AlreadyMember` if `principal` is present.
    pub fn ensure_can_join(&self, principal: PrincipalId) -> LedgerResult<()> {
        if self.is_member(principal) {
            Err(LedgerError::AlreadyMember {
                group_id: self.id,
                principal,
            })
        } else {
            Ok(())
        }
    }

    pub(crate) fn admit(&mut self, principal: PrincipalId) {
        if !self.is_member(principal) {
            self.members.push(principal);
        }
    }
}

/// Creator first, then initial members in order, de-duplicated.
pub fn founding_members(
    creator: PrincipalId,
    initial_members: &[PrincipalId],
) -> LedgerResult<Vec<PrincipalId>> {
    let mut members = Vec::with_capacity(initial_members.len() + 1);
    for p in core::iter::once(&creator).chain(initial_members) {
        if !members.contains(p) {
            members.push(*p);
        }
    }

    if members.len() < MIN_MEMBERS {
        return Err(LedgerError::InsufficientMembers {
            found: members.len(),
        });
    }
    Ok(members)
}
