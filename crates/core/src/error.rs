//! Domain error model.

use thiserror::Error;

use crate::amount::Amount;
use crate::id::{GroupId, PrincipalId};

/// Result type used across the domain layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Coarse classification of a [`LedgerError`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    /// Rejected input; nothing was written.
    Validation,
    /// The caller may not act on this group.
    Authorization,
    /// The current ledger state does not allow the operation.
    State,
    /// The value transfer collaborator refused the movement.
    Collaborator,
}

/// Domain-level error.
///
/// Every variant is a stable, distinguishable kind. All of them are raised
/// before any write happens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Fewer than two distinct principals at group creation.
    #[error("group must have at least 2 members (got {found})")]
    InsufficientMembers { found: usize },

    /// The principal already belongs to the group.
    #[error("{principal} is already a member of group {group_id}")]
    AlreadyMember {
        group_id: GroupId,
        principal: PrincipalId,
    },

    /// Expense or settlement amount must be greater than zero.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// An expense needs at least one participant.
    #[error("expense must have at least one participant")]
    EmptyParticipants,

    /// An expense participant is not a member of the group.
    #[error("participant {principal} is not a member of group {group_id}")]
    ParticipantNotMember {
        group_id: GroupId,
        principal: PrincipalId,
    },

    /// The acting principal is not a member of the group.
    #[error("{principal} is not a member of group {group_id}")]
    NotGroupMember {
        group_id: GroupId,
        principal: PrincipalId,
    },

    /// No group exists with this id.
    #[error("unknown group {0}")]
    UnknownGroup(GroupId),

    /// A group with this id was already created.
    #[error("group {0} already exists")]
    GroupExists(GroupId),

    /// A decrement exceeds the stored debt.
    #[error("insufficient debt: requested {requested}, owed {owed}")]
    InsufficientDebt { requested: Amount, owed: Amount },

    /// An increment would overflow the stored debt.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// Native payment exceeds the debt and the overpayment policy rejects it.
    #[error("overpayment: attached {attached}, owed {owed}")]
    Overpayment { attached: Amount, owed: Amount },

    /// The value transfer gateway refused the transfer.
    #[error("transfer failed: {0}")]
    TransferFailed(String),
}

impl LedgerError {
    pub fn not_member(group_id: GroupId, principal: PrincipalId) -> Self {
        Self::NotGroupMember {
            group_id,
            principal,
        }
    }

    pub fn transfer_failed(reason: impl Into<String>) -> Self {
        Self::TransferFailed(reason.into())
    }

    /// Stable machine-readable code.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientMembers { .. } => "insufficient_members",
            Self::AlreadyMember { .. } => "already_member",
            Self::InvalidAmount => "invalid_amount",
            Self::EmptyParticipants => "empty_participants",
            Self::ParticipantNotMember { .. } => "participant_not_member",
            Self::NotGroupMember { .. } => "not_group_member",
            Self::UnknownGroup(_) => "unknown_group",
            Self::GroupExists(_) => "group_exists",
            Self::InsufficientDebt { .. } => "insufficient_debt",
            Self::ArithmeticOverflow => "arithmetic_overflow",
            Self::Overpayment { .. } => "overpayment",
            Self::TransferFailed(_) => "transfer_failed",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InsufficientMembers { .. }
            | Self::AlreadyMember { .. }
            | Self::InvalidAmount
            | Self::EmptyParticipants
            | Self::ParticipantNotMember { .. }
            | Self::Overpayment { .. } => ErrorClass::Validation,
            Self::NotGroupMember { .. } | Self::UnknownGroup(_) => ErrorClass::Authorization,
            Self::GroupExists(_) | Self::InsufficientDebt { .. } | Self::ArithmeticOverflow => {
                ErrorClass::State
            }
            Self::TransferFailed(_) => ErrorClass::Collaborator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable_codes() {
        assert_eq!(LedgerError::InvalidAmount.kind(), "invalid_amount");
        assert_eq!(
            LedgerError::UnknownGroup(GroupId::new(4)).kind(),
            "unknown_group"
        );
        assert_eq!(
            LedgerError::transfer_failed("no allowance").kind(),
            "transfer_failed"
        );
    }

    #[test]
    fn classes_follow_the_taxonomy() {
        let p = PrincipalId::new();
        let g = GroupId::new(0);
        assert_eq!(
            LedgerError::AlreadyMember {
                group_id: g,
                principal: p
            }
            .class(),
            ErrorClass::Validation
        );
        assert_eq!(LedgerError::not_member(g, p).class(), ErrorClass::Authorization);
        assert_eq!(
            LedgerError::InsufficientDebt {
                requested: 5,
                owed: 1
            }
            .class(),
            ErrorClass::State
        );
        assert_eq!(
            LedgerError::transfer_failed("x").class(),
            ErrorClass::Collaborator
        );
    }

    #[test]
    fn messages_carry_context() {
        let err = LedgerError::InsufficientDebt {
            requested: 50,
            owed: 30,
        };
        assert_eq!(err.to_string(), "insufficient debt: requested 50, owed 30");
    }
}
