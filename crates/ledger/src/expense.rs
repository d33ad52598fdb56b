//! Turning a shared cost into debt deltas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use splitledger_core::amount::split_evenly;
use splitledger_core::{Amount, ExpenseId, GroupId, LedgerError, LedgerResult, PrincipalId};

/// Immutable audit record of one shared cost. Holds no balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub group_id: GroupId,
    pub description: String,
    pub payer: PrincipalId,
    pub amount: Amount,
    /// Distinct participants, first occurrence order.
    pub participants: Vec<PrincipalId>,
    /// What each participant other than the payer now owes the payer.
    pub share: Amount,
    /// `amount - share * participants.len()`; charged to nobody.
    pub remainder: Amount,
    pub recorded_at: DateTime<Utc>,
}

impl Expense {
    /// Participants who end up owing the payer.
    pub fn debtors(&self) -> impl Iterator<Item = PrincipalId> + '_ {
        let payer = self.payer;
        self.participants.iter().copied().filter(move |p| *p != payer)
    }
}

/// Result of splitting an amount across participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseSplit {
    pub participants: Vec<PrincipalId>,
    pub share: Amount,
    pub remainder: Amount,
}

/// Floor-split `amount` over the distinct `participants`.
///
/// Repeated participants are a no-op. The undivided remainder is reported but
/// never assigned, so the payer absorbs it.
pub fn split_expense(amount: Amount, participants: &[PrincipalId]) -> LedgerResult<ExpenseSplit> {
    if amount == 0 {
        return Err(LedgerError::InvalidAmount);
    }

    let mut distinct = Vec::with_capacity(participants.len());
    for p in participants {
        if !distinct.contains(p) {
            distinct.push(*p);
        }
    }

    let (share, remainder) =
        split_evenly(amount, distinct.len()).ok_or(LedgerError::EmptyParticipants)?;

    Ok(ExpenseSplit {
        participants: distinct,
        share,
        remainder,
    })
}
